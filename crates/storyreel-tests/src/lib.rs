//! Integration test crate for Storyreel.
//!
//! Holds cross-crate tests: the timeline model driven through the gesture
//! engine, playback following the playhead, and the editor as a whole.

#[cfg(test)]
mod config;

#[cfg(test)]
mod editing;

#[cfg(test)]
mod playback;

#[cfg(test)]
mod properties;
