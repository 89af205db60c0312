//! Storyreel Core - Foundation types for the storyboard editor
//!
//! This crate provides the fundamental types used throughout Storyreel:
//! - Error taxonomy shared by the timeline, playback and shell crates
//! - Time spans, frame rates and timecode formatting
//! - Editor configuration

pub mod config;
pub mod error;
pub mod time;

pub use config::{EditorConfig, GenerationConfig};
pub use error::{Result, StoryError};
pub use time::{format_timecode, format_timecode_precise, FrameRate, TimeSpan, TIME_EPSILON};
