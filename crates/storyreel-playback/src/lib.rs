//! Storyreel Playback - Keeps the media player in step with the playhead
//!
//! Architecture:
//! - `MediaPlayer`: the contract a concrete player (web view, decoder, test
//!   double) implements; it only knows about one loaded source at a time
//! - `PlaybackSynchronizer`: maps global time to the active primary-track
//!   clip, loads and seeks the player, and turns player callbacks back into
//!   playhead moves
//! - `ClockPlayer`: a player driven by wall-clock ticks, used for stills and
//!   in tests

pub mod clock;
pub mod locate;
pub mod player;
pub mod sync;

pub use clock::ClockPlayer;
pub use locate::{locate, next_clip_from, primary_clips, Located, PRIMARY_TRACK};
pub use player::{LoadTicket, MediaPlayer, MediaResolver, MediaSource, PlayerEvent, PlayerEventKind};
pub use sync::{ActiveClip, PlaybackStatus, PlaybackSynchronizer, SyncView};
