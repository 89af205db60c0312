//! Storyreel Editor - The editor shell
//!
//! Owns the editor state and is its only writer:
//! - `MediaLibrary`: imported and generated media, resolvable to URLs
//! - `Storyboard`: generated image sequences awaiting placement
//! - `NoticeBoard`: transient user-facing messages
//! - `Editor`: routes `EditorCommand`s and queued `EditorEvent`s to the
//!   timeline, interaction engine, playback synchronizer and generator

pub mod command;
pub mod editor;
pub mod event;
pub mod library;
pub mod notice;
pub mod state;
pub mod storyboard;

pub use command::EditorCommand;
pub use editor::Editor;
pub use event::{EditorEvent, EventQueue};
pub use library::{MediaItem, MediaLibrary};
pub use notice::{Notice, NoticeBoard, NoticeId, NoticeLevel};
pub use state::EditorState;
pub use storyboard::{Sequence, SequenceId, Storyboard};
