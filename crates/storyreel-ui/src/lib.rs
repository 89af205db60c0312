//! Storyreel UI - egui panels for the storyboard editor
//!
//! Every panel reads the editor state and returns the `EditorCommand`s the
//! user asked for; nothing here mutates editor state directly.
//! - Timeline with ruler, lanes, clips and playhead
//! - Viewer with transport controls
//! - Media library, prompt and storyboard panels
//! - Notice toasts and keyboard shortcuts

pub mod library_panel;
pub mod notices;
pub mod shortcuts;
pub mod storyboard_panel;
pub mod theme;
pub mod timeline;
pub mod viewer;
pub mod widgets;

pub use library_panel::{show_library, LibraryPanelState};
pub use notices::show_notices;
pub use shortcuts::{command_for_key, read_shortcuts};
pub use storyboard_panel::show_storyboard;
pub use theme::Theme;
pub use timeline::show_timeline;
pub use viewer::show_viewer;
