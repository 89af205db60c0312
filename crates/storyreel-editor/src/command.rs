//! Editor commands.
//!
//! Every user intent reaches the editor as an `EditorCommand` passed to
//! [`Editor::dispatch`](crate::Editor::dispatch), which is the single entry
//! point for mutating editor state.

use storyreel_timeline::{ClipId, ClipKind, MediaRef, PointerPos};

use crate::notice::NoticeId;
use crate::storyboard::SequenceId;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    // ── Timeline pointer ──
    PointerDown(PointerPos),
    PointerMove(PointerPos),
    PointerUp(PointerPos),
    /// Press on the time ruler. Scrubs until the matching `PointerUp`.
    RulerDown(PointerPos),
    CancelGesture,

    // ── Transport ──
    Play,
    Pause,
    TogglePlay,
    SkipBack,
    SkipForward,
    Seek(f64),
    SetVolume(f32),
    ToggleMute,
    SetLoop(bool),

    // ── Timeline view and edits ──
    ZoomIn,
    ZoomOut,
    DeleteSelected,
    DeleteClip(ClipId),

    // ── Media library ──
    AddMedia {
        url: String,
        kind: ClipKind,
        intrinsic_duration: Option<f64>,
    },
    AddMediaToTimeline(MediaRef),
    RemoveMedia(MediaRef),

    // ── Storyboard ──
    SetPrompt(String),
    Generate,
    ToggleSequence(SequenceId),
    DeleteSequence(SequenceId),
    SendToTimeline,

    DismissNotice(NoticeId),
    Undo,
    Redo,
}

impl EditorCommand {
    /// Pointer commands arrive every frame during a gesture and are logged
    /// at a lower level.
    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            Self::PointerDown(_) | Self::PointerMove(_) | Self::PointerUp(_) | Self::RulerDown(_)
        )
    }
}
