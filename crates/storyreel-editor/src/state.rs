//! Editor state.

use storyreel_core::{EditorConfig, Result};
use storyreel_playback::SyncView;
use storyreel_timeline::{Playhead, Selection, Timeline, TimelineGeometry, TimelineView};
use uuid::Uuid;

use crate::library::MediaLibrary;
use crate::notice::NoticeBoard;
use crate::storyboard::Storyboard;

/// Everything the editor shows, owned in one place.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub config: EditorConfig,
    pub timeline: Timeline,
    pub playhead: Playhead,
    pub selection: Selection,
    pub geometry: TimelineGeometry,
    pub library: MediaLibrary,
    pub storyboard: Storyboard,
    pub notices: NoticeBoard,
    /// Prompt text being edited.
    pub prompt: String,
    /// Request id of the generation in flight.
    pub pending_generation: Option<Uuid>,
    /// Editor clock in seconds, advanced by `Editor::tick`.
    pub clock: f64,
}

impl EditorState {
    /// State with `library` laid out back to back on the primary track.
    pub fn new(config: EditorConfig, library: MediaLibrary) -> Result<Self> {
        let timeline = Timeline::from_media(
            library.list().iter().map(|item| item.clip_media()),
            config.default_clip_duration,
            config.num_tracks,
        )?;
        Ok(Self {
            geometry: TimelineGeometry::from_config(&config),
            notices: NoticeBoard::new(config.notice_ttl_seconds),
            timeline,
            playhead: Playhead::new(),
            selection: Selection::new(),
            library,
            storyboard: Storyboard::new(),
            prompt: String::new(),
            pending_generation: None,
            clock: 0.0,
            config,
        })
    }

    pub fn is_generating(&self) -> bool {
        self.pending_generation.is_some()
    }

    pub(crate) fn timeline_view(&mut self) -> TimelineView<'_> {
        TimelineView {
            timeline: &mut self.timeline,
            playhead: &mut self.playhead,
            selection: &mut self.selection,
            geometry: &self.geometry,
        }
    }

    pub(crate) fn sync_view(&mut self) -> SyncView<'_> {
        SyncView {
            timeline: &self.timeline,
            playhead: &mut self.playhead,
            resolver: &self.library,
        }
    }
}
