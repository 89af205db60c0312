//! The timeline: placed clips plus derived duration.

use serde::{Deserialize, Serialize};
use storyreel_core::{Result, StoryError, TimeSpan, TIME_EPSILON};
use tracing::debug;

use crate::clip::{Clip, ClipId, ClipMedia, MediaRef};
use crate::edit::{EditCommand, EditOutcome};

/// All clips across all tracks.
///
/// Clips are kept in insertion order, which is also the stacking order used
/// by hit-testing. `duration` is the latest clip end and is only ever
/// recomputed inside [`Timeline::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    clips: Vec<Clip>,
    num_tracks: usize,
    duration: f64,
    next_id: u64,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new(num_tracks: usize) -> Self {
        Self {
            clips: Vec::new(),
            num_tracks: num_tracks.max(1),
            duration: 0.0,
            next_id: 1,
        }
    }

    /// Lay out media back to back on track 0 as `clip-1..N`.
    ///
    /// Media with an intrinsic duration keeps it; everything else gets
    /// `clip_duration`.
    pub fn from_media(
        media: impl IntoIterator<Item = ClipMedia>,
        clip_duration: f64,
        num_tracks: usize,
    ) -> Result<Self> {
        let mut timeline = Self::new(num_tracks);
        let commands = media
            .into_iter()
            .map(|media| {
                let duration = media.placement_duration(clip_duration);
                EditCommand::Append {
                    media,
                    track: 0,
                    duration,
                }
            })
            .collect();
        timeline.apply(EditCommand::Batch(commands))?;
        Ok(timeline)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub fn num_tracks(&self) -> usize {
        self.num_tracks
    }

    /// Latest clip end, 0 when empty.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Clips in insertion order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn get(&self, id: &ClipId) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id() == id)
    }

    pub fn contains(&self, id: &ClipId) -> bool {
        self.get(id).is_some()
    }

    /// Clips on one track, sorted by start.
    pub fn clips_on_track(&self, track: usize) -> Vec<&Clip> {
        let mut clips: Vec<&Clip> = self.clips.iter().filter(|c| c.track() == track).collect();
        clips.sort_by(|a, b| a.start().total_cmp(&b.start()));
        clips
    }

    /// End of the last clip on a track, 0 when the track is empty.
    pub fn track_end(&self, track: usize) -> f64 {
        self.clips
            .iter()
            .filter(|c| c.track() == track)
            .map(Clip::end)
            .fold(0.0, f64::max)
    }

    /// The id the next appended clip will get.
    pub fn next_clip_id(&self) -> ClipId {
        ClipId::sequential(self.next_id)
    }

    /// Whether `span` on `track` is clear of every clip except `exclude`.
    pub fn is_free(&self, track: usize, span: TimeSpan, exclude: Option<&ClipId>) -> bool {
        self.blocker(track, span, exclude).is_none()
    }

    /// Free intervals on a track, ignoring `exclude`. The last gap is open
    /// ended (`end == f64::INFINITY`).
    pub fn free_gaps(&self, track: usize, exclude: Option<&ClipId>) -> Vec<TimeSpan> {
        let mut gaps = Vec::new();
        let mut cursor = 0.0_f64;
        for clip in self.clips_on_track(track) {
            if Some(clip.id()) == exclude {
                continue;
            }
            if clip.start() > cursor + TIME_EPSILON {
                gaps.push(TimeSpan::new(cursor, clip.start()));
            }
            cursor = cursor.max(clip.end());
        }
        gaps.push(TimeSpan::new(cursor, f64::INFINITY));
        gaps
    }

    /// `(previous end, next start)` around a clip on its own track. Missing
    /// neighbors yield `0.0` and `f64::INFINITY`.
    pub fn neighbor_bounds(&self, id: &ClipId) -> Option<(f64, f64)> {
        let clip = self.get(id)?;
        let mut prev_end = 0.0_f64;
        let mut next_start = f64::INFINITY;
        for other in self.clips.iter().filter(|c| c.track() == clip.track() && c.id() != id) {
            if other.end() <= clip.start() + TIME_EPSILON {
                prev_end = prev_end.max(other.end());
            } else if other.start() >= clip.end() - TIME_EPSILON {
                next_start = next_start.min(other.start());
            }
        }
        Some((prev_end, next_start))
    }

    /// Clips backed by the given media.
    pub fn clips_for_media<'a>(&'a self, media: &'a MediaRef) -> impl Iterator<Item = &'a Clip> {
        self.clips.iter().filter(move |c| c.media_ref() == media)
    }

    // ── Mutation ────────────────────────────────────────────────

    /// Apply an edit. On error the timeline is left exactly as it was.
    pub fn apply(&mut self, command: EditCommand) -> Result<EditOutcome> {
        let saved_clips = self.clips.clone();
        let saved_next_id = self.next_id;

        match command.execute(self) {
            Ok(outcome) => {
                self.recompute_duration();
                debug!(
                    clips = self.clips.len(),
                    duration = self.duration,
                    "Timeline edit applied"
                );
                Ok(outcome)
            }
            Err(e) => {
                self.clips = saved_clips;
                self.next_id = saved_next_id;
                debug!(error = %e, "Timeline edit rejected");
                Err(e)
            }
        }
    }

    fn recompute_duration(&mut self) {
        self.duration = self.clips.iter().map(Clip::end).fold(0.0, f64::max);
    }

    fn blocker(&self, track: usize, span: TimeSpan, exclude: Option<&ClipId>) -> Option<&Clip> {
        self.clips
            .iter()
            .filter(|c| c.track() == track && Some(c.id()) != exclude)
            .find(|c| c.span().overlaps(span))
    }

    // Helpers for `EditCommand::execute`.

    pub(crate) fn check_track(&self, track: usize) -> Result<()> {
        if track >= self.num_tracks {
            return Err(StoryError::InvalidTrack {
                track,
                num_tracks: self.num_tracks,
            });
        }
        Ok(())
    }

    pub(crate) fn ensure_free(
        &self,
        id: &ClipId,
        track: usize,
        span: TimeSpan,
        exclude: Option<&ClipId>,
    ) -> Result<()> {
        if self.is_free(track, span, exclude) {
            Ok(())
        } else {
            Err(StoryError::OverlapRejected {
                clip_id: id.to_string(),
                track,
            })
        }
    }

    pub(crate) fn require(&self, id: &ClipId) -> Result<&Clip> {
        self.get(id)
            .ok_or_else(|| StoryError::NotFound(format!("clip {id}")))
    }

    pub(crate) fn allocate_id(&mut self) -> ClipId {
        let id = ClipId::sequential(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn push_clip(&mut self, clip: Clip) {
        if let Some(n) = clip.id().sequence_number() {
            self.next_id = self.next_id.max(n + 1);
        }
        self.clips.push(clip);
    }

    pub(crate) fn replace_clip(&mut self, clip: Clip) {
        if let Some(slot) = self.clips.iter_mut().find(|c| c.id() == clip.id()) {
            *slot = clip;
        }
    }

    pub(crate) fn take_clip(&mut self, id: &ClipId) -> Option<Clip> {
        let index = self.clips.iter().position(|c| c.id() == id)?;
        Some(self.clips.remove(index))
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(3)
    }
}
