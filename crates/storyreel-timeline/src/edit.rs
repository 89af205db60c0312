//! Edit commands.
//!
//! Uses the Command pattern: every mutation of a [`Timeline`] is an
//! `EditCommand` handed to [`Timeline::apply`], which validates it against the
//! clip model, checks the same-track overlap invariant and recomputes the
//! derived duration. A command that fails leaves the timeline untouched.

use storyreel_core::{Result, StoryError, TimeSpan};
use tracing::debug;

use crate::clip::{Clip, ClipId, ClipMedia, MediaRef};
use crate::timeline::Timeline;

// ── Edit commands ───────────────────────────────────────────────

/// A single timeline mutation.
#[derive(Debug, Clone)]
pub enum EditCommand {
    /// Insert a fully built clip.
    Insert { clip: Clip },
    /// Place media at the end of a track under a freshly allocated id.
    Append {
        media: ClipMedia,
        track: usize,
        duration: f64,
    },
    /// Move a clip to a new start and track, keeping its duration.
    Move {
        id: ClipId,
        start: f64,
        track: usize,
    },
    /// Change both edges of a clip on its current track.
    Resize { id: ClipId, start: f64, end: f64 },
    /// Delete a clip. Fails with `NotFound` if the id is unknown.
    Remove { id: ClipId },
    /// Delete every clip backed by the given media. Matching nothing is fine.
    RemoveMedia { media: MediaRef },
    /// A batch of commands applied atomically.
    Batch(Vec<EditCommand>),
}

/// What an applied command changed.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Inserted(ClipId),
    Moved {
        id: ClipId,
        span: TimeSpan,
        track: usize,
    },
    Resized {
        id: ClipId,
        span: TimeSpan,
    },
    Removed(Vec<Clip>),
    Batch(Vec<EditOutcome>),
}

impl EditOutcome {
    /// Ids of the clips this outcome touched.
    pub fn affected_clips(&self) -> Vec<ClipId> {
        match self {
            Self::Inserted(id) | Self::Moved { id, .. } | Self::Resized { id, .. } => {
                vec![id.clone()]
            }
            Self::Removed(clips) => clips.iter().map(|c| c.id().clone()).collect(),
            Self::Batch(outcomes) => outcomes.iter().flat_map(|o| o.affected_clips()).collect(),
        }
    }
}

impl EditCommand {
    /// Run the command against the timeline's clip list. Duration bookkeeping
    /// and rollback are handled by [`Timeline::apply`].
    pub(crate) fn execute(self, timeline: &mut Timeline) -> Result<EditOutcome> {
        match self {
            Self::Insert { clip } => {
                timeline.check_track(clip.track())?;
                if timeline.get(clip.id()).is_some() {
                    return Err(StoryError::DuplicateId(clip.id().to_string()));
                }
                timeline.ensure_free(clip.id(), clip.track(), clip.span(), None)?;
                let id = clip.id().clone();
                timeline.push_clip(clip);
                Ok(EditOutcome::Inserted(id))
            }
            Self::Append {
                media,
                track,
                duration,
            } => {
                timeline.check_track(track)?;
                let start = timeline.track_end(track);
                let id = timeline.allocate_id();
                let clip = Clip::create(
                    id.clone(),
                    media,
                    track,
                    start,
                    start + duration,
                    timeline.num_tracks(),
                )?;
                timeline.push_clip(clip);
                Ok(EditOutcome::Inserted(id))
            }
            Self::Move { id, start, track } => {
                let current = timeline.require(&id)?;
                let moved = current.moved(start, track, timeline.num_tracks())?;
                timeline.ensure_free(&id, track, moved.span(), Some(&id))?;
                let span = moved.span();
                timeline.replace_clip(moved);
                Ok(EditOutcome::Moved { id, span, track })
            }
            Self::Resize { id, start, end } => {
                let current = timeline.require(&id)?;
                let resized = current.resized(start, end, timeline.num_tracks())?;
                timeline.ensure_free(&id, resized.track(), resized.span(), Some(&id))?;
                let span = resized.span();
                timeline.replace_clip(resized);
                Ok(EditOutcome::Resized { id, span })
            }
            Self::Remove { id } => {
                let removed = timeline
                    .take_clip(&id)
                    .ok_or_else(|| StoryError::NotFound(format!("clip {id}")))?;
                Ok(EditOutcome::Removed(vec![removed]))
            }
            Self::RemoveMedia { media } => {
                let ids: Vec<ClipId> = timeline
                    .clips_for_media(&media)
                    .map(|c| c.id().clone())
                    .collect();
                let removed = ids
                    .iter()
                    .filter_map(|id| timeline.take_clip(id))
                    .collect::<Vec<_>>();
                debug!(media = %media, count = removed.len(), "Removed clips for media");
                Ok(EditOutcome::Removed(removed))
            }
            Self::Batch(commands) => {
                let mut outcomes = Vec::with_capacity(commands.len());
                for command in commands {
                    outcomes.push(command.execute(timeline)?);
                }
                Ok(EditOutcome::Batch(outcomes))
            }
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────
