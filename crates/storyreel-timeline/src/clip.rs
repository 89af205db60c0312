//! Clip types for the timeline.

use std::fmt;

use serde::{Deserialize, Serialize};
use storyreel_core::{Result, StoryError, TimeSpan};

/// Stable clip identifier. Never changes once the clip exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClipId(String);

impl ClipId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The `clip-N` form used for clips placed by the editor.
    pub fn sequential(n: u64) -> Self {
        Self(format!("clip-{n}"))
    }

    /// The `N` of a `clip-N` id.
    pub(crate) fn sequence_number(&self) -> Option<u64> {
        self.0.strip_prefix("clip-")?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle to an asset owned by the media library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MediaRef(String);

impl MediaRef {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClipKind {
    Image,
    Video,
    Audio,
}

impl ClipKind {
    pub fn label(self) -> &'static str {
        match self {
            ClipKind::Image => "image",
            ClipKind::Video => "video",
            ClipKind::Audio => "audio",
        }
    }
}

/// What a clip plays. Stills have no intrinsic duration; video and audio
/// may carry one once its media length is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClipMedia {
    Image(MediaRef),
    Video {
        media: MediaRef,
        intrinsic_duration: Option<f64>,
    },
    Audio {
        media: MediaRef,
        intrinsic_duration: Option<f64>,
    },
}

impl ClipMedia {
    pub fn image(media: MediaRef) -> Self {
        Self::Image(media)
    }

    pub fn video(media: MediaRef, intrinsic_duration: Option<f64>) -> Self {
        Self::Video {
            media,
            intrinsic_duration,
        }
    }

    pub fn audio(media: MediaRef, intrinsic_duration: Option<f64>) -> Self {
        Self::Audio {
            media,
            intrinsic_duration,
        }
    }

    pub fn kind(&self) -> ClipKind {
        match self {
            Self::Image(_) => ClipKind::Image,
            Self::Video { .. } => ClipKind::Video,
            Self::Audio { .. } => ClipKind::Audio,
        }
    }

    pub fn media_ref(&self) -> &MediaRef {
        match self {
            Self::Image(media) => media,
            Self::Video { media, .. } | Self::Audio { media, .. } => media,
        }
    }

    /// Length of the underlying asset, if it has one.
    pub fn intrinsic_duration(&self) -> Option<f64> {
        match self {
            Self::Image(_) => None,
            Self::Video {
                intrinsic_duration, ..
            }
            | Self::Audio {
                intrinsic_duration, ..
            } => intrinsic_duration.filter(|d| d.is_finite() && *d > 0.0),
        }
    }

    /// Timeline length given to this media when it is first placed.
    pub fn placement_duration(&self, default_duration: f64) -> f64 {
        self.intrinsic_duration().unwrap_or(default_duration)
    }
}

/// A clip placed on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    id: ClipId,
    media: ClipMedia,
    track: usize,
    span: TimeSpan,
}

impl Clip {
    /// Create a validated clip.
    pub fn create(
        id: ClipId,
        media: ClipMedia,
        track: usize,
        start: f64,
        end: f64,
        num_tracks: usize,
    ) -> Result<Self> {
        let span = TimeSpan::new(start, end);
        validate(track, span, num_tracks)?;
        Ok(Self {
            id,
            media,
            track,
            span,
        })
    }

    pub fn id(&self) -> &ClipId {
        &self.id
    }

    pub fn media(&self) -> &ClipMedia {
        &self.media
    }

    pub fn kind(&self) -> ClipKind {
        self.media.kind()
    }

    pub fn media_ref(&self) -> &MediaRef {
        self.media.media_ref()
    }

    pub fn track(&self) -> usize {
        self.track
    }

    pub fn span(&self) -> TimeSpan {
        self.span
    }

    pub fn start(&self) -> f64 {
        self.span.start
    }

    pub fn end(&self) -> f64 {
        self.span.end
    }

    pub fn duration(&self) -> f64 {
        self.span.duration()
    }

    /// The same clip at a new start and track, keeping its duration.
    pub fn moved(&self, new_start: f64, new_track: usize, num_tracks: usize) -> Result<Self> {
        let span = self.span.with_start(new_start);
        validate(new_track, span, num_tracks)?;
        Ok(Self {
            track: new_track,
            span,
            ..self.clone()
        })
    }

    /// The same clip with new edges, on the same track.
    pub fn resized(&self, new_start: f64, new_end: f64, num_tracks: usize) -> Result<Self> {
        let span = TimeSpan::new(new_start, new_end);
        validate(self.track, span, num_tracks)?;
        Ok(Self {
            span,
            ..self.clone()
        })
    }
}

fn validate(track: usize, span: TimeSpan, num_tracks: usize) -> Result<()> {
    if !span.is_valid() {
        return Err(StoryError::InvalidSpan {
            start: span.start,
            end: span.end,
        });
    }
    if track >= num_tracks {
        return Err(StoryError::InvalidTrack { track, num_tracks });
    }
    Ok(())
}
