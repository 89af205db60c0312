//! Error types for Storyreel.

use thiserror::Error;

/// Main error type for Storyreel operations.
#[derive(Error, Debug)]
pub enum StoryError {
    #[error("Invalid span: end {end:.3}s must be greater than start {start:.3}s")]
    InvalidSpan { start: f64, end: f64 },

    #[error("Invalid track {track}: timeline has {num_tracks} tracks")]
    InvalidTrack { track: usize, num_tracks: usize },

    /// An edit would overlap a neighbor on the same track and no free position exists.
    #[error("Overlap rejected for clip {clip_id} on track {track}")]
    OverlapRejected { clip_id: String, track: usize },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Clip id {0} is already in use")]
    DuplicateId(String),

    /// A seek outside `[0, duration]`. Callers clamp instead of surfacing this.
    #[error("Time {time:.3}s is outside [0, {duration:.3}]")]
    OutOfRange { time: f64, duration: f64 },

    #[error("Media for clip {clip_id} failed to load: {reason}")]
    MediaLoad { clip_id: String, reason: String },

    #[error("Image generation failed: {0}")]
    Generation(String),

    #[error("A generation request is already pending")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoryError {
    /// Whether this error is a transient external failure the user may retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::MediaLoad { .. } | Self::Generation(_) | Self::Busy | Self::Io(_)
        )
    }
}

/// Result type alias for Storyreel operations.
pub type Result<T> = std::result::Result<T, StoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = StoryError::InvalidSpan {
            start: 5.0,
            end: 5.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid span: end 5.000s must be greater than start 5.000s"
        );

        let err = StoryError::InvalidTrack {
            track: 4,
            num_tracks: 3,
        };
        assert!(err.to_string().contains("3 tracks"));
    }

    #[test]
    fn test_transient_classification() {
        assert!(StoryError::Busy.is_transient());
        assert!(StoryError::Generation("timeout".into()).is_transient());
        assert!(!StoryError::NotFound("clip-1".into()).is_transient());
        assert!(!StoryError::InvalidSpan {
            start: 1.0,
            end: 0.0
        }
        .is_transient());
    }
}
