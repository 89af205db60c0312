//! Error types for image generation.

use storyreel_core::StoryError;
use thiserror::Error;

/// Errors that can occur while generating images.
#[derive(Debug, Error)]
pub enum AiError {
    /// The prompt was empty after trimming.
    #[error("Prompt is empty")]
    EmptyPrompt,

    /// The API key environment variable is not set.
    #[error("Missing API key: set {env}")]
    MissingApiKey { env: String },

    /// The service answered with a non-success status.
    #[error("Generation service returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection, DNS, TLS or timeout failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body was not what the service documents.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The service succeeded but returned no images.
    #[error("No images returned")]
    NoImages,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for AI operations.
pub type AiResult<T> = std::result::Result<T, AiError>;

impl From<AiError> for StoryError {
    fn from(err: AiError) -> Self {
        StoryError::Generation(err.to_string())
    }
}
