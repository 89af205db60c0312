//! Storyreel AI - Storyboard image generation
//!
//! Provides:
//! - `GenerationRequest` / `GenerationParams`: the prompt plus the fixed
//!   realistic-vision payload
//! - `ImageGenerator`: blocking text-to-image contract
//! - `FalImageGenerator`: fal.ai synchronous endpoint client
//! - `GenerationDispatcher`: runs a generator on the tokio blocking pool and
//!   reports completion through a callback

pub mod dispatcher;
pub mod error;
pub mod fal;
pub mod request;

pub use dispatcher::{GenerationDispatcher, GenerationOutcome};
pub use error::{AiError, AiResult};
pub use fal::{parse_image_urls, FalImageGenerator};
pub use request::{GenerationParams, GenerationRequest, ImageGenerator, ImageSize, Lora};
