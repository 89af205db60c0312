//! Runs generation off the UI thread.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::AiResult;
use crate::request::{GenerationRequest, ImageGenerator};

/// A finished request, successful or not.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub request: GenerationRequest,
    pub result: AiResult<Vec<String>>,
}

/// Hands requests to an [`ImageGenerator`] on the tokio blocking pool.
///
/// The dispatcher does not track what is in flight; the caller decides
/// whether a new request may start.
#[derive(Clone)]
pub struct GenerationDispatcher {
    handle: Handle,
    generator: Arc<dyn ImageGenerator>,
}

impl GenerationDispatcher {
    pub fn new(handle: Handle, generator: Arc<dyn ImageGenerator>) -> Self {
        Self { handle, generator }
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Start `request`. `on_complete` runs on a worker thread once the
    /// generator returns.
    pub fn submit<F>(&self, request: GenerationRequest, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(GenerationOutcome) + Send + 'static,
    {
        let generator = Arc::clone(&self.generator);
        info!(
            request = %request.id,
            generator = generator.name(),
            prompt = %request.prompt(),
            "Generation dispatched"
        );
        self.handle.spawn_blocking(move || {
            let result = generator.generate(&request);
            match &result {
                Ok(urls) => info!(request = %request.id, images = urls.len(), "Generation finished"),
                Err(e) => warn!(request = %request.id, error = %e, "Generation failed"),
            }
            on_complete(GenerationOutcome { request, result });
        })
    }
}
