//! fal.ai client.

use std::time::Duration;

use serde::Deserialize;
use storyreel_core::GenerationConfig;
use tracing::{debug, info};

use crate::error::{AiError, AiResult};
use crate::request::{GenerationRequest, ImageGenerator};

#[derive(Debug, Deserialize)]
struct FalResponse {
    #[serde(default)]
    images: Vec<FalImage>,
}

#[derive(Debug, Deserialize)]
struct FalImage {
    url: String,
}

/// Extract image URLs from a fal.ai response body.
pub fn parse_image_urls(body: &str) -> AiResult<Vec<String>> {
    let response: FalResponse =
        serde_json::from_str(body).map_err(|e| AiError::InvalidResponse(e.to_string()))?;
    let urls: Vec<String> = response
        .images
        .into_iter()
        .map(|image| image.url)
        .filter(|url| !url.is_empty())
        .collect();
    if urls.is_empty() {
        return Err(AiError::NoImages);
    }
    Ok(urls)
}

/// Posts requests to fal.ai's synchronous run endpoint.
pub struct FalImageGenerator {
    url: String,
    api_key: String,
    timeout: Duration,
}

impl FalImageGenerator {
    /// Build a client, reading the key from `config.api_key_env`.
    pub fn from_config(config: &GenerationConfig) -> AiResult<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AiError::MissingApiKey {
                env: config.api_key_env.clone(),
            })?;
        Ok(Self::with_api_key(config, api_key))
    }

    pub fn with_api_key(config: &GenerationConfig, api_key: impl Into<String>) -> Self {
        let url = format!(
            "{}/{}",
            config.endpoint.trim_end_matches('/'),
            config.application.trim_start_matches('/')
        );
        Self {
            url,
            api_key: api_key.into(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ImageGenerator for FalImageGenerator {
    fn generate(&self, request: &GenerationRequest) -> AiResult<Vec<String>> {
        let body = serde_json::to_string(&request.params)
            .map_err(|e| AiError::InvalidResponse(format!("cannot encode request: {e}")))?;

        info!(request = %request.id, url = %self.url, "Submitting generation request");
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let response = agent
            .post(&self.url)
            .set("Authorization", &format!("Key {}", self.api_key))
            .set("Content-Type", "application/json")
            .send_string(&body);

        let text = match response {
            Ok(resp) => resp.into_string()?,
            Err(ureq::Error::Status(status, resp)) => {
                let message = resp.into_string().unwrap_or_default();
                return Err(AiError::Http { status, message });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(AiError::Transport(transport.to_string()));
            }
        };

        let urls = parse_image_urls(&text)?;
        debug!(request = %request.id, count = urls.len(), "Generation response parsed");
        Ok(urls)
    }

    fn name(&self) -> &str {
        "fal.ai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_image_urls() {
        let body = r#"{
            "images": [
                { "url": "https://fal.media/a.png", "width": 1080, "height": 608 },
                { "url": "https://fal.media/b.png", "width": 1080, "height": 608 }
            ],
            "seed": 42
        }"#;
        assert_eq!(
            parse_image_urls(body).unwrap(),
            ["https://fal.media/a.png", "https://fal.media/b.png"]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_image_urls(r#"{ "images": [] }"#),
            Err(AiError::NoImages)
        ));
        assert!(matches!(parse_image_urls("{}"), Err(AiError::NoImages)));
        assert!(matches!(
            parse_image_urls("<html>"),
            Err(AiError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_missing_key() {
        let config = GenerationConfig {
            api_key_env: "STORYREEL_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..Default::default()
        };
        let err = FalImageGenerator::from_config(&config).err().unwrap();
        assert!(matches!(err, AiError::MissingApiKey { .. }));
    }

    #[test]
    fn test_url_join() {
        let config = GenerationConfig {
            endpoint: "https://fal.run/".into(),
            ..Default::default()
        };
        let generator = FalImageGenerator::with_api_key(&config, "k");
        assert_eq!(generator.url(), "https://fal.run/fal-ai/realistic-vision");
    }
}
