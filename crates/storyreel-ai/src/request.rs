//! Generation requests and the generator contract.

use serde::{Deserialize, Serialize};
use storyreel_core::GenerationConfig;
use uuid::Uuid;

use crate::error::{AiError, AiResult};

/// Negative prompt sent with every request.
pub const NEGATIVE_PROMPT: &str = "(worst quality, low quality, normal quality, lowres, low details, oversaturated, undersaturated, overexposed, underexposed, grayscale, bw, bad photo, bad photography, bad art:1.4), (watermark, signature, text font, username, error, logo, words, letters, digits, autograph, trademark, name:1.2), (blur, blurry, grainy), morbid, ugly, asymmetrical, mutated malformed, mutilated, poorly lit, bad shadow, draft, cropped, out of frame, cut off, censored, jpeg artifacts, out of focus, glitch, duplicate, (airbrushed, cartoon, anime, semi-realistic, cgi, render, blender, digital art, manga, amateur:1.3), (3D ,3D Game, 3D Game Scene, 3D Character:1.1), (bad hands, bad anatomy, bad body, bad face, bad teeth, bad arms, bad legs, deformities:1.3)";

const MODEL_NAME: &str = "SG161222/RealVisXL_V4.0";
const LORA_PATH: &str = "https://civitai.com/api/download/models/209105?type=Model&format=SafeTensor";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lora {
    pub path: String,
    pub scale: f32,
}

/// Request body for the realistic-vision application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub prompt: String,
    pub negative_prompt: String,
    pub model_name: String,
    pub loras: Vec<Lora>,
    pub embeddings: Vec<serde_json::Value>,
    pub image_size: ImageSize,
    pub num_images: u32,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
    pub format: String,
    pub enable_safety_checker: bool,
    pub safety_checker_version: String,
}

impl GenerationParams {
    pub fn new(prompt: impl Into<String>, config: &GenerationConfig) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: NEGATIVE_PROMPT.into(),
            model_name: MODEL_NAME.into(),
            loras: vec![Lora {
                path: LORA_PATH.into(),
                scale: 0.6,
            }],
            embeddings: Vec::new(),
            image_size: ImageSize {
                width: config.image_width,
                height: config.image_height,
            },
            num_images: config.num_images,
            num_inference_steps: 35,
            guidance_scale: 5.0,
            format: "png".into(),
            enable_safety_checker: true,
            safety_checker_version: "v1".into(),
        }
    }
}

/// One prompt submitted for generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub id: Uuid,
    pub params: GenerationParams,
}

impl GenerationRequest {
    /// Build a request from user input. The prompt is trimmed; a blank
    /// prompt is rejected.
    pub fn new(prompt: &str, config: &GenerationConfig) -> AiResult<Self> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AiError::EmptyPrompt);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            params: GenerationParams::new(prompt, config),
        })
    }

    pub fn prompt(&self) -> &str {
        &self.params.prompt
    }
}

/// Blocking text-to-image service. Returns the URLs of the generated images.
pub trait ImageGenerator: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> AiResult<Vec<String>>;

    /// Short name for logs.
    fn name(&self) -> &str {
        "generator"
    }
}
