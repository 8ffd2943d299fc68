use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const NOVA_CANVAS_MODEL_ID: &str = "amazon.nova-canvas-v1:0";
pub const TEXT_IMAGE_TASK: &str = "TEXT_IMAGE";
pub const CFG_SCALE: u32 = 3;
pub const NUMBER_OF_IMAGES: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    #[default]
    Standard,
    Premium,
}

impl ImageQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageQuality::Standard => "standard",
            ImageQuality::Premium => "premium",
        }
    }
}

impl fmt::Display for ImageQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(ImageQuality::Standard),
            "premium" => Ok(ImageQuality::Premium),
            other => Err(format!("Unknown image quality: {}", other)),
        }
    }
}

/// Parameters for a single text-to-image generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub quality: ImageQuality,
    pub width: u32,
    pub height: u32,
    pub seed: i64,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: String::new(),
            quality: ImageQuality::Standard,
            width: 1024,
            height: 1024,
            seed: 0,
        }
    }

    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = negative_prompt.into();
        self
    }

    pub fn with_quality(mut self, quality: ImageQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovaCanvasRequest {
    pub task_type: String,
    pub text_to_image_params: TextToImageParams,
    pub image_generation_config: ImageGenerationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextToImageParams {
    pub text: String,
    pub negative_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationConfig {
    pub width: u32,
    pub height: u32,
    pub quality: ImageQuality,
    pub cfg_scale: u32,
    pub seed: i64,
    pub number_of_images: u32,
}

impl From<&GenerationRequest> for NovaCanvasRequest {
    fn from(request: &GenerationRequest) -> Self {
        NovaCanvasRequest {
            task_type: TEXT_IMAGE_TASK.to_string(),
            text_to_image_params: TextToImageParams {
                text: request.prompt.clone(),
                negative_text: request.negative_prompt.clone(),
            },
            image_generation_config: ImageGenerationConfig {
                width: request.width,
                height: request.height,
                quality: request.quality,
                cfg_scale: CFG_SCALE,
                seed: request.seed,
                number_of_images: NUMBER_OF_IMAGES,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovaCanvasResponse {
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
