//! Amazon Nova Canvas text-to-image generation over AWS Bedrock Runtime.
//!
//! [`ImageClient`] takes an injected [`BedrockConfig`]; [`create_image`] reads
//! the configuration from the process environment on every call.

pub mod bedrock;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;

#[cfg(any(test, feature = "mock"))]
pub use bedrock::MockConnector;
pub use bedrock::{BedrockConnector, Connector, ImageClient, InferenceClient};
pub use config::{BedrockConfig, ClientConfig};
pub use error::{BedrockError, Result};
pub use models::{GenerationRequest, ImageQuality, NOVA_CANVAS_MODEL_ID};

use std::sync::Arc;

/// Generates one image with Nova Canvas and returns it base64 encoded.
///
/// Region and credentials are read from `AWS_REGION`, `AWS_ACCESS_KEY` and
/// `AWS_SECRET_ACCESS_KEY` at call time. Without both credentials the SDK's
/// default credential chain is used.
pub async fn create_image(
    prompt: &str,
    negative_prompt: &str,
    quality: ImageQuality,
    width: u32,
    height: u32,
    seed: i64,
) -> Result<String> {
    let request = GenerationRequest {
        prompt: prompt.to_string(),
        negative_prompt: negative_prompt.to_string(),
        quality,
        width,
        height,
        seed,
    };
    generate_from_env(Arc::new(BedrockConnector::new()), request).await
}

/// Runs `request` through `connector` with configuration read from the
/// environment at the moment of the call.
pub async fn generate_from_env(
    connector: Arc<dyn Connector>,
    request: GenerationRequest,
) -> Result<String> {
    ImageClient::with_connector(BedrockConfig::from_env(), connector)
        .generate(request)
        .await
}
