use super::inference::{BedrockConnector, Connector, ScopedClient};
use crate::{
    config::{BedrockConfig, ClientConfig},
    error::{BedrockError, Result},
    logger,
    models::{
        GenerationRequest, ImageQuality, NovaCanvasRequest, NovaCanvasResponse,
        NOVA_CANVAS_MODEL_ID,
    },
};
use std::sync::Arc;
use uuid::Uuid;

const PROMPT_PREVIEW_CHARS: usize = 50;

/// Text-to-image client for Amazon Nova Canvas.
///
/// Every call opens its own inference client from the stored configuration,
/// runs the blocking request on tokio's blocking pool and closes the client
/// before returning.
#[derive(Clone)]
pub struct ImageClient {
    config: BedrockConfig,
    connector: Arc<dyn Connector>,
}

impl ImageClient {
    pub fn new(config: BedrockConfig) -> Self {
        Self::with_connector(config, Arc::new(BedrockConnector::new()))
    }

    pub fn with_connector(config: BedrockConfig, connector: Arc<dyn Connector>) -> Self {
        Self { config, connector }
    }

    pub fn config(&self) -> &BedrockConfig {
        &self.config
    }

    pub async fn create_image(
        &self,
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
        self.generate(request).await
    }

    /// Returns the first generated image, base64 encoded as the service sent it.
    pub async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let request_id = Uuid::new_v4();
        let preview = prompt_preview(&request.prompt);

        log::info!(
            "[req:{}] Generating image with model {}: {}",
            request_id,
            NOVA_CANVAS_MODEL_ID,
            preview
        );

        let outcome = self.run(&request).await;

        match &outcome {
            Ok(image) => log::info!(
                "[req:{}] Image generated successfully ({} base64 chars)",
                request_id,
                image.len()
            ),
            Err(e) => log::error!(
                "[req:{}] Error generating image for prompt '{}' ({}): {}",
                request_id,
                preview,
                e.kind(),
                e
            ),
        }

        outcome
    }

    async fn run(&self, request: &GenerationRequest) -> Result<String> {
        let client_config = ClientConfig::from_bedrock(&self.config);
        let payload = serde_json::to_vec(&NovaCanvasRequest::from(request))
            .map_err(|e| BedrockError::SerializationError(e.to_string()))?;

        log::debug!(
            "Image generation request payload: {}",
            String::from_utf8_lossy(&payload)
        );

        let connector = Arc::clone(&self.connector);
        tokio::task::spawn_blocking(move || {
            let _timer = logger::timer("nova-canvas invoke_model");
            let mut client = ScopedClient::new(connector.connect(&client_config)?);
            let body = client.invoke_model(NOVA_CANVAS_MODEL_ID, payload)?;
            first_image(&body)
        })
        .await
        .map_err(|e| BedrockError::InternalError(format!("Image generation task failed: {}", e)))?
    }
}

fn first_image(body: &[u8]) -> Result<String> {
    let response: NovaCanvasResponse = serde_json::from_slice(body)
        .map_err(|e| BedrockError::ResponseError(e.to_string()))?;

    if let Some(error) = response.error.as_deref().filter(|e| !e.is_empty()) {
        log::warn!("Nova Canvas reported an error alongside its images: {}", error);
    }

    response
        .images
        .into_iter()
        .next()
        .ok_or_else(|| BedrockError::ResponseError("No images generated".into()))
}

fn prompt_preview(prompt: &str) -> String {
    let mut chars = prompt.chars();
    let head: String = chars.by_ref().take(PROMPT_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
