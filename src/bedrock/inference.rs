use crate::{
    config::ClientConfig,
    error::{BedrockError, Result},
};
use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};
use aws_sdk_bedrockruntime::{
    config::{Credentials, Region},
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    operation::invoke_model::InvokeModelError,
    primitives::Blob,
    Client,
};
use std::ops::{Deref, DerefMut};
use tokio::runtime::Handle;

/// A blocking handle to a model endpoint, owned by exactly one request.
pub trait InferenceClient: Send {
    /// Sends `body` to `model_id` and blocks until the response body arrives.
    fn invoke_model(&mut self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>>;

    fn close(&mut self);
}

/// Opens a fresh [`InferenceClient`] for one call.
pub trait Connector: Send + Sync {
    fn connect(&self, config: &ClientConfig) -> Result<Box<dyn InferenceClient>>;
}

/// Closes the wrapped client when it goes out of scope, on every exit path.
pub struct ScopedClient {
    inner: Box<dyn InferenceClient>,
}

impl ScopedClient {
    pub fn new(inner: Box<dyn InferenceClient>) -> Self {
        Self { inner }
    }
}

impl Deref for ScopedClient {
    type Target = dyn InferenceClient;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl DerefMut for ScopedClient {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.inner.as_mut()
    }
}

impl Drop for ScopedClient {
    fn drop(&mut self) {
        self.inner.close();
    }
}

/// Connects to Bedrock Runtime through the AWS SDK.
///
/// Must be called from a runtime worker that is allowed to block, such as a
/// `tokio::task::spawn_blocking` closure.
#[derive(Debug, Clone, Default)]
pub struct BedrockConnector;

impl BedrockConnector {
    pub fn new() -> Self {
        Self
    }
}

impl Connector for BedrockConnector {
    fn connect(&self, config: &ClientConfig) -> Result<Box<dyn InferenceClient>> {
        let runtime = Handle::try_current()
            .map_err(|e| BedrockError::ClientError(format!("No tokio runtime: {}", e)))?;

        let timeouts = TimeoutConfig::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .build();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .timeout_config(timeouts)
            .retry_config(RetryConfig::standard().with_max_attempts(config.max_retry_attempts));

        if let Some(credentials) = &config.credentials {
            loader = loader.credentials_provider(Credentials::new(
                credentials.access_key.clone(),
                credentials.secret_key.clone(),
                None,
                None,
                "bedrock-client",
            ));
        }

        let sdk_config = runtime.block_on(loader.load());
        log::debug!("Bedrock client opened for region {}", config.region);

        Ok(Box::new(BedrockInferenceClient {
            client: Some(Client::new(&sdk_config)),
            runtime,
        }))
    }
}

pub struct BedrockInferenceClient {
    client: Option<Client>,
    runtime: Handle,
}

impl InferenceClient for BedrockInferenceClient {
    fn invoke_model(&mut self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| BedrockError::ClientError("Client already closed".into()))?;

        let send = client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send();

        let response = self.runtime.block_on(send).map_err(classify_sdk_error)?;
        Ok(response.body.into_inner())
    }

    fn close(&mut self) {
        if self.client.take().is_some() {
            log::debug!("Bedrock client closed");
        }
    }
}

fn classify_sdk_error(err: SdkError<InvokeModelError>) -> BedrockError {
    log::debug!("AWS SDK image generation error details: {:?}", err);

    if let Some(service_error) = err.as_service_error() {
        return BedrockError::AwsServiceError {
            code: service_error.code().unwrap_or("unknown").to_string(),
            message: service_error.message().unwrap_or("no message").to_string(),
        };
    }

    match &err {
        SdkError::ConstructionFailure(_) => {
            BedrockError::ClientError(DisplayErrorContext(&err).to_string())
        }
        _ => BedrockError::AwsError(DisplayErrorContext(&err).to_string()),
    }
}
