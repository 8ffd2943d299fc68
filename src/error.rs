use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BedrockError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Client error: {0}")]
    ClientError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Internal error: {0}")]
    InternalError(String),
    /// Transport-level failure: connect, dispatch, timeout, unreadable response.
    #[error("AWS error: {0}")]
    AwsError(String),
    /// The service answered and rejected the request.
    #[error("AWS service error: {code} - {message}")]
    AwsServiceError { code: String, message: String },
}

impl BedrockError {
    pub fn kind(&self) -> &'static str {
        match self {
            BedrockError::ConfigError(_) => "config",
            BedrockError::ClientError(_) => "client",
            BedrockError::RequestError(_) => "request",
            BedrockError::ResponseError(_) => "response",
            BedrockError::SerializationError(_) => "serialization",
            BedrockError::InternalError(_) => "internal",
            BedrockError::AwsError(_) => "aws",
            BedrockError::AwsServiceError { .. } => "aws_service",
        }
    }
}

pub type Result<T> = std::result::Result<T, BedrockError>;
