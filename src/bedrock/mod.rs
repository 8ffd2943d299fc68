pub mod image_client;
pub mod inference;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use image_client::ImageClient;
pub use inference::{BedrockConnector, Connector, InferenceClient, ScopedClient};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockConnector;
