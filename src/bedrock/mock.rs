use super::inference::{Connector, InferenceClient};
use crate::{
    config::ClientConfig,
    error::{BedrockError, Result},
};
use base64::Engine as _;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// 1x1 PNG returned when no reply has been scripted.
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
    0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0x99, 0x63, 0xF8,
    0xCF, 0xC0, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0xE2, 0x25, 0x00, 0xBC, 0x00, 0x00, 0x00,
    0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[derive(Debug, Clone)]
pub enum MockReply {
    Body(Vec<u8>),
    Error(BedrockError),
}

// A panicking test thread must not hide the recorded calls from the others.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct MockState {
    replies: Mutex<Vec<MockReply>>,
    connect_error: Mutex<Option<BedrockError>>,
    delay: Mutex<Duration>,
    invocations: AtomicUsize,
    connections: AtomicUsize,
    closes: AtomicUsize,
    bodies: Mutex<Vec<Vec<u8>>>,
    model_ids: Mutex<Vec<String>>,
    configs: Mutex<Vec<ClientConfig>>,
}

/// In-memory [`Connector`] that records every client it hands out.
///
/// Scripted replies are served in order and cycle once exhausted.
#[derive(Clone, Default)]
pub struct MockConnector {
    state: Arc<MockState>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(self, body: impl Into<Vec<u8>>) -> Self {
        lock(&self.state.replies).push(MockReply::Body(body.into()));
        self
    }

    pub fn with_json(self, value: serde_json::Value) -> Self {
        self.with_body(value.to_string())
    }

    pub fn with_error(self, error: BedrockError) -> Self {
        lock(&self.state.replies).push(MockReply::Error(error));
        self
    }

    pub fn with_connect_error(self, error: BedrockError) -> Self {
        *lock(&self.state.connect_error) = Some(error);
        self
    }

    /// Blocks the calling thread this long inside every `invoke_model`.
    pub fn with_delay(self, delay: Duration) -> Self {
        *lock(&self.state.delay) = delay;
        self
    }

    pub fn connection_count(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.state.closes.load(Ordering::SeqCst)
    }

    pub fn invocation_count(&self) -> usize {
        self.state.invocations.load(Ordering::SeqCst)
    }

    pub fn request_bodies(&self) -> Vec<serde_json::Value> {
        lock(&self.state.bodies)
            .iter()
            .map(|body| serde_json::from_slice(body).unwrap_or(serde_json::Value::Null))
            .collect()
    }

    pub fn model_ids(&self) -> Vec<String> {
        lock(&self.state.model_ids).clone()
    }

    pub fn client_configs(&self) -> Vec<ClientConfig> {
        lock(&self.state.configs).clone()
    }

    pub fn default_body() -> Vec<u8> {
        let image = base64::engine::general_purpose::STANDARD.encode(TINY_PNG);
        serde_json::json!({ "images": [image] }).to_string().into_bytes()
    }
}

impl Connector for MockConnector {
    fn connect(&self, config: &ClientConfig) -> Result<Box<dyn InferenceClient>> {
        lock(&self.state.configs).push(config.clone());

        if let Some(err) = lock(&self.state.connect_error).clone() {
            return Err(err);
        }

        self.state.connections.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockInferenceClient {
            state: Arc::clone(&self.state),
        }))
    }
}

struct MockInferenceClient {
    state: Arc<MockState>,
}

impl InferenceClient for MockInferenceClient {
    fn invoke_model(&mut self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        let call = self.state.invocations.fetch_add(1, Ordering::SeqCst);
        lock(&self.state.bodies).push(body);
        lock(&self.state.model_ids).push(model_id.to_string());

        let delay = *lock(&self.state.delay);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }

        let reply = {
            let replies = lock(&self.state.replies);
            if replies.is_empty() {
                MockReply::Body(MockConnector::default_body())
            } else {
                replies[call % replies.len()].clone()
            }
        };

        match reply {
            MockReply::Body(body) => Ok(body),
            MockReply::Error(err) => Err(err),
        }
    }

    // Counted on every call so a double close is visible.
    fn close(&mut self) {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BedrockConfig;

    #[test]
    fn test_mock_default_reply_is_single_png() {
        let connector = MockConnector::new();
        let config = ClientConfig::from_bedrock(&BedrockConfig::new());
        let mut client = connector.connect(&config).unwrap();

        let body = client.invoke_model("model", b"{}".to_vec()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let image = value["images"][0].as_str().unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(image)
            .unwrap();
        assert_eq!(decoded, TINY_PNG);

        client.close();
        assert_eq!(connector.connection_count(), 1);
        assert_eq!(connector.close_count(), 1);
    }

    #[test]
    fn test_mock_replies_cycle() {
        let connector = MockConnector::new()
            .with_body("first")
            .with_error(BedrockError::AwsError("timed out".into()));
        let config = ClientConfig::from_bedrock(&BedrockConfig::new());
        let mut client = connector.connect(&config).unwrap();

        assert_eq!(client.invoke_model("m", vec![]).unwrap(), b"first");
        assert!(client.invoke_model("m", vec![]).is_err());
        assert_eq!(client.invoke_model("m", vec![]).unwrap(), b"first");
        assert_eq!(connector.invocation_count(), 3);
    }

    #[test]
    fn test_lock_recovers_from_poisoned_mutex() {
        let shared = Arc::new(Mutex::new(vec![1]));
        let poisoner = Arc::clone(&shared);
        let outcome = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("test thread failed while recording");
        })
        .join();

        assert!(outcome.is_err());
        assert!(shared.is_poisoned());
        lock(&*shared).push(2);
        assert_eq!(*lock(&*shared), vec![1, 2]);
    }
}
