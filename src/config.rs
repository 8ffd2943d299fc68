use std::env;
use std::time::Duration;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const READ_TIMEOUT: Duration = Duration::from_secs(60);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const MAX_RETRY_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `AWS_REGION`, `AWS_ACCESS_KEY` and `AWS_SECRET_ACCESS_KEY` from the
    /// process environment.
    ///
    /// `AWS_ACCESS_KEY_ID` is left to the SDK's default credential chain so it
    /// stays paired with `AWS_SESSION_TOKEN` for temporary credentials.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let region = non_empty("AWS_REGION");
        let access_key = non_empty("AWS_ACCESS_KEY");
        let secret_key = non_empty("AWS_SECRET_ACCESS_KEY");

        BedrockConfig {
            region,
            access_key,
            secret_key,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn region_or_default(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    pub fn has_credentials(&self) -> bool {
        self.access_key.is_some() && self.secret_key.is_some()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"** redacted **")
            .finish()
    }
}

/// Settings for one inference client. Built per call, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub region: String,
    pub read_timeout: Duration,
    pub connect_timeout: Duration,
    pub max_retry_attempts: u32,
    /// `None` means the SDK's default credential chain resolves them.
    pub credentials: Option<StaticCredentials>,
}

impl ClientConfig {
    pub fn from_bedrock(config: &BedrockConfig) -> Self {
        let credentials = match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) => Some(StaticCredentials {
                access_key: access_key.clone(),
                secret_key: secret_key.clone(),
            }),
            _ => None,
        };

        ClientConfig {
            region: config.region_or_default().to_string(),
            read_timeout: READ_TIMEOUT,
            connect_timeout: CONNECT_TIMEOUT,
            max_retry_attempts: MAX_RETRY_ATTEMPTS,
            credentials,
        }
    }
}
