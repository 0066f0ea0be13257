use std::time::Duration;

use once_cell::sync::Lazy;

pub const ENV_API_BASE: &str = "CLUSTERDESK_API_BASE";
pub const ENV_GET_RETRIES: &str = "CLUSTERDESK_GET_RETRIES";
pub const ENV_TIMEOUT_SECS: &str = "CLUSTERDESK_TIMEOUT_SECS";

const DEFAULT_API_BASE: &str = "http://localhost:8000/api";
const DEFAULT_GET_RETRIES: u32 = 2;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Process-wide configuration, read from the environment on first use.
pub static CONFIG: Lazy<ClientConfig> = Lazy::new(ClientConfig::from_env);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to, without a trailing slash.
    pub api_base: String,
    /// Extra attempts for GET requests that fail with a retryable error.
    pub get_retries: u32,
    /// Per-request timeout. Not enforced on wasm32.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            get_retries: DEFAULT_GET_RETRIES,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(base) = lookup(ENV_API_BASE).filter(|b| !b.trim().is_empty()) {
            config = config.with_api_base(base);
        }

        if let Some(raw) = lookup(ENV_GET_RETRIES) {
            match raw.trim().parse::<u32>() {
                Ok(n) => config.get_retries = n,
                Err(_) => log::warn!(
                    "{ENV_GET_RETRIES} value '{raw}' is not a number, keeping {}",
                    config.get_retries
                ),
            }
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => log::warn!(
                    "{ENV_TIMEOUT_SECS} value '{raw}' is not a positive number, keeping {:?}",
                    config.timeout
                ),
            }
        }

        log::debug!("client config: {config:?}");
        config
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.api_base = base.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_get_retries(mut self, retries: u32) -> Self {
        self.get_retries = retries;
        self
    }

    /// Join an endpoint path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}
