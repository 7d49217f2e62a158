// Application configuration: defaults, overridable from the environment
use crate::catalog::SAMPLE_JSON_PATH;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_CATALOG_PATH: &str = "GLOBO_CATALOG_PATH";
pub const ENV_WIT_BASE_URL: &str = "WIT_BASE_URL";
pub const ENV_WIT_TOKEN: &str = "WIT_AI_TOKEN";
pub const ENV_WIT_API_VERSION: &str = "WIT_API_VERSION";
pub const ENV_WIT_TIMEOUT_MS: &str = "WIT_TIMEOUT_MS";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

// Intent classification service settings
#[derive(Clone, PartialEq)]
pub struct IntentConfig {
    pub base_url: String,
    // Without a token the question feature is disabled
    pub access_token: Option<String>,
    pub api_version: String,
    pub timeout_ms: u64,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.wit.ai".to_string(),
            access_token: None,
            api_version: "20240101".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl IntentConfig {
    pub fn is_enabled(&self) -> bool {
        self.access_token
            .as_deref()
            .map_or(false, |t| !t.trim().is_empty())
    }
}

// Keep the bearer token out of logs
impl fmt::Debug for IntentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntentConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("api_version", &self.api_version)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub catalog_path: PathBuf,
    pub intent: IntentConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(SAMPLE_JSON_PATH),
            intent: IntentConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Unset or blank variables keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(ENV_CATALOG_PATH) {
            config.catalog_path = PathBuf::from(path);
        }
        if let Some(url) = get(ENV_WIT_BASE_URL) {
            config.intent.base_url = url;
        }
        if let Some(token) = get(ENV_WIT_TOKEN) {
            config.intent.access_token = Some(token);
        }
        if let Some(version) = get(ENV_WIT_API_VERSION) {
            config.intent.api_version = version;
        }
        if let Some(timeout) = get(ENV_WIT_TIMEOUT_MS) {
            config.intent.timeout_ms = timeout.trim().parse().map_err(|_| {
                ConfigError::InvalidValue {
                    key: ENV_WIT_TIMEOUT_MS.to_string(),
                    value: timeout.clone(),
                }
            })?;
        }

        Ok(config)
    }
}
