//! Text generation provider configuration from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat completions provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL; `/v1/chat/completions` is appended
    pub base_url: String,
    pub model: String,
    /// Environment variable name for the API key (default: "MISTRAL_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Retries after the first attempt for transient failures
    pub max_retries: u32,
    pub timeout_seconds: u64,
    /// Delay before the first retry, doubled for each further one
    pub retry_backoff_ms: u64,
    pub max_tokens: Option<u32>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mistral.ai".to_string(),
            model: "mistral-large-latest".to_string(),
            api_key_env: "MISTRAL_API_KEY".to_string(),
            api_key: None,
            max_retries: 2,
            timeout_seconds: 60,
            retry_backoff_ms: 500,
            max_tokens: None,
        }
    }
}

impl FileProviderConfig {
    /// The direct key if set, otherwise the value of `api_key_env`
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.is_empty())
    }
}
