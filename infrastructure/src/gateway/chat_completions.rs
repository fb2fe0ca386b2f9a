//! OpenAI-compatible chat completions adapter
//!
//! Works against any provider exposing `POST {base_url}/v1/chat/completions`
//! (Mistral by default). Each [`generate`](TextGenerationGateway::generate)
//! call renders the instruction into a single user message and sends it with
//! the requested creativity as `temperature`.

use crate::config::FileProviderConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use spotlight_application::{GenerationError, TextGenerationGateway};
use spotlight_domain::{Creativity, InstructionTemplate, SlotValues};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// How often and how patiently transient failures are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubles each time
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn delay(&self, retry: u32) -> Duration {
        self.backoff.saturating_mul(2u32.saturating_pow(retry))
    }

    /// Run `attempt` until it succeeds, fails permanently or retries run out
    pub async fn run<F, Fut>(&self, mut attempt: F) -> Result<String, GenerationError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<String, GenerationError>>,
    {
        let mut retry = 0;
        loop {
            match attempt().await {
                Err(e) if e.is_transient() && retry < self.max_retries => {
                    let delay = self.delay(retry);
                    warn!(
                        "Generation attempt {} failed ({}), retrying in {:?}",
                        retry + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                result => return result,
            }
        }
    }
}

/// Text generation through a chat completions endpoint
pub struct ChatCompletionsGateway {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: Option<u32>,
    retry: RetryPolicy,
}

impl ChatCompletionsGateway {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: completions_endpoint(base_url),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: None,
            retry: RetryPolicy {
                max_retries: 2,
                backoff: Duration::from_millis(500),
            },
        })
    }

    /// Build from the `[provider]` section; fails when no API key is available
    pub fn from_config(config: &FileProviderConfig) -> Result<Self, GenerationError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            GenerationError::MissingCredentials(format!(
                "set {} or provider.api_key",
                config.api_key_env
            ))
        })?;

        let mut gateway = Self::new(
            &config.base_url,
            api_key,
            config.model.as_str(),
            Duration::from_secs(config.timeout_seconds),
        )?
        .with_retry(RetryPolicy {
            max_retries: config.max_retries,
            backoff: Duration::from_millis(config.retry_backoff_ms),
        });
        gateway.max_tokens = config.max_tokens;
        Ok(gateway)
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send_request(&self, body: &ChatCompletionRequest<'_>) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout
                } else {
                    GenerationError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        extract_text(parsed)
    }
}

#[async_trait]
impl TextGenerationGateway for ChatCompletionsGateway {
    async fn generate(
        &self,
        template: &InstructionTemplate,
        slots: &SlotValues,
        creativity: Creativity,
    ) -> Result<String, GenerationError> {
        let prompt = template.render(slots)?;
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: creativity.value(),
            max_tokens: self.max_tokens,
        };

        debug!(
            "Requesting '{}' from {} ({} chars)",
            template.name(),
            self.model,
            prompt.len()
        );
        self.retry.run(|| self.send_request(&request)).await
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn completions_endpoint(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let base = base.strip_suffix("/v1").unwrap_or(base);
    format!("{}{}", base, COMPLETIONS_PATH)
}

fn extract_text(response: ChatCompletionResponse) -> Result<String, GenerationError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(GenerationError::EmptyResponse)
}

fn map_http_error(status: StatusCode, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());

    GenerationError::RequestFailed {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn instant_retries(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            backoff: Duration::ZERO,
        }
    }

    #[test]
    fn test_completions_endpoint() {
        assert_eq!(
            completions_endpoint("https://api.mistral.ai"),
            "https://api.mistral.ai/v1/chat/completions"
        );
        assert_eq!(
            completions_endpoint("http://localhost:11434/v1/"),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_shape() {
        let request = ChatCompletionRequest {
            model: "mistral-large-latest",
            messages: vec![ChatMessage {
                role: "user",
                content: "Say hi",
            }],
            temperature: 0.5,
            max_tokens: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "mistral-large-latest");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["temperature"], 0.5);
        assert!(value.get("max_tokens").is_none());
    }

    #[test]
    fn test_extract_text() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Hello there"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "Hello there");

        let empty: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(extract_text(empty), Err(GenerationError::EmptyResponse));
    }

    #[test]
    fn test_map_http_error_reads_provider_message() {
        let err = map_http_error(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"Invalid API key","type":"auth"}}"#,
        );
        assert_eq!(
            err,
            GenerationError::RequestFailed {
                status: 401,
                message: "Invalid API key".to_string()
            }
        );

        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(err.is_transient());
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy {
            max_retries: 3,
            backoff: Duration::from_millis(100),
        };
        assert_eq!(policy.delay(0), Duration::from_millis(100));
        assert_eq!(policy.delay(2), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failures() {
        let attempts = AtomicU32::new(0);
        let result = instant_retries(2)
            .run(|| {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(GenerationError::Timeout)
                    } else {
                        Ok("finally".to_string())
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "finally");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_retries() {
        let attempts = AtomicU32::new(0);
        let result = instant_retries(1)
            .run(|| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(GenerationError::ConnectionError("refused".to_string())) }
            })
            .await;

        assert!(matches!(result, Err(GenerationError::ConnectionError(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_permanent_failures_are_not_retried() {
        let seen = Mutex::new(Vec::new());
        let result = instant_retries(5)
            .run(|| {
                seen.lock().unwrap().push(());
                async {
                    Err(GenerationError::RequestFailed {
                        status: 400,
                        message: "bad request".to_string(),
                    })
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = FileProviderConfig {
            api_key_env: "SPOTLIGHT_TEST_UNSET_KEY_VAR".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            ChatCompletionsGateway::from_config(&config),
            Err(GenerationError::MissingCredentials(_))
        ));
    }

    #[test]
    fn test_from_config_with_inline_key() {
        let config = FileProviderConfig {
            api_key: Some("secret".to_string()),
            base_url: "https://api.mistral.ai/".to_string(),
            ..Default::default()
        };
        let gateway = ChatCompletionsGateway::from_config(&config).unwrap();
        assert_eq!(gateway.model(), "mistral-large-latest");
        assert_eq!(
            gateway.endpoint(),
            "https://api.mistral.ai/v1/chat/completions"
        );
    }
}
