//! Chat client: one interface over Ollama, OpenAI-compatible APIs, or nothing.

use std::future::Future;
use std::time::{Duration, Instant};

use hearth_core::config::LlmConfig;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::types::{ChatRequest, ChatResponse};

/// Anything that can turn a [`ChatRequest`] into an NPC reply.
pub trait ChatBackend: Send + Sync {
    /// Produce a reply. Errors are turned into the fallback line by the caller.
    fn complete(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, LlmError>> + Send;
}

impl<B: ChatBackend> ChatBackend for std::sync::Arc<B> {
    fn complete(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, LlmError>> + Send {
        (**self).complete(request)
    }
}

/// Provider backend for chat completion.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    /// Ollama running locally.
    Ollama {
        /// Server root, e.g. `http://localhost:11434`.
        base_url: String,
    },
    /// OpenAI-compatible API.
    OpenAiCompatible {
        /// API root, e.g. `https://api.openai.com`.
        base_url: String,
        /// Bearer token.
        api_key: String,
    },
    /// No backend; every call fails and the NPC apologises.
    None,
}

/// The HTTP chat client that routes requests to the configured provider.
#[derive(Debug, Clone)]
pub struct LlmClient {
    provider: LlmProvider,
    http: Client,
    model: String,
    max_retries: u32,
    timeout_ms: u64,
}

impl LlmClient {
    /// Create a new client.
    #[must_use]
    pub fn new(provider: LlmProvider, model: impl Into<String>, max_retries: u32) -> Self {
        Self {
            provider,
            http: Client::new(),
            model: model.into(),
            max_retries,
            timeout_ms: 10_000,
        }
    }

    /// Create a client with no backend.
    #[must_use]
    pub fn none() -> Self {
        Self::new(LlmProvider::None, String::new(), 0)
    }

    /// Build a client from the `[llm]` config section.
    ///
    /// # Errors
    /// Returns [`LlmError::ConfigError`] for an unknown provider, or when the
    /// OpenAI provider is selected and its API key variable is unset.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let base = |fallback: &str| {
            if config.base_url.is_empty() {
                fallback.to_string()
            } else {
                config.base_url.trim_end_matches('/').to_string()
            }
        };
        let provider = match config.provider.to_lowercase().as_str() {
            "none" | "" => LlmProvider::None,
            "ollama" => LlmProvider::Ollama {
                base_url: base("http://localhost:11434"),
            },
            "openai" => {
                let api_key = std::env::var(&config.api_key_env).map_err(|_| {
                    LlmError::ConfigError(format!("{} is not set", config.api_key_env))
                })?;
                LlmProvider::OpenAiCompatible {
                    base_url: base("https://api.openai.com"),
                    api_key,
                }
            }
            other => {
                return Err(LlmError::ConfigError(format!("unknown provider '{other}'")));
            }
        };
        let mut client = Self::new(provider, config.model.clone(), config.max_retries);
        client.timeout_ms = config.request_timeout_ms;
        Ok(client)
    }

    /// Model name sent with every request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Default per-request timeout in milliseconds.
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Check if the client has a backend configured.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self.provider, LlmProvider::None)
    }

    /// Send `request` to the configured provider.
    ///
    /// # Errors
    /// Returns `Err` if no provider is configured or all retries fail.
    pub async fn generate(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        match &self.provider {
            LlmProvider::None => Err(LlmError::Unavailable("No LLM provider configured".into())),
            LlmProvider::Ollama { base_url } => {
                let url = format!("{base_url}/api/chat");
                let body = json!({
                    "model": self.model,
                    "messages": request.messages,
                    "stream": false,
                    "options": {
                        "temperature": request.temperature,
                        "num_predict": request.max_tokens,
                    }
                });
                let json = self.post_with_retries(&url, None, &body, request).await?;
                Ok(ChatResponse {
                    text: json["message"]["content"].as_str().unwrap_or_default().to_string(),
                    tokens_generated: token_count(&json["eval_count"]),
                    latency_ms: 0,
                    model: self.model.clone(),
                })
            }
            LlmProvider::OpenAiCompatible { base_url, api_key } => {
                let url = format!("{base_url}/v1/chat/completions");
                let body = json!({
                    "model": self.model,
                    "messages": request.messages,
                    "max_tokens": request.max_tokens,
                    "temperature": request.temperature,
                });
                let json = self
                    .post_with_retries(&url, Some(api_key.as_str()), &body, request)
                    .await?;
                Ok(ChatResponse {
                    text: json["choices"][0]["message"]["content"]
                        .as_str()
                        .unwrap_or_default()
                        .to_string(),
                    tokens_generated: token_count(&json["usage"]["completion_tokens"]),
                    latency_ms: 0,
                    model: self.model.clone(),
                })
            }
        }
    }

    async fn post_with_retries(
        &self,
        url: &str,
        api_key: Option<&str>,
        body: &serde_json::Value,
        request: &ChatRequest,
    ) -> Result<serde_json::Value, LlmError> {
        let mut last_error = String::new();
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!(attempt = attempt + 1, max = self.max_retries + 1, "retrying chat call");
            }

            let start = Instant::now();
            let mut builder = self
                .http
                .post(url)
                .json(body)
                .timeout(Duration::from_millis(request.timeout_ms));
            if let Some(key) = api_key {
                builder = builder.bearer_auth(key);
            }

            match builder.send().await.map_err(LlmError::from) {
                Ok(resp) if resp.status().is_success() => {
                    let json: serde_json::Value = resp.json().await?;
                    debug!(url, latency_ms = start.elapsed().as_millis(), "chat call succeeded");
                    return Ok(json);
                }
                Ok(resp) => {
                    last_error = format!("HTTP {}", resp.status());
                    warn!(url, error = %last_error, "chat provider returned error");
                }
                // The player is waiting; a slow provider is not retried.
                Err(LlmError::Timeout(_)) => {
                    warn!(url, timeout_ms = request.timeout_ms, "chat request timed out");
                    return Err(LlmError::Timeout(request.timeout_ms));
                }
                Err(e) => {
                    last_error = e.to_string();
                    warn!(url, error = %last_error, "chat request failed");
                }
            }
        }

        Err(LlmError::RetriesExhausted {
            attempts: self.max_retries + 1,
            last_error,
        })
    }
}

impl ChatBackend for LlmClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let start = Instant::now();
        let mut response = self.generate(request).await?;
        response.latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        Ok(response)
    }
}

fn token_count(value: &serde_json::Value) -> u32 {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}
