/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct, which turns a
 * `TranslationRequest` into a provider call. It owns everything the
 * pipeline should not care about: prompt rendering, retries with
 * exponential backoff and request throttling.
 */

use async_trait::async_trait;
use log::{debug, error, warn};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use url::Url;

use super::prompts::PromptTemplate;
use super::{TextStream, TranslationRequest, Translator};
use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::providers::Provider;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::ollama::{ChatRequest, Ollama};
use crate::providers::openai::{OpenAI, OpenAIRequest};

/// Translation provider implementation variants
enum TranslationProviderImpl {
    /// OpenAI API service
    OpenAI {
        /// Client instance
        client: OpenAI,
    },

    /// Anthropic API service
    Anthropic {
        /// Client instance
        client: Anthropic,
    },

    /// Ollama LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },
}

/// Delay before retry number `attempt` (1-based)
fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    let factor = 1u64 << attempt.saturating_sub(1).min(16);
    Duration::from_millis(base_ms.saturating_mul(factor))
}

/// Minimum spacing between requests for a requests-per-minute limit
fn min_request_interval(rate_limit: Option<u32>) -> Option<Duration> {
    match rate_limit {
        Some(per_minute) if per_minute > 0 => Some(Duration::from_millis(60_000 / per_minute as u64)),
        _ => None,
    }
}

/// Validate a provider endpoint and return it without a trailing slash
fn validate_endpoint(endpoint: &str) -> Result<String, TranslationError> {
    let url = Url::parse(endpoint)
        .map_err(|e| TranslationError::Configuration(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(endpoint.trim_end_matches('/').to_string()),
        scheme => Err(TranslationError::Configuration(format!(
            "Unsupported endpoint scheme '{}' in {}",
            scheme, endpoint
        ))),
    }
}

/// Provider-backed translation service
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// Model used for every request
    model: String,

    /// Minimum spacing between requests
    min_interval: Option<Duration>,

    /// Time the last request was sent
    last_request: Mutex<Option<Instant>>,
}

impl std::fmt::Debug for TranslationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationService")
            .field("provider", &self.config.provider)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    ///
    /// Fails with `TranslationError::Configuration` when a remote provider has
    /// no API key or the endpoint is not an http(s) URL.
    pub fn new(config: TranslationConfig) -> Result<Self, TranslationError> {
        let endpoint = validate_endpoint(&config.get_endpoint())?;
        let timeout_secs = config.get_timeout_secs();

        let api_key = config.get_api_key();
        if config.provider.requires_api_key() && api_key.is_empty() {
            return Err(TranslationError::Configuration(format!(
                "No API key configured for {}",
                config.provider.display_name()
            )));
        }

        let client_error = |e: ProviderError| {
            TranslationError::Configuration(format!("Failed to build {} client: {}", config.provider, e))
        };

        let provider = match config.provider {
            ConfigTranslationProvider::OpenAI => TranslationProviderImpl::OpenAI {
                client: OpenAI::new(api_key, endpoint, timeout_secs).map_err(client_error)?,
            },
            ConfigTranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new(api_key, endpoint, timeout_secs).map_err(client_error)?,
            },
            ConfigTranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::new(endpoint, timeout_secs).map_err(client_error)?,
            },
        };

        Ok(Self {
            provider,
            model: config.get_model(),
            min_interval: min_request_interval(config.get_rate_limit()),
            last_request: Mutex::new(None),
            config,
        })
    }

    /// Model name requests are sent to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        debug!("Testing connection to {} with model {}", self.config.provider, self.model);
        let result = match &self.provider {
            TranslationProviderImpl::OpenAI { client } => client.test_connection().await,
            TranslationProviderImpl::Anthropic { client } => client.test_connection().await,
            TranslationProviderImpl::Ollama { client } => client.test_connection().await,
        };

        if let Err(e) = &result {
            error!("Failed to connect to {}: {}", self.config.provider, e);
        }
        result
    }

    /// Wait until the configured rate limit allows another request
    async fn throttle(&self) {
        let Some(interval) = self.min_interval else {
            return;
        };

        let mut last_request = self.last_request.lock().await;
        if let Some(last) = *last_request {
            let elapsed = last.elapsed();
            if elapsed < interval {
                tokio::time::sleep(interval - elapsed).await;
            }
        }
        *last_request = Some(Instant::now());
    }

    /// Run an operation, retrying transient failures with exponential backoff
    async fn with_retry<T, F, Fut>(&self, what: &str, mut operation: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let max_retries = self.config.common.retry_count;
        let mut attempt = 0;

        loop {
            self.throttle().await;

            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < max_retries => {
                    attempt += 1;
                    let delay = backoff_delay(self.config.common.retry_backoff_ms, attempt);
                    warn!(
                        "{} {} failed: {} - retrying in {:?} (attempt {}/{})",
                        self.config.provider, what, e, delay, attempt + 1, max_retries + 1
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!("{} {} failed: {}", self.config.provider, what, e);
                    return Err(e);
                }
            }
        }
    }

    fn openai_request(&self, request: &TranslationRequest) -> OpenAIRequest {
        let prompt = PromptTemplate::for_content(request.content).render(&request.target_language, &request.text);
        OpenAIRequest::new(&self.model)
            .add_message("system", prompt.system)
            .add_message("user", prompt.user)
            .temperature(self.config.common.temperature)
            .max_tokens(self.config.common.max_tokens)
    }

    fn anthropic_request(&self, request: &TranslationRequest) -> AnthropicRequest {
        let prompt = PromptTemplate::for_content(request.content).render(&request.target_language, &request.text);
        AnthropicRequest::new(&self.model, self.config.common.max_tokens)
            .system(prompt.system)
            .add_message("user", prompt.user)
            .temperature(self.config.common.temperature)
    }

    fn ollama_request(&self, request: &TranslationRequest) -> ChatRequest {
        let prompt = PromptTemplate::for_content(request.content).render(&request.target_language, &request.text);
        ChatRequest::new(&self.model)
            .add_message("system", prompt.system)
            .add_message("user", prompt.user)
            .temperature(self.config.common.temperature)
            .num_predict(self.config.common.max_tokens)
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let start_time = Instant::now();

        let text = match &self.provider {
            TranslationProviderImpl::OpenAI { client } => {
                let response = self
                    .with_retry("request", || client.complete(self.openai_request(request)))
                    .await?;
                if let Some(usage) = &response.usage {
                    debug!("OpenAI usage: {} prompt / {} completion tokens", usage.prompt_tokens, usage.completion_tokens);
                }
                OpenAI::extract_text(&response)
            }
            TranslationProviderImpl::Anthropic { client } => {
                let response = self
                    .with_retry("request", || client.complete(self.anthropic_request(request)))
                    .await?;
                if response.stop_reason.as_deref() == Some("max_tokens") {
                    warn!("Anthropic response was cut at max_tokens ({})", self.config.common.max_tokens);
                }
                Anthropic::extract_text(&response)
            }
            TranslationProviderImpl::Ollama { client } => {
                let response = self
                    .with_retry("request", || client.complete(self.ollama_request(request)))
                    .await?;
                Ollama::extract_text(&response)
            }
        };

        debug!(
            "{} translated {} chars of {} in {:?}",
            self.config.provider,
            request.text.chars().count(),
            request.content,
            start_time.elapsed()
        );
        Ok(text)
    }

    async fn translate_stream(&self, request: &TranslationRequest) -> Result<TextStream, ProviderError> {
        // Only opening the stream is retried; a failure mid-stream is final
        match &self.provider {
            TranslationProviderImpl::OpenAI { client } => {
                self.with_retry("stream", || client.stream(self.openai_request(request))).await
            }
            TranslationProviderImpl::Ollama { client } => {
                self.with_retry("stream", || client.stream(self.ollama_request(request))).await
            }
            TranslationProviderImpl::Anthropic { .. } => {
                let text = self.translate(request).await?;
                Ok(Box::pin(futures::stream::once(async move { Ok(text) })))
            }
        }
    }

    async fn check_connection(&self) -> Result<(), ProviderError> {
        self.test_connection().await
    }
}
