use async_trait::async_trait;
use futures::StreamExt;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::streaming::{LineEvent, decode_lines};
use super::{Provider, error_from_response};
use crate::errors::ProviderError;
use crate::translation::TextStream;

/// Ollama client for interacting with Ollama API
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

impl std::fmt::Debug for Ollama {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ollama")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Generation options for the Ollama API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Chat message object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

/// Chat request for the Ollama API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model name to use for generation
    model: String,
    /// Messages of the conversation
    messages: Vec<ChatMessage>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    stream: bool,
}

/// Chat response from the Ollama API; one per line when streaming
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Response message
    #[serde(default)]
    pub message: Option<ChatMessage>,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
    /// Error reported by the server
    #[serde(default)]
    pub error: Option<String>,
    /// Number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

/// Version response from the Ollama API
#[derive(Debug, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

impl ChatRequest {
    /// Create a new chat request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            options: None,
            stream: false,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).temperature = Some(temperature);
        self
    }

    /// Set the maximum number of generated tokens
    pub fn num_predict(mut self, num_predict: u32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).num_predict = Some(num_predict);
        self
    }
}

impl Ollama {
    /// Create a new Ollama client for a base URL such as `http://localhost:11434`
    ///
    /// Ollama speaks HTTP/1.1 only.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .http1_only()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(ProviderError::from_reqwest)?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn send(&self, request: &ChatRequest) -> Result<reqwest::Response, ProviderError> {
        let url = format!("{}/api/chat", self.base_url);
        let response = self.client.post(url)
            .json(request)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(error_from_response("Ollama", response).await);
        }

        Ok(response)
    }

    /// Get the server version
    pub async fn version(&self) -> Result<VersionResponse, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response = self.client.get(url)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(error_from_response("Ollama", response).await);
        }

        response.json::<VersionResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Ollama version response: {}", e)))
    }

    /// Stream a chat response as text increments
    pub async fn stream(&self, mut request: ChatRequest) -> Result<TextStream, ProviderError> {
        request.stream = true;
        let response = self.send(&request).await?;
        debug!("Ollama stream opened");

        let bytes = response.bytes_stream().map(|chunk| chunk.map_err(ProviderError::from_reqwest));
        Ok(decode_lines(bytes, parse_chat_line))
    }
}

/// Parse one JSON line of a streamed chat response
pub fn parse_chat_line(line: &str) -> LineEvent {
    let line = line.trim();
    if line.is_empty() {
        return LineEvent::Skip;
    }

    match serde_json::from_str::<ChatResponse>(line) {
        Ok(ChatResponse { error: Some(message), .. }) => {
            LineEvent::Error(ProviderError::RequestFailed(format!("Ollama error: {}", message)))
        }
        Ok(ChatResponse { done: true, message, .. }) => match message {
            Some(message) if !message.content.is_empty() => LineEvent::Text(message.content),
            _ => LineEvent::Done,
        },
        Ok(ChatResponse { message, .. }) => {
            LineEvent::Text(message.map(|m| m.content).unwrap_or_default())
        }
        Err(e) => LineEvent::Error(ProviderError::ParseError(format!(
            "Failed to parse Ollama stream line: {}",
            e
        ))),
    }
}

#[async_trait]
impl Provider for Ollama {
    type Request = ChatRequest;
    type Response = ChatResponse;

    async fn complete(&self, mut request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        request.stream = false;
        let response = self.send(&request).await?;

        let chat_response = response.json::<ChatResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Ollama API response: {}", e)))?;

        match chat_response.error {
            Some(message) => Err(ProviderError::RequestFailed(format!("Ollama error: {}", message))),
            None => Ok(chat_response),
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let version = self.version().await?;
        debug!("Connected to Ollama {}", version.version);
        Ok(())
    }

    fn extract_text(response: &ChatResponse) -> String {
        response.message.as_ref()
            .map(|message| message.content.clone())
            .unwrap_or_default()
    }
}
