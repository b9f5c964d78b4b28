//! Hugging Face Provider - Implementation of LlmProvider for the HF router.
//!
//! The router exposes an OpenAI-compatible `/chat/completions` endpoint with
//! bearer authentication; streaming uses Server-Sent Events with `data:`
//! lines and a `[DONE]` sentinel.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HuggingFaceConfig::new(api_key)
//!     .with_model("meta-llama/Meta-Llama-3-8B-Instruct")
//!     .with_base_url("https://router.huggingface.co/v1");
//!
//! let provider = HuggingFaceProvider::new(config);
//! ```
//!
//! No retries are performed here by design: rate limits and outages surface
//! as classified errors for the caller to report.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::ports::{
    ChatRole, CompletionRequest, LlmError, LlmProvider, TokenStream,
};

/// Configuration for the Hugging Face provider.
#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "meta-llama/Meta-Llama-3-8B-Instruct").
    pub model: String,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Default maximum tokens per completion.
    pub max_tokens: u32,
    /// Default sampling temperature.
    pub temperature: f32,
}

impl HuggingFaceConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "meta-llama/Meta-Llama-3-8B-Instruct".to_string(),
            base_url: "https://router.huggingface.co/v1".to_string(),
            timeout: Duration::from_secs(40),
            max_tokens: 256,
            temperature: 0.3,
        }
    }

    /// Builds a provider configuration from the application config section.
    pub fn from_app_config(config: &LlmConfig) -> Self {
        Self::new(config.api_key.clone())
            .with_model(config.model.clone())
            .with_base_url(config.base_url.clone())
            .with_timeout(config.timeout())
            .with_max_tokens(config.max_tokens)
            .with_temperature(config.temperature)
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the default maximum tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the default temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Hugging Face router provider implementation.
pub struct HuggingFaceProvider {
    config: HuggingFaceConfig,
    client: Client,
}

impl HuggingFaceProvider {
    /// Creates a new provider with the given configuration.
    pub fn new(config: HuggingFaceConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Converts our request to the wire format.
    fn to_wire_request(&self, request: &CompletionRequest, stream: bool) -> WireRequest {
        let mut messages = Vec::new();

        // System prompt travels as the first message
        if let Some(ref prompt) = request.system_prompt {
            messages.push(WireMessage {
                role: "system".to_string(),
                content: prompt.clone(),
            });
        }

        for msg in &request.messages {
            messages.push(WireMessage {
                role: match msg.role {
                    ChatRole::System => "system",
                    ChatRole::User => "user",
                    ChatRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            });
        }

        WireRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            temperature: request.temperature.unwrap_or(self.config.temperature),
            stream: if stream { Some(true) } else { None },
        }
    }

    /// Sends a request and maps transport failures.
    async fn send_request(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<Response, LlmError> {
        let wire_request = self.to_wire_request(request, stream);

        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    LlmError::network(format!("Connection failed: {}", e))
                } else {
                    LlmError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, LlmError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(LlmError::AuthenticationFailed),
            429 => Err(LlmError::rate_limited(30)),
            400 => Err(LlmError::InvalidRequest(error_body)),
            500..=599 => Err(LlmError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(LlmError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }
}

#[async_trait]
impl LlmProvider for HuggingFaceProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let response = self.send_request(&request, false).await?;
        let response = self.handle_response_status(response).await?;

        let wire_response: WireResponse = response
            .json()
            .await
            .map_err(|e| LlmError::parse(format!("Failed to parse response: {}", e)))?;

        let choice = wire_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::parse("No choices in response"))?;

        Ok(choice.message.content)
    }

    async fn stream_complete(&self, request: CompletionRequest) -> Result<TokenStream, LlmError> {
        let response = self.send_request(&request, true).await?;
        let response = self.handle_response_status(response).await?;

        let stream = response
            .bytes_stream()
            .map(|chunk_result| match chunk_result {
                Ok(bytes) => parse_sse_chunks(&String::from_utf8_lossy(&bytes)),
                Err(e) => vec![Err(LlmError::network(format!("Stream error: {}", e)))],
            })
            .flat_map(stream::iter);

        Ok(Box::pin(stream))
    }
}

/// Parses SSE data lines into text fragments.
fn parse_sse_chunks(text: &str) -> Vec<Result<String, LlmError>> {
    let mut results = Vec::new();

    for line in text.lines() {
        let Some(data) = line.strip_prefix("data: ") else {
            continue;
        };

        if data == "[DONE]" {
            continue;
        }

        match serde_json::from_str::<StreamResponseChunk>(data) {
            Ok(chunk) => {
                if let Some(choice) = chunk.choices.first() {
                    if let Some(ref content) = choice.delta.content {
                        if !content.is_empty() {
                            results.push(Ok(content.clone()));
                        }
                    }
                }
            }
            Err(e) => {
                if !data.trim().is_empty() {
                    results.push(Err(LlmError::parse(format!(
                        "Failed to parse SSE chunk: {}",
                        e
                    ))));
                }
            }
        }
    }

    results
}

// ----- Wire Types -----

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct StreamResponseChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_works() {
        let config = HuggingFaceConfig::new("hf_test")
            .with_model("mistralai/Mistral-7B-Instruct-v0.3")
            .with_base_url("https://custom.endpoint")
            .with_timeout(Duration::from_secs(10))
            .with_max_tokens(512)
            .with_temperature(0.1);

        assert_eq!(config.model, "mistralai/Mistral-7B-Instruct-v0.3");
        assert_eq!(config.base_url, "https://custom.endpoint");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.api_key(), "hf_test");
    }

    #[test]
    fn config_from_app_config() {
        let app = LlmConfig {
            api_key: "hf_abc".to_string(),
            ..Default::default()
        };
        let config = HuggingFaceConfig::from_app_config(&app);

        assert_eq!(config.api_key(), "hf_abc");
        assert_eq!(config.model, app.model);
        assert_eq!(config.max_tokens, 256);
    }

    #[test]
    fn wire_request_places_system_prompt_first() {
        let provider = HuggingFaceProvider::new(HuggingFaceConfig::new("key"));
        let request = CompletionRequest::new()
            .with_system_prompt("Be strict")
            .with_message(ChatRole::User, "hello");

        let wire = provider.to_wire_request(&request, false);

        assert_eq!(wire.messages.len(), 2);
        assert_eq!(wire.messages[0].role, "system");
        assert_eq!(wire.messages[0].content, "Be strict");
        assert_eq!(wire.messages[1].role, "user");
        assert!(wire.stream.is_none());
    }

    #[test]
    fn wire_request_uses_config_defaults() {
        let provider = HuggingFaceProvider::new(HuggingFaceConfig::new("key"));
        let request = CompletionRequest::new().with_message(ChatRole::User, "hi");

        let wire = provider.to_wire_request(&request, true);

        assert_eq!(wire.max_tokens, 256);
        assert_eq!(wire.temperature, 0.3);
        assert_eq!(wire.stream, Some(true));
    }

    #[test]
    fn parse_sse_content_chunk() {
        let data = r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#;
        let chunks = parse_sse_chunks(data);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap(), "Hello");
    }

    #[test]
    fn parse_sse_skips_done_marker() {
        let chunks = parse_sse_chunks("data: [DONE]\n");
        assert!(chunks.is_empty());
    }

    #[test]
    fn parse_sse_skips_empty_deltas() {
        let data = r#"data: {"choices":[{"delta":{}}]}"#;
        let chunks = parse_sse_chunks(data);
        assert!(chunks.is_empty());
    }

    #[test]
    fn parse_sse_multiple_lines() {
        let data = "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\
                    data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\
                    data: [DONE]\n";
        let chunks = parse_sse_chunks(data);

        let text: String = chunks.into_iter().map(|c| c.unwrap()).collect();
        assert_eq!(text, "Hello");
    }

    #[test]
    fn parse_sse_reports_corrupt_chunks() {
        let chunks = parse_sse_chunks("data: {not json}\n");

        assert_eq!(chunks.len(), 1);
        assert!(matches!(chunks[0], Err(LlmError::Parse(_))));
    }
}
