//! Minimal client for OpenAI-compatible chat completion APIs.
//!
//! A clean client with no domain-specific logic. Speaks two endpoint
//! dialects, selected once at construction from the endpoint host:
//!
//! - **Generic** (OpenAI, Ollama, proxies): `POST {endpoint}/chat/completions`
//!   with the model in the body and `Authorization: Bearer` auth.
//! - **Azure**: `POST {endpoint}/openai/deployments/{model}/chat/completions`
//!   with the deployment name in the URL, an `api-version` query parameter,
//!   and `api-key` auth.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm_client::ChatClient;
//!
//! let client = ChatClient::new("https://api.openai.com/v1", "sk-...", "gpt-4o");
//!
//! // Raw completion content
//! let response = client.chat_completion("You are helpful", "Hello!").await?;
//!
//! // Content decoded a second time as a JSON object (json_object mode)
//! let value = client.chat_completion_json(system_prompt, user_message).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{LlmError, Result};
pub use types::{ChatRequest, ChatResponse, Message, ResponseFormat, Usage, DEFAULT_TEMPERATURE};

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

/// Ceiling on the whole request; exceeding it is a failure, not a retry
/// trigger.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// API version used for Azure endpoints when none is configured.
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-02-15-preview";

/// Endpoint host fragments that select the Azure dialect.
const AZURE_HOST_MARKERS: [&str; 2] = ["openai.azure.com", "cognitiveservices.azure.com"];

/// Chat completion client.
#[derive(Clone)]
pub struct ChatClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
    api_version: Option<String>,
    azure: bool,
}

impl ChatClient {
    /// Create a client for the given endpoint, API key, and model (or Azure
    /// deployment name). An empty API key sends no auth header.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let azure = AZURE_HOST_MARKERS
            .iter()
            .any(|marker| endpoint.contains(marker));

        Self {
            http: Client::new(),
            endpoint,
            api_key: api_key.into(),
            model: model.into(),
            api_version: None,
            azure,
        }
    }

    /// Set the API version (Azure only; ignored by the generic dialect).
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    /// Whether the endpoint selected the Azure dialect.
    pub fn is_azure(&self) -> bool {
        self.azure
    }

    /// The normalized endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The model or deployment name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The URL completions are posted to.
    pub fn request_url(&self) -> String {
        if self.azure {
            let api_version = self
                .api_version
                .as_deref()
                .unwrap_or(DEFAULT_AZURE_API_VERSION);
            format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                self.endpoint,
                urlencoding::encode(&self.model),
                urlencoding::encode(api_version)
            )
        } else {
            format!("{}/chat/completions", self.endpoint)
        }
    }

    /// Send one system+user chat completion request.
    ///
    /// Returns the content of the first choice. One attempt, no retries; the
    /// whole request is bounded by [`REQUEST_TIMEOUT`].
    pub async fn chat_completion(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<ChatResponse> {
        let start = std::time::Instant::now();
        let url = self.request_url();

        // Azure carries the deployment name in the URL, not the body.
        let model = (!self.azure).then(|| self.model.clone());
        let request = ChatRequest::json_completion(model, system_prompt, user_message);

        let mut builder = self
            .http
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .header("Content-Type", "application/json");
        if !self.api_key.is_empty() {
            builder = if self.azure {
                builder.header("api-key", &self.api_key)
            } else {
                builder.header("Authorization", format!("Bearer {}", self.api_key))
            };
        }

        let response = builder.json(&request).send().await.map_err(|e| {
            warn!(error = %e, "chat completion request failed");
            LlmError::Network(e.to_string())
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), url = %url, body = %body, "chat completion API error");
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let raw: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let usage = raw.usage;
        let content = raw
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmError::Parse("response has no choices".to_string()))?;

        debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            total_tokens = usage.as_ref().map(|u| u.total_tokens).unwrap_or(0),
            "chat completion succeeded"
        );

        Ok(ChatResponse { content, usage })
    }

    /// Send one chat completion request and decode the message content as a
    /// JSON object.
    ///
    /// Even with `response_format: json_object`, the content field arrives as
    /// a JSON-encoded string that must be decoded a second time; that second
    /// decode is the provider contract, not a workaround.
    pub async fn chat_completion_json(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<serde_json::Value> {
        let response = self.chat_completion(system_prompt, user_message).await?;

        let content = types::strip_code_blocks(&response.content);
        let value: serde_json::Value = serde_json::from_str(content).map_err(|e| {
            warn!(error = %e, content = %response.content, "completion content is not valid JSON");
            LlmError::Content(e.to_string())
        })?;

        if !value.is_object() {
            warn!(content = %response.content, "completion content is not a JSON object");
            return Err(LlmError::Content(
                "completion content is not a JSON object".to_string(),
            ));
        }

        Ok(value)
    }
}
