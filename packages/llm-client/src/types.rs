//! Chat completion request and response types.

use serde::{Deserialize, Serialize};

/// Sampling temperature used for classification-style completions.
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Chat completion request body.
///
/// `model` is optional because the Azure dialect carries the deployment name
/// in the URL instead of the body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model name, omitted entirely for Azure deployments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Conversation messages
    pub messages: Vec<Message>,

    /// Sampling temperature
    pub temperature: f64,

    /// Response format constraint
    pub response_format: ResponseFormat,
}

impl ChatRequest {
    /// Build a low-temperature, JSON-object-constrained request with a single
    /// system message and a single user message.
    pub fn json_completion(
        model: Option<String>,
        system_prompt: impl Into<String>,
        user_message: impl Into<String>,
    ) -> Self {
        Self {
            model,
            messages: vec![Message::system(system_prompt), Message::user(user_message)],
            temperature: DEFAULT_TEMPERATURE,
            response_format: ResponseFormat::json_object(),
        }
    }
}

/// Chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role: "system", "user", "assistant"
    pub role: String,

    /// Message content
    pub content: String,
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Response format constraint.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    /// Constrain the completion to a JSON object.
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

/// Chat completion response.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Content of the first choice's message
    pub content: String,

    /// Token usage statistics, when the provider reports them
    pub usage: Option<Usage>,
}

/// Raw chat response from the API (for internal parsing).
#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponseRaw {
    pub choices: Vec<ChatChoice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatMessageResponse {
    pub content: String,
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,

    /// Tokens in the completion
    pub completion_tokens: u32,

    /// Total tokens used
    pub total_tokens: u32,
}

/// Strip markdown code fences from a completion.
///
/// Some providers wrap JSON-mode output in ```` ```json ```` fences even when
/// asked not to; strict JSON passes through unchanged.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let sys = Message::system("You are a classifier");
        assert_eq!(sys.role, "system");

        let user = Message::user("Classify this");
        assert_eq!(user.role, "user");
    }

    #[test]
    fn test_json_completion_shape() {
        let request = ChatRequest::json_completion(Some("gpt-4o".into()), "sys", "usr");

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["temperature"], 0.3);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "usr");
    }

    #[test]
    fn test_json_completion_omits_model_when_absent() {
        let request = ChatRequest::json_completion(None, "sys", "usr");

        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("model").is_none());
    }

    #[test]
    fn test_strip_code_blocks() {
        assert_eq!(strip_code_blocks("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("```\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("{}"), "{}");
    }
}
