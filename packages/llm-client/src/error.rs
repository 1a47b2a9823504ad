//! Error types for the chat completion client.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Chat completion client errors.
///
/// Every request makes exactly one attempt; none of these variants is a
/// retry trigger.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Configuration error (missing endpoint, invalid settings)
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport error (connection, DNS, TLS, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Non-200 response from the provider
    #[error("API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// Response envelope was not valid JSON or lacked the expected
    /// `choices[0].message.content` path
    #[error("parse error: {0}")]
    Parse(String),

    /// The message content was not the JSON object the prompt demanded
    #[error("malformed completion content: {0}")]
    Content(String),
}
