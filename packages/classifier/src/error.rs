//! Typed errors for the classifier library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Classification is best-effort:
//! the pipeline logs these errors and converts them into no-op results at its
//! public boundary, so none of them ever reaches the host's upload
//! transaction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during a classification run.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Completion provider unavailable or failed
    #[error("completion provider error: {0}")]
    Provider(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The provider's reply did not match the classification shape
    #[error("malformed classification reply: {0}")]
    MalformedReply(#[from] serde_json::Error),
}

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Extraction tool missing or not executable
    #[error("extractor not ready: {0}")]
    NotReady(String),

    /// Input file does not exist
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Input file exists but cannot be opened
    #[error("file not readable: {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Temporary output file could not be created
    #[error("failed to create temporary output file: {0}")]
    TempFile(#[source] std::io::Error),

    /// Extraction tool could not be spawned
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Extraction tool exited non-zero
    #[error("{tool} failed (exit code {code}): {output}")]
    ToolFailed {
        tool: String,
        code: i32,
        output: String,
    },

    /// Extracted output could not be read back
    #[error("failed to read extracted text: {0}")]
    OutputRead(#[source] std::io::Error),

    /// Tool succeeded but produced no text
    #[error("no text content extracted")]
    EmptyOutput,
}

/// Result type alias for classification operations.
pub type Result<T> = std::result::Result<T, ClassifierError>;
