//! LLM-backed document classification pipeline for DMS hosts.
//!
//! On each uploaded PDF the pipeline extracts text with `pdftotext`, sends it
//! to an OpenAI-compatible chat-completion endpoint, and writes the returned
//! name, categories, and keywords back onto the document. Classification is
//! best-effort and strictly additive: every failure is a logged no-op and the
//! host's upload always succeeds regardless of the outcome.
//!
//! # Design
//!
//! - The host's document/folder/category objects are reached only through
//!   the narrow capability traits in [`host`], so any DMS (or test double)
//!   plugs in.
//! - The completion backend sits behind [`CompletionProvider`];
//!   `llm-client` provides the production implementation for generic and
//!   Azure endpoint dialects.
//! - Logging goes through `tracing`; with no subscriber installed it is a
//!   no-op, which is the contract for hosts without a logger.
//!
//! # Usage
//!
//! ```rust,ignore
//! use classifier::{handle_document_added, SessionResults};
//!
//! // Inside the host's post-upload hook:
//! if let Some(outcome) = handle_document_added(&settings, dms, &document).await {
//!     session_results.record(document.id(), &outcome);
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`] - Configuration resolved from host settings
//! - [`host`] - Capability traits for the host object model
//! - [`extractor`] - PDF text extraction via `pdftotext`
//! - [`prompts`] - Prompt templates and builders
//! - [`pipeline`] - The classification pipeline
//! - [`hook`] - The post-upload entry point
//! - [`testing`] - Mock implementations for testing

pub mod config;
pub mod error;
pub mod extractor;
pub mod hook;
pub mod host;
pub mod pipeline;
pub mod prompts;
pub mod provider;
pub mod result;
pub mod testing;

// Re-export core types at crate root
pub use config::ClassifierConfig;
pub use error::{ClassifierError, ExtractError};
pub use extractor::PdfExtractor;
pub use hook::{handle_document_added, run_classifier, SessionResults, UploadOutcome};
pub use host::{Category, Dms, Document, DocumentContent, Folder, KeywordCategory};
pub use pipeline::Classifier;
pub use provider::CompletionProvider;
pub use result::{ClassificationResult, StringList};
