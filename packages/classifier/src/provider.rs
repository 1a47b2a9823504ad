//! Completion provider seam.
//!
//! The pipeline talks to its chat-completion backend through this trait so
//! that providers can be swapped without touching classification logic.
//! [`llm_client::ChatClient`] is the production implementation; a
//! configurable double lives in [`crate::testing`].

use async_trait::async_trait;

use crate::error::{ClassifierError, Result};
use crate::result::ClassificationResult;

/// A chat-completion backend that can answer one classification request.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send one system+user request and parse the reply into a
    /// classification. One attempt, no retries.
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<ClassificationResult>;
}

#[async_trait]
impl CompletionProvider for llm_client::ChatClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<ClassificationResult> {
        let value = self
            .chat_completion_json(system_prompt, user_message)
            .await
            .map_err(|e| ClassifierError::Provider(Box::new(e)))?;

        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl<P: CompletionProvider + ?Sized> CompletionProvider for std::sync::Arc<P> {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<ClassificationResult> {
        (**self).complete(system_prompt, user_message).await
    }
}
