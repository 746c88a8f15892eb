use async_trait::async_trait;

use crate::error::ChatError;

/// Interface for the text completion collaborator.
/// Receives English text and answers in English; holds no conversation state.
#[async_trait]
pub trait CompletionLLMInterface: Send + Sync {
    /// Generate a single reply for `user_text`.
    ///
    /// # Arguments
    /// * `user_text` - English user message
    /// * `system` - Optional system prompt overriding the configured one
    async fn generate_reply(&self, user_text: &str, system: Option<&str>) -> Result<String, ChatError>;
}
