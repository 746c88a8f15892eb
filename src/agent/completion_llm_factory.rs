use std::sync::Arc;
use reqwest::Client;
use tracing::{info, warn};

use crate::agent::completion_llm::{CompletionLLMInterface, OpenAICompletionLLM};
use crate::config::LlmConfig;
use crate::error::ChatError;

/// Factory for creating completion LLM instances
pub struct CompletionLLMFactory;

impl CompletionLLMFactory {
    /// Create the completion client named by `llm_provider`.
    ///
    /// Only `openai_llm` insists on an API key; self-hosted OpenAI compatible
    /// servers usually run without one.
    pub fn create_llm(config: &LlmConfig, client: Client) -> Result<Arc<dyn CompletionLLMInterface>, ChatError> {
        info!("Initializing LLM: {}", config.llm_provider);

        let require_api_key = match config.llm_provider.as_str() {
            "openai_llm" => true,
            "openai_compatible_llm" | "ollama_llm" | "deepseek_llm" | "groq_llm" | "mistral_llm" => false,
            other => {
                return Err(ChatError::Configuration(format!(
                    "Unsupported LLM provider: {}",
                    other
                )))
            }
        };

        let api_key = config.resolve_api_key();
        if require_api_key && api_key.is_none() {
            // Requests fail until the key is provided
            warn!("OpenAI API key is not set; chat requests will fail");
        }

        Ok(Arc::new(OpenAICompletionLLM::new(
            client,
            config.model.clone(),
            config.base_url.clone(),
            api_key,
            require_api_key,
            config.temperature,
            config.max_tokens,
            config.system_prompt.clone(),
        )))
    }
}
