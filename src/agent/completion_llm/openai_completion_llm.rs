use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::completion_llm_interface::CompletionLLMInterface;
use crate::error::ChatError;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

/// OpenAI compatible text completion client (`POST {base_url}/completions`).
/// Also serves Ollama and other servers exposing the same endpoint.
pub struct OpenAICompletionLLM {
    client: Client,
    model: String,
    base_url: String,
    api_key: Option<String>,
    require_api_key: bool,
    temperature: f32,
    max_tokens: u32,
    system: String,
}

impl OpenAICompletionLLM {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        client: Client,
        model: String,
        base_url: String,
        api_key: Option<String>,
        require_api_key: bool,
        temperature: f32,
        max_tokens: u32,
        system: String,
    ) -> Self {
        info!(
            "Initialized OpenAICompletionLLM: model={}, base_url={}",
            model, base_url
        );
        Self {
            client,
            model,
            base_url,
            api_key,
            require_api_key,
            temperature,
            max_tokens,
            system,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/completions", self.base_url.trim_end_matches('/'))
    }
}

pub fn render_prompt(system: &str, user: &str) -> String {
    format!("\n{}\nUser: {}\nAssistant:\n", system, user)
}

#[async_trait]
impl CompletionLLMInterface for OpenAICompletionLLM {
    async fn generate_reply(&self, user_text: &str, system: Option<&str>) -> Result<String, ChatError> {
        if self.require_api_key && self.api_key.is_none() {
            return Err(ChatError::Configuration("OpenAI API key is not set.".to_string()));
        }

        let body = CompletionRequest {
            model: &self.model,
            prompt: render_prompt(system.unwrap_or(&self.system), user_text),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!("Completion request to {} failed: {}", self.model, e);
                ChatError::completion(e)
            })?;

        let completion: CompletionResponse = response.json().await.map_err(ChatError::completion)?;
        let text = first_choice(completion)
            .ok_or_else(|| ChatError::completion("completion service returned no choices"))?;

        debug!("Completion produced {} chars", text.len());
        Ok(text)
    }
}

fn first_choice(response: CompletionResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.text.trim().to_string())
}
