use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

use super::cache::TranslatorFactory;
use super::interface::TranslatorInterface;
use super::pair::LanguagePairKey;
use crate::config::TranslationConfig;
use crate::error::ChatError;

#[derive(Debug, Serialize)]
struct TranslationRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TranslationCandidate {
    pub translation_text: String,
}

/// Translator backed by one model on the translation inference service
pub struct TranslationClient {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
    model_id: String,
}

impl TranslationClient {
    pub fn new(client: Client, base_url: &str, api_token: Option<String>, model_id: &str) -> Self {
        Self {
            client,
            endpoint: model_endpoint(base_url, model_id),
            api_token,
            model_id: model_id.to_string(),
        }
    }
}

#[async_trait]
impl TranslatorInterface for TranslationClient {
    async fn translate(&self, text: &str) -> Result<String, ChatError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&TranslationRequest { inputs: text });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!("Translation request to {} failed: {}", self.model_id, e);
                ChatError::translation(&self.model_id, e)
            })?;

        let candidates: Vec<TranslationCandidate> = response
            .json()
            .await
            .map_err(|e| ChatError::translation(&self.model_id, e))?;

        debug!("{} returned {} candidates", self.model_id, candidates.len());
        first_translation(candidates)
            .ok_or_else(|| ChatError::translation(&self.model_id, "translation service returned no candidates"))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Builds a `TranslationClient` per model, sharing one HTTP connection pool
pub struct ModelTranslatorFactory {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl ModelTranslatorFactory {
    pub fn new(client: Client, config: &TranslationConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_token: config.resolve_api_token(),
        }
    }
}

impl TranslatorFactory for ModelTranslatorFactory {
    fn create_translator(
        &self,
        pair: &LanguagePairKey,
        model_id: &str,
    ) -> Result<Arc<dyn TranslatorInterface>, ChatError> {
        if model_id.trim().is_empty() {
            return Err(ChatError::Configuration(format!(
                "Empty translation model configured for {}",
                pair
            )));
        }
        Ok(Arc::new(TranslationClient::new(
            self.client.clone(),
            &self.base_url,
            self.api_token.clone(),
            model_id,
        )))
    }
}

fn model_endpoint(base_url: &str, model_id: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), model_id)
}

fn first_translation(candidates: Vec<TranslationCandidate>) -> Option<String> {
    candidates.into_iter().next().map(|c| c.translation_text)
}
