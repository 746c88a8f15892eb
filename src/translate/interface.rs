use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// Body of `POST /translate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateQuery {
    #[serde(default = "default_target")]
    pub target: String,
}

fn default_target() -> String {
    super::ENGLISH.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated: String,
}

/// A translator bound to one language direction
#[async_trait]
pub trait TranslatorInterface: Send + Sync {
    /// Translate `text` and return the first candidate produced by the model
    async fn translate(&self, text: &str) -> Result<String, ChatError>;

    /// Identifier of the model backing this translator
    fn model_id(&self) -> &str;
}
