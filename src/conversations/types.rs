use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::translate::ENGLISH;

/// `bot_language` value asking for a reply in the caller's own language
pub const SOURCE_LANGUAGE_SENTINEL: &str = "source";

/// Inbound chat socket frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub text: String,
    /// Declared by the caller, never detected
    #[serde(default = "default_language")]
    pub source_language: String,
    #[serde(default = "default_language")]
    pub bot_language: String,
}

fn default_language() -> String {
    ENGLISH.to_string()
}

/// Outbound chat socket frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub reply_en: String,
    /// Echo of the caller-declared `source_language`
    pub detected_source: String,
}

/// Sent instead of a `ChatResponse` when a message fails; the socket stays open
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorFrame {
    pub error: String,
}

impl From<&ChatError> for ErrorFrame {
    fn from(err: &ChatError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}
