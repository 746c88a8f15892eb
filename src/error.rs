use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures surfaced by the chat and translation pipeline
#[derive(Debug, Error)]
pub enum ChatError {
    /// Unknown language pair, missing credential or unsupported provider.
    /// Fatal to the request, never to the process.
    #[error("{0}")]
    Configuration(String),

    #[error("Translation with {model} failed: {source}")]
    Translation {
        model: String,
        #[source]
        source: BoxError,
    },

    #[error("Completion failed: {0}")]
    Completion(#[source] BoxError),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

impl ChatError {
    pub fn translation(model: &str, cause: impl Into<BoxError>) -> Self {
        ChatError::Translation {
            model: model.to_string(),
            source: cause.into(),
        }
    }

    pub fn completion(cause: impl Into<BoxError>) -> Self {
        ChatError::Completion(cause.into())
    }
}
