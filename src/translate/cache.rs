use std::collections::HashMap;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

use super::interface::TranslatorInterface;
use super::pair::LanguagePairKey;
use crate::config::TranslationConfig;
use crate::error::ChatError;

/// Builds the translator for a language pair once its model is known
pub trait TranslatorFactory: Send + Sync {
    fn create_translator(
        &self,
        pair: &LanguagePairKey,
        model_id: &str,
    ) -> Result<Arc<dyn TranslatorInterface>, ChatError>;
}

/// Process-wide memo of translators keyed by language pair.
///
/// Starts empty and lives in `AppState` for as long as the server runs;
/// entries are never evicted. Each configured pair is constructed at most
/// once, even under concurrent first use.
pub struct PipelineCache {
    language_models: HashMap<LanguagePairKey, String>,
    factory: Arc<dyn TranslatorFactory>,
    translators: DashMap<LanguagePairKey, Arc<dyn TranslatorInterface>>,
}

impl PipelineCache {
    pub fn new(
        language_models: HashMap<LanguagePairKey, String>,
        factory: Arc<dyn TranslatorFactory>,
    ) -> Self {
        info!(
            "Initialized translation pipeline cache with {} configured pairs",
            language_models.len()
        );
        Self {
            language_models,
            factory,
            translators: DashMap::new(),
        }
    }

    /// Create the cache from the `translation_config` section
    pub fn from_config(
        config: &TranslationConfig,
        factory: Arc<dyn TranslatorFactory>,
    ) -> Result<Self, ChatError> {
        let mut language_models = HashMap::with_capacity(config.language_models.len());
        for (key, model_id) in &config.language_models {
            let pair = key.parse::<LanguagePairKey>().map_err(ChatError::Configuration)?;
            if language_models.insert(pair.clone(), model_id.clone()).is_some() {
                return Err(ChatError::Configuration(format!(
                    "Language pair {} is configured more than once",
                    pair
                )));
            }
        }
        Ok(Self::new(language_models, factory))
    }

    /// Return the translator for `pair`, constructing it on first use
    pub fn resolve(&self, pair: &LanguagePairKey) -> Result<Arc<dyn TranslatorInterface>, ChatError> {
        if let Some(translator) = self.translators.get(pair) {
            return Ok(translator.value().clone());
        }

        let model_id = self.language_models.get(pair).ok_or_else(|| {
            ChatError::Configuration(format!("No translation model configured for {}", pair))
        })?;

        // The entry holds the shard lock, so a racing caller waits here and
        // then takes the occupied branch.
        match self.translators.entry(pair.clone()) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let translator = self.factory.create_translator(pair, model_id)?;
                info!("Loaded translation model {} for {}", model_id, pair);
                Ok(entry.insert(translator).value().clone())
            }
        }
    }

    /// Translate `text` from `source` to `target` through the cached translator
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ChatError> {
        let pair = LanguagePairKey::new(source, target);
        let translator = self.resolve(&pair)?;
        debug!("Translating {} chars with {} ({})", text.chars().count(), pair, translator.model_id());
        translator.translate(text).await
    }

    /// Number of translators constructed so far
    pub fn len(&self) -> usize {
        self.translators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translators.is_empty()
    }
}
