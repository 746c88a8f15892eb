use std::sync::Arc;
use uuid::Uuid;

use crate::agent::{CompletionLLMFactory, CompletionLLMInterface};
use crate::config::Config;
use crate::conversations::MessagePipeline;
use crate::translate::{ModelTranslatorFactory, PipelineCache};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Shared by every connection; created empty here and kept until shutdown
    pub pipeline_cache: Arc<PipelineCache>,
    pub pipeline: Arc<MessagePipeline>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::new();

        let translator_factory = Arc::new(ModelTranslatorFactory::new(
            http_client.clone(),
            &config.translation_config,
        ));
        let pipeline_cache = Arc::new(PipelineCache::from_config(
            &config.translation_config,
            translator_factory,
        )?);
        let completion = CompletionLLMFactory::create_llm(&config.llm_config, http_client)?;

        Ok(Self::with_collaborators(config, pipeline_cache, completion))
    }

    pub fn with_collaborators(
        config: Config,
        pipeline_cache: Arc<PipelineCache>,
        completion: Arc<dyn CompletionLLMInterface>,
    ) -> Self {
        let pipeline = Arc::new(MessagePipeline::new(pipeline_cache.clone(), completion));
        Self {
            config,
            pipeline_cache,
            pipeline,
        }
    }

    pub fn generate_client_uid(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
