use std::sync::Arc;
use tracing::debug;

use super::types::{ChatRequest, ChatResponse, SOURCE_LANGUAGE_SENTINEL};
use crate::agent::CompletionLLMInterface;
use crate::error::ChatError;
use crate::translate::{PipelineCache, ENGLISH};

/// Fixed translate, complete, translate chain for one chat turn
pub struct MessagePipeline {
    cache: Arc<PipelineCache>,
    completion: Arc<dyn CompletionLLMInterface>,
}

impl MessagePipeline {
    pub fn new(cache: Arc<PipelineCache>, completion: Arc<dyn CompletionLLMInterface>) -> Self {
        Self { cache, completion }
    }

    pub async fn handle(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        self.process(&request.text, &request.source_language, &request.bot_language)
            .await
    }

    /// Run one chat turn.
    ///
    /// The user text is brought to English, answered by the completion
    /// service, then translated to `bot_language` (or back to
    /// `source_language` when it is `"source"`). English hops are skipped.
    pub async fn process(
        &self,
        text: &str,
        source_language: &str,
        bot_language: &str,
    ) -> Result<ChatResponse, ChatError> {
        let user_en = if source_language != ENGLISH {
            self.cache.translate(text, source_language, ENGLISH).await?
        } else {
            text.to_string()
        };

        let bot_en = self.completion.generate_reply(&user_en, None).await?;

        let out_lang = resolve_output_language(source_language, bot_language);
        let reply = if out_lang != ENGLISH {
            self.cache.translate(&bot_en, ENGLISH, out_lang).await?
        } else {
            bot_en.clone()
        };

        debug!("Chat turn {} -> {} complete", source_language, out_lang);
        Ok(ChatResponse {
            reply,
            reply_en: bot_en,
            detected_source: source_language.to_string(),
        })
    }

    /// Translate without a completion call, as the `/translate` endpoint does
    pub async fn translate_to(
        &self,
        text: &str,
        source_language: &str,
        target: &str,
    ) -> Result<String, ChatError> {
        if source_language == target {
            return Ok(text.to_string());
        }
        self.cache.translate(text, source_language, target).await
    }
}

fn resolve_output_language<'a>(source_language: &'a str, bot_language: &'a str) -> &'a str {
    if bot_language == SOURCE_LANGUAGE_SENTINEL {
        source_language
    } else {
        bot_language
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::translate::cache::tests::{mock_cache, MockTranslatorFactory};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Completion collaborator answering `reply to: <text>`
    #[derive(Default)]
    pub struct MockCompletion {
        pub prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CompletionLLMInterface for MockCompletion {
        async fn generate_reply(&self, user_text: &str, _system: Option<&str>) -> Result<String, ChatError> {
            self.prompts.lock().unwrap().push(user_text.to_string());
            Ok(format!("reply to: {}", user_text))
        }
    }

    /// Completion collaborator whose upstream is always down
    #[derive(Default)]
    pub struct FailingCompletion {
        pub calls: Mutex<usize>,
    }

    #[async_trait]
    impl CompletionLLMInterface for FailingCompletion {
        async fn generate_reply(&self, _user_text: &str, _system: Option<&str>) -> Result<String, ChatError> {
            *self.calls.lock().unwrap() += 1;
            Err(ChatError::completion("upstream returned 502"))
        }
    }

    pub fn mock_pipeline() -> (MessagePipeline, Arc<MockTranslatorFactory>, Arc<MockCompletion>) {
        let (cache, factory) = mock_cache();
        let completion = Arc::new(MockCompletion::default());
        (MessagePipeline::new(cache, completion.clone()), factory, completion)
    }

    #[test]
    fn test_resolve_output_language() {
        assert_eq!(resolve_output_language("hi", "source"), "hi");
        assert_eq!(resolve_output_language("en", "source"), "en");
        assert_eq!(resolve_output_language("hi", "ja"), "ja");
    }

    #[tokio::test]
    async fn test_english_only_skips_translation() {
        let (pipeline, factory, completion) = mock_pipeline();

        let response = pipeline.process("Hello", "en", "en").await.unwrap();

        assert_eq!(
            response,
            ChatResponse {
                reply: "reply to: Hello".to_string(),
                reply_en: "reply to: Hello".to_string(),
                detected_source: "en".to_string(),
            }
        );
        assert_eq!(*completion.prompts.lock().unwrap(), vec!["Hello".to_string()]);
        assert!(factory.translations().is_empty());
        assert!(pipeline.cache.is_empty());
    }

    #[tokio::test]
    async fn test_source_sentinel_with_english_source() {
        let (pipeline, factory, _) = mock_pipeline();

        let response = pipeline.process("Hello", "en", "source").await.unwrap();

        assert_eq!(response.reply, response.reply_en);
        assert!(factory.translations().is_empty());
    }

    #[tokio::test]
    async fn test_hindi_input_english_reply() {
        let (pipeline, factory, completion) = mock_pipeline();

        let response = pipeline.process("नमस्ते", "hi", "en").await.unwrap();

        assert_eq!(factory.translations(), vec![("hi->en".to_string(), "नमस्ते".to_string())]);
        assert_eq!(*completion.prompts.lock().unwrap(), vec!["[hi->en] नमस्ते".to_string()]);
        assert_eq!(response.reply, response.reply_en);
        assert_eq!(response.detected_source, "hi");
    }

    #[tokio::test]
    async fn test_english_input_japanese_reply() {
        let (pipeline, factory, _) = mock_pipeline();

        let response = pipeline.process("Hi", "en", "ja").await.unwrap();

        assert_eq!(response.reply_en, "reply to: Hi");
        assert_eq!(response.reply, "[en->ja] reply to: Hi");
        assert_ne!(response.reply, response.reply_en);
        assert_eq!(
            factory.translations(),
            vec![("en->ja".to_string(), "reply to: Hi".to_string())]
        );
    }

    #[tokio::test]
    async fn test_source_sentinel_translates_back() {
        let (pipeline, factory, _) = mock_pipeline();

        let response = pipeline.process("नमस्ते", "hi", "source").await.unwrap();

        let pairs: Vec<String> = factory.translations().into_iter().map(|(p, _)| p).collect();
        assert_eq!(pairs, vec!["hi->en".to_string(), "en->hi".to_string()]);
        assert_eq!(response.reply, "[en->hi] reply to: [hi->en] नमस्ते");
    }

    #[tokio::test]
    async fn test_unsupported_source_fails_before_completion() {
        let (pipeline, _, completion) = mock_pipeline();

        let err = pipeline.process("Bonjour", "fr", "en").await.err().unwrap();

        assert!(matches!(err, ChatError::Configuration(_)));
        assert!(err.to_string().contains("fr->en"));
        assert!(completion.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_translation_failure_propagates() {
        let (pipeline, _, _) = mock_pipeline();

        let err = pipeline.process("<fail>", "hi", "en").await.err().unwrap();

        assert!(matches!(err, ChatError::Translation { .. }));
    }

    #[tokio::test]
    async fn test_output_translation_failure_propagates() {
        let (pipeline, factory, completion) = mock_pipeline();

        // The mock reply echoes the marker, so only the en->ja hop fails
        let err = pipeline.process("<fail>", "en", "ja").await.err().unwrap();

        assert!(matches!(err, ChatError::Translation { .. }));
        assert_eq!(*completion.prompts.lock().unwrap(), vec!["<fail>".to_string()]);
        assert_eq!(
            factory.translations(),
            vec![("en->ja".to_string(), "reply to: <fail>".to_string())]
        );
    }

    #[tokio::test]
    async fn test_completion_failure_skips_output_translation() {
        let (cache, factory) = mock_cache();
        let completion = Arc::new(FailingCompletion::default());
        let pipeline = MessagePipeline::new(cache, completion.clone());

        let err = pipeline.process("नमस्ते", "hi", "ja").await.err().unwrap();

        assert!(matches!(err, ChatError::Completion(_)));
        assert_eq!(err.to_string(), "Completion failed: upstream returned 502");
        assert_eq!(*completion.calls.lock().unwrap(), 1);
        let pairs: Vec<String> = factory.translations().into_iter().map(|(p, _)| p).collect();
        assert_eq!(pairs, vec!["hi->en".to_string()]);
    }

    #[tokio::test]
    async fn test_translate_to() {
        let (pipeline, factory, completion) = mock_pipeline();

        assert_eq!(pipeline.translate_to("Hello", "en", "hi").await.unwrap(), "[en->hi] Hello");
        assert_eq!(pipeline.translate_to("Hello", "en", "en").await.unwrap(), "Hello");
        assert_eq!(factory.translations().len(), 1);
        assert!(completion.prompts.lock().unwrap().is_empty());
    }
}
