//! Generation adapter: wraps the external text-generation service.
//!
//! Every call builds a fixed two-message prompt (system role + user
//! instruction), makes exactly one provider request, and normalizes the
//! outcome to a new [`DraftMessage`] or a [`GenerationError`]. No retries,
//! no caching: each call is an independent, billable request.

use clientassist_types::config::GenerationConfig;
use clientassist_types::error::GenerationError;
use clientassist_types::flow::{DraftMessage, DraftOrigin, GenerationMode};
use clientassist_types::llm::{CompletionRequest, Message};

use crate::llm::box_provider::BoxLlmProvider;

const GENERATE_SYSTEM_PROMPT: &str = "You are a professional assistant helping to generate \
    client communications. Ensure the message is clear, concise, and maintains a professional \
    tone.";

const REVISE_SYSTEM_PROMPT: &str = "You are a brand-standards reviser for client \
    communications. Rewrite the message so it is clear, concise, professional and consistent \
    with our brand voice. Keep every fact, name and [PLACEHOLDER] intact and reply with the \
    revised message only.";

/// Per-request model parameters.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Empty means "provider default".
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
}

impl From<&GenerationConfig> for GenerationSettings {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// The generation adapter.
#[derive(Debug)]
pub struct GenerationAdapter {
    provider: BoxLlmProvider,
    settings: GenerationSettings,
}

impl GenerationAdapter {
    pub fn new(provider: BoxLlmProvider, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Build the prompt for one call.
    pub fn build_request(&self, base_text: &str, mode: GenerationMode) -> CompletionRequest {
        let (system, user) = match mode {
            GenerationMode::Generate => (
                GENERATE_SYSTEM_PROMPT,
                format!("Please generate or refine the following client message: {base_text}"),
            ),
            GenerationMode::Revise => (
                REVISE_SYSTEM_PROMPT,
                format!(
                    "Please revise the following client message to meet our brand standards: \
                     {base_text}"
                ),
            ),
        };

        CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![Message::system(system), Message::user(user)],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }

    /// Transform `base_text` into a new draft.
    pub async fn transform(
        &self,
        base_text: &str,
        mode: GenerationMode,
    ) -> Result<DraftMessage, GenerationError> {
        let request = self.build_request(base_text, mode);

        let response = match self.provider.complete(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    provider = %self.provider.name(),
                    mode = %mode,
                    error = %e,
                    "generation request failed"
                );
                return Err(GenerationError::ServiceFailure(e));
            }
        };

        let draft = DraftMessage::new(response.content, DraftOrigin::Generated(mode));
        if draft.is_empty() {
            tracing::warn!(
                provider = %self.provider.name(),
                mode = %mode,
                stop_reason = %response.stop_reason,
                "generation returned no text"
            );
            return Err(GenerationError::EmptyResponse);
        }

        tracing::info!(
            provider = %self.provider.name(),
            model = %response.model,
            mode = %mode,
            input_chars = base_text.chars().count(),
            output_chars = draft.len(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "generated draft"
        );

        Ok(draft)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use clientassist_types::llm::{
        CompletionResponse, LlmError, MessageRole, StopReason, Usage,
    };

    use crate::llm::provider::LlmProvider;

    /// Scripted provider that records every request it receives.
    #[derive(Clone)]
    pub(crate) struct ScriptedProvider {
        pub(crate) reply: Result<String, String>,
        pub(crate) calls: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl ScriptedProvider {
        pub(crate) fn ok(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub(crate) fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub(crate) fn last_user_prompt(&self) -> Option<String> {
            let calls = self.calls.lock().unwrap();
            calls.last().and_then(|req| {
                req.messages
                    .iter()
                    .find(|m| m.role == MessageRole::User)
                    .map(|m| m.content.clone())
            })
        }
    }

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.calls.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(CompletionResponse {
                    id: "resp-1".to_string(),
                    content: text.clone(),
                    model: "scripted-model".to_string(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage {
                        input_tokens: 40,
                        output_tokens: 20,
                    },
                }),
                Err(message) => Err(LlmError::Provider {
                    message: message.clone(),
                }),
            }
        }
    }

    pub(crate) fn settings() -> GenerationSettings {
        GenerationSettings {
            model: "gpt-4".to_string(),
            max_tokens: 512,
            temperature: Some(0.2),
        }
    }

    #[test]
    fn test_generate_prompt_embeds_text() {
        let adapter = GenerationAdapter::new(
            BoxLlmProvider::new(ScriptedProvider::ok("x")),
            settings(),
        );
        let request = adapter.build_request("We shipped v2 today.", GenerationMode::Generate);

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert!(request.messages[0].content.contains("client communications"));
        assert_eq!(request.messages[1].role, MessageRole::User);
        assert!(request.messages[1].content.ends_with("We shipped v2 today."));
        assert_eq!(request.model, "gpt-4");
        assert_eq!(request.max_tokens, 512);
        assert_eq!(request.temperature, Some(0.2));
    }

    #[test]
    fn test_revise_prompt_uses_brand_reviser_role() {
        let adapter = GenerationAdapter::new(
            BoxLlmProvider::new(ScriptedProvider::ok("x")),
            settings(),
        );
        let request = adapter.build_request("draft", GenerationMode::Revise);
        assert!(request.messages[0].content.contains("brand-standards reviser"));
        assert!(request.messages[1].content.contains("brand standards: draft"));
    }

    #[tokio::test]
    async fn test_transform_success_single_call() {
        let provider = ScriptedProvider::ok("  Polished message.\n");
        let adapter = GenerationAdapter::new(BoxLlmProvider::new(provider.clone()), settings());

        let draft = adapter
            .transform("rough message", GenerationMode::Generate)
            .await
            .unwrap();

        assert_eq!(draft.text(), "  Polished message.\n");
        assert_eq!(
            draft.origin(),
            &DraftOrigin::Generated(GenerationMode::Generate)
        );
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transform_empty_response() {
        let provider = ScriptedProvider::ok("   ");
        let adapter = GenerationAdapter::new(BoxLlmProvider::new(provider.clone()), settings());

        let err = adapter
            .transform("rough", GenerationMode::Revise)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transform_service_failure_no_retry() {
        let provider = ScriptedProvider::failing("upstream 500");
        let adapter = GenerationAdapter::new(BoxLlmProvider::new(provider.clone()), settings());

        let err = adapter
            .transform("rough", GenerationMode::Generate)
            .await
            .unwrap_err();
        match err {
            GenerationError::ServiceFailure(LlmError::Provider { message }) => {
                assert_eq!(message, "upstream 500");
            }
            other => panic!("expected ServiceFailure, got {other:?}"),
        }
        assert_eq!(provider.call_count(), 1);
    }
}
