//! LlmProvider trait definition.
//!
//! This is the abstraction the generation service sits behind. Uses RPITIT
//! for `complete`; `BoxLlmProvider` erases the concrete type.

use clientassist_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends.
///
/// Single-shot: one call, one response, no streaming and no retry.
/// Implementations live in clientassist-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
