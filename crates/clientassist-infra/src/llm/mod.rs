//! LLM provider implementations.
//!
//! [`create_provider`] builds the configured provider behind a
//! [`BoxLlmProvider`] so the generation adapter stays provider-agnostic.

pub mod openai_compat;

use std::time::Duration;

use secrecy::SecretString;

use clientassist_core::llm::box_provider::BoxLlmProvider;
use clientassist_types::config::GenerationConfig;
use clientassist_types::llm::LlmError;

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::{OpenAiCompatConfig, openai_defaults};

/// Create a [`BoxLlmProvider`] from the generation settings.
///
/// A configured `base_url` points the provider at any OpenAI-compatible
/// endpoint; otherwise the OpenAI API is used.
pub fn create_provider(
    config: &GenerationConfig,
    api_key: SecretString,
) -> Result<BoxLlmProvider, LlmError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let oai_config = match config.base_url.as_deref() {
        Some(base_url) => OpenAiCompatConfig {
            provider_name: config.provider_name.clone(),
            base_url: base_url.to_string(),
            api_key,
            model: config.model.clone(),
            timeout,
        },
        None => OpenAiCompatConfig {
            provider_name: config.provider_name.clone(),
            timeout,
            ..openai_defaults(api_key, &config.model)
        },
    };

    tracing::debug!(
        provider = %oai_config.provider_name,
        base_url = %oai_config.base_url,
        model = %oai_config.model,
        "creating LLM provider"
    );
    Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(oai_config)?))
}
