//! Application configuration types for ClientAssist.
//!
//! `AppConfig` represents the top-level `config.toml`. Every field has a
//! default so an empty or missing file yields a working configuration;
//! credentials are not part of this file (they come from the environment).

use serde::{Deserialize, Serialize};

use crate::catalog::{ChecklistCatalog, TemplateCatalog};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,

    #[serde(default)]
    pub slack: SlackConfig,

    /// Replaces the built-in template catalog when present.
    #[serde(default)]
    pub templates: Option<TemplateCatalog>,

    /// Replaces the built-in checklist catalog when present.
    #[serde(default)]
    pub checklists: Option<ChecklistCatalog>,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Generation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Human-readable provider name used in logs.
    #[serde(default = "default_provider_name")]
    pub provider_name: String,
    /// Override the provider base URL (any OpenAI-compatible endpoint).
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Timeout for one completion call.
    #[serde(default = "default_generation_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider_name() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_generation_timeout_secs() -> u64 {
    60
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider_name: default_provider_name(),
            base_url: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: None,
            timeout_secs: default_generation_timeout_secs(),
        }
    }
}

/// Workflow behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Slash command that starts a flow.
    #[serde(default = "default_command")]
    pub command: String,
    /// Maximum revise passes per flow.
    #[serde(default = "default_max_revisions")]
    pub max_revisions: u32,
}

fn default_command() -> String {
    "/client-assistant".to_string()
}

fn default_max_revisions() -> u32 {
    10
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            max_revisions: default_max_revisions(),
        }
    }
}

/// Chat platform client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Timeout for each outbound Web API call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://slack.com/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
