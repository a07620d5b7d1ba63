//! Application state wiring the workflow to its adapters.
//!
//! The planner and engine are built once at startup; handlers share them
//! through cheap `Arc` clones. `AppState` is generic over the chat platform
//! so handler tests can run against a recording mock.

use std::sync::Arc;

use secrecy::ExposeSecret;

use clientassist_core::catalog::Catalogs;
use clientassist_core::generation::{GenerationAdapter, GenerationSettings};
use clientassist_core::platform::ChatPlatform;
use clientassist_core::token::TokenCodec;
use clientassist_core::workflow::{Planner, WorkflowEngine};
use clientassist_infra::config::Credentials;
use clientassist_infra::llm::create_provider;
use clientassist_infra::slack::SlackClient;
use clientassist_types::config::AppConfig;

pub struct AppState<P: ChatPlatform = SlackClient> {
    pub planner: Arc<Planner>,
    pub engine: Arc<WorkflowEngine<P>>,
}

impl<P: ChatPlatform> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            planner: Arc::clone(&self.planner),
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<P: ChatPlatform> AppState<P> {
    /// Wire a planner and engine around an existing platform and generator.
    pub fn from_parts(
        config: &AppConfig,
        platform: Arc<P>,
        generator: GenerationAdapter,
        token_key: &[u8],
    ) -> Self {
        let catalogs = Arc::new(Catalogs::from_config(config));
        let codec = Arc::new(TokenCodec::new(token_key));

        let engine = WorkflowEngine::new(
            platform,
            Arc::new(generator),
            Arc::clone(&codec),
            Arc::clone(&catalogs),
            config.workflow.command.clone(),
        );
        let planner = Planner::new(codec, catalogs, config.workflow.clone());

        Self {
            planner: Arc::new(planner),
            engine: Arc::new(engine),
        }
    }
}

impl AppState<SlackClient> {
    /// Production wiring: Slack Web API plus the configured LLM provider.
    pub fn init(config: &AppConfig, credentials: Credentials) -> anyhow::Result<Self> {
        let token_key = credentials.token_signing_key().expose_secret().as_bytes().to_vec();

        let provider = create_provider(&config.generation, credentials.openai_api_key)?;
        let generator =
            GenerationAdapter::new(provider, GenerationSettings::from(&config.generation));
        let slack = SlackClient::new(&config.slack, credentials.slack_bot_token)?;

        tracing::info!(
            command = %config.workflow.command,
            model = %config.generation.model,
            max_revisions = config.workflow.max_revisions,
            "workflow ready"
        );

        Ok(Self::from_parts(config, Arc::new(slack), generator, &token_key))
    }
}
