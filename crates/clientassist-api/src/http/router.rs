//! Axum router configuration with middleware.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use clientassist_core::platform::ChatPlatform;

use crate::http::handlers;
use crate::state::AppState;

/// Build the router: Slack endpoints, health check, request tracing.
pub fn build_router<P: ChatPlatform + 'static>(state: AppState<P>) -> Router {
    Router::new()
        .route("/slack/commands", post(handlers::slack::commands::<P>))
        .route("/slack/interactions", post(handlers::slack::interactions::<P>))
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
