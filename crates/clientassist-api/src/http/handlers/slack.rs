//! Slack endpoints: slash commands and interactivity.
//!
//! Both plan the event synchronously, hand the resulting transition to a
//! spawned engine task and acknowledge right away. Slack gives every request
//! three seconds; nothing slow happens before the ack.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use clientassist_core::platform::ChatPlatform;
use clientassist_core::workflow::field_errors;
use clientassist_infra::slack::payload::{
    InteractionForm, PayloadError, SlashCommandForm, parse_interaction,
};
use clientassist_types::event::InboundEvent;

use crate::http::error::AppError;
use crate::state::AppState;

/// What the immediate HTTP response carries.
#[derive(Debug, PartialEq)]
enum Ack {
    Empty,
    /// Keep the modal open and show these messages by block id.
    FieldErrors(BTreeMap<String, String>),
}

impl IntoResponse for Ack {
    fn into_response(self) -> Response {
        match self {
            Ack::Empty => StatusCode::OK.into_response(),
            Ack::FieldErrors(errors) => Json(serde_json::json!({
                "response_action": "errors",
                "errors": errors,
            }))
            .into_response(),
        }
    }
}

/// Plan `event` and spawn its execution (or its rejection notice).
fn dispatch<P: ChatPlatform + 'static>(state: &AppState<P>, event: InboundEvent) -> Ack {
    tracing::info!(route = event.route_key(), user = %event.user(), "inbound event");

    match state.planner.plan(&event) {
        Ok(transition) => {
            let engine = Arc::clone(&state.engine);
            tokio::spawn(async move { engine.execute(transition).await });
            Ack::Empty
        }
        Err(error) => {
            if let InboundEvent::ViewSubmission(submission) = &event {
                if let Some(errors) = field_errors(submission, &error) {
                    tracing::info!(
                        callback_id = %submission.callback_id,
                        error = %error,
                        "submission rejected inline"
                    );
                    return Ack::FieldErrors(errors);
                }
            }
            let engine = Arc::clone(&state.engine);
            tokio::spawn(async move { engine.reject(&event, &error).await });
            Ack::Empty
        }
    }
}

/// POST /slack/commands
pub async fn commands<P: ChatPlatform + 'static>(
    State(state): State<AppState<P>>,
    Form(form): Form<SlashCommandForm>,
) -> Response {
    dispatch(&state, InboundEvent::from(form)).into_response()
}

/// POST /slack/interactions
pub async fn interactions<P: ChatPlatform + 'static>(
    State(state): State<AppState<P>>,
    Form(form): Form<InteractionForm>,
) -> Result<Response, AppError> {
    let event = match parse_interaction(&form.payload) {
        Ok(event) => event,
        Err(PayloadError::Unsupported) => {
            tracing::debug!("ignoring unsupported interaction type");
            return Ok(StatusCode::OK.into_response());
        }
        Err(e) => return Err(e.into()),
    };
    Ok(dispatch(&state, event).into_response())
}
