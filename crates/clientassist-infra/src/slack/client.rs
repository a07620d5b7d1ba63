//! SlackClient: [`ChatPlatform`] over the Slack Web API.
//!
//! Every call is a JSON `POST {api_base}/{method}` with bearer auth. Slack
//! answers HTTP 200 with `{"ok": false, "error": "..."}` for most failures,
//! so the body is always inspected.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};

use clientassist_core::platform::ChatPlatform;
use clientassist_types::config::SlackConfig;
use clientassist_types::error::PlatformError;
use clientassist_types::event::{TriggerRef, ViewRef};
use clientassist_types::flow::{ChannelId, UserId};
use clientassist_types::view::{OutgoingMessage, View};

use super::blocks;

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Slack Web API client.
///
/// The bot token is a [`SecretString`], exposed only when building the
/// `Authorization` header.
pub struct SlackClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: SecretString,
}

impl SlackClient {
    pub fn new(config: &SlackConfig, bot_token: SecretString) -> Result<Self, PlatformError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PlatformError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token,
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base, method)
    }

    async fn call(&self, method: &str, body: Value) -> Result<(), PlatformError> {
        let response = self
            .http
            .post(self.url(method))
            .bearer_auth(self.bot_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| PlatformError::Transport(format!("{method}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::Api {
                method: method.to_string(),
                code: format!("http_{}", status.as_u16()),
            });
        }

        let parsed: SlackResponse = response
            .json()
            .await
            .map_err(|e| PlatformError::InvalidResponse(format!("{method}: {e}")))?;

        check_response(method, parsed)
    }
}

fn check_response(method: &str, response: SlackResponse) -> Result<(), PlatformError> {
    if response.ok {
        tracing::debug!(method, "slack call ok");
        Ok(())
    } else {
        let code = response.error.unwrap_or_else(|| "unknown_error".to_string());
        tracing::warn!(method, code = %code, "slack call rejected");
        Err(PlatformError::Api {
            method: method.to_string(),
            code,
        })
    }
}

impl ChatPlatform for SlackClient {
    async fn open_modal(&self, trigger: &TriggerRef, view: &View) -> Result<(), PlatformError> {
        self.call(
            "views.open",
            json!({ "trigger_id": trigger.0, "view": blocks::view(view) }),
        )
        .await
    }

    async fn update_modal(&self, view_ref: &ViewRef, view: &View) -> Result<(), PlatformError> {
        self.call(
            "views.update",
            json!({ "view_id": view_ref.0, "view": blocks::view(view) }),
        )
        .await
    }

    async fn post_message(
        &self,
        channel: &ChannelId,
        message: &OutgoingMessage,
    ) -> Result<(), PlatformError> {
        self.call("chat.postMessage", blocks::message(&channel.0, message))
            .await
    }

    async fn post_ephemeral(
        &self,
        channel: &ChannelId,
        user: &UserId,
        message: &OutgoingMessage,
    ) -> Result<(), PlatformError> {
        let mut body = blocks::message(&channel.0, message);
        body["user"] = json!(user.0);
        self.call("chat.postEphemeral", body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_base: &str) -> SlackClient {
        let config = SlackConfig {
            api_base: api_base.to_string(),
            timeout_secs: 1,
        };
        SlackClient::new(&config, SecretString::from("xoxb-test")).unwrap()
    }

    #[test]
    fn test_url_joins_method() {
        assert_eq!(
            client("https://slack.com/api/").url("chat.postMessage"),
            "https://slack.com/api/chat.postMessage"
        );
    }

    #[test]
    fn test_ok_response() {
        let response: SlackResponse = serde_json::from_str(r#"{"ok":true,"ts":"1.2"}"#).unwrap();
        assert!(check_response("chat.postMessage", response).is_ok());
    }

    #[test]
    fn test_error_response_maps_code() {
        let response: SlackResponse =
            serde_json::from_str(r#"{"ok":false,"error":"channel_not_found"}"#).unwrap();
        assert_eq!(
            check_response("chat.postMessage", response),
            Err(PlatformError::Api {
                method: "chat.postMessage".to_string(),
                code: "channel_not_found".to_string(),
            })
        );
    }

    #[test]
    fn test_error_response_without_code() {
        let response: SlackResponse = serde_json::from_str(r#"{"ok":false}"#).unwrap();
        match check_response("views.open", response) {
            Err(PlatformError::Api { code, .. }) => assert_eq!(code, "unknown_error"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost refuses connections in test environments.
        let client = client("http://127.0.0.1:9");
        let result = client
            .post_message(&ChannelId::from("C1"), &OutgoingMessage::text("hi"))
            .await;
        assert!(matches!(result, Err(PlatformError::Transport(_))));
    }
}
