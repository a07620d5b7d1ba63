//! Parsing of Slack's inbound wire payloads into [`InboundEvent`]s.
//!
//! Slash commands arrive as a urlencoded form; interactions arrive as a
//! urlencoded form whose single `payload` field holds JSON.

use std::collections::BTreeMap;

use serde::Deserialize;

use clientassist_types::event::{
    ActionEvent, ActionView, CommandEvent, FieldValue, FormValues, InboundEvent, TriggerRef,
    ViewRef, ViewSubmissionEvent,
};
use clientassist_types::flow::{ChannelId, UserId};

/// An interaction payload could not be turned into an event.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("malformed interaction payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Interaction types the workflow does not react to (e.g. `view_closed`).
    #[error("unsupported interaction type")]
    Unsupported,

    #[error("block_actions payload without actions")]
    NoAction,
}

/// Slash command form fields.
#[derive(Debug, Clone, Deserialize)]
pub struct SlashCommandForm {
    pub command: String,
    pub channel_id: String,
    pub user_id: String,
    pub trigger_id: String,
    #[serde(default)]
    pub text: String,
}

impl From<SlashCommandForm> for InboundEvent {
    fn from(form: SlashCommandForm) -> Self {
        InboundEvent::Command(CommandEvent {
            name: form.command,
            channel: ChannelId(form.channel_id),
            user: UserId(form.user_id),
            trigger_ref: TriggerRef(form.trigger_id),
            text: form.text,
        })
    }
}

/// Interaction form: one JSON-encoded `payload` field.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionForm {
    pub payload: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawInteraction {
    BlockActions {
        user: RawId,
        trigger_id: String,
        #[serde(default)]
        channel: Option<RawId>,
        #[serde(default)]
        view: Option<RawView>,
        #[serde(default)]
        actions: Vec<RawAction>,
    },
    ViewSubmission {
        user: RawId,
        view: RawView,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct RawId {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RawView {
    id: String,
    #[serde(default)]
    callback_id: String,
    #[serde(default)]
    private_metadata: String,
    #[serde(default)]
    state: Option<RawState>,
}

#[derive(Debug, Deserialize)]
struct RawState {
    #[serde(default)]
    values: BTreeMap<String, BTreeMap<String, RawFieldState>>,
}

#[derive(Debug, Deserialize)]
struct RawFieldState {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    selected_option: Option<RawOption>,
    #[serde(default)]
    selected_options: Option<Vec<RawOption>>,
}

#[derive(Debug, Deserialize)]
struct RawOption {
    value: String,
}

#[derive(Debug, Deserialize)]
struct RawAction {
    action_id: String,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    selected_option: Option<RawOption>,
}

impl RawFieldState {
    fn into_field_value(self) -> FieldValue {
        match self.kind.as_str() {
            "plain_text_input" => FieldValue::Text(self.value),
            "static_select" | "external_select" | "radio_buttons" => {
                FieldValue::Selected(self.selected_option.map(|o| o.value))
            }
            "checkboxes" | "multi_static_select" => FieldValue::Multi(
                self.selected_options
                    .unwrap_or_default()
                    .into_iter()
                    .map(|o| o.value)
                    .collect(),
            ),
            _ => match (self.selected_options, self.selected_option) {
                (Some(options), _) => {
                    FieldValue::Multi(options.into_iter().map(|o| o.value).collect())
                }
                (None, Some(option)) => FieldValue::Selected(Some(option.value)),
                (None, None) => FieldValue::Text(self.value),
            },
        }
    }
}

fn form_values(state: Option<RawState>) -> FormValues {
    let mut values = FormValues::new();
    for (block_id, actions) in state.map(|s| s.values).unwrap_or_default() {
        for (action_id, field) in actions {
            values.insert(&block_id, &action_id, field.into_field_value());
        }
    }
    values
}

/// Parse the JSON of an interaction `payload` field.
pub fn parse_interaction(payload: &str) -> Result<InboundEvent, PayloadError> {
    match serde_json::from_str::<RawInteraction>(payload)? {
        RawInteraction::BlockActions {
            user,
            trigger_id,
            channel,
            view,
            actions,
        } => {
            let action = actions.into_iter().next().ok_or(PayloadError::NoAction)?;
            Ok(InboundEvent::Action(ActionEvent {
                action_id: action.action_id,
                value: action.value.or(action.selected_option.map(|o| o.value)),
                user: UserId(user.id),
                trigger_ref: TriggerRef(trigger_id),
                channel: channel.map(|c| ChannelId(c.id)),
                view: view.map(|v| ActionView {
                    view_ref: ViewRef(v.id),
                    private_metadata: v.private_metadata,
                }),
            }))
        }
        RawInteraction::ViewSubmission { user, view } => {
            Ok(InboundEvent::ViewSubmission(ViewSubmissionEvent {
                callback_id: view.callback_id,
                user: UserId(user.id),
                values: form_values(view.state),
                private_metadata: view.private_metadata,
            }))
        }
        RawInteraction::Other => Err(PayloadError::Unsupported),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slash_command_form() {
        let form = SlashCommandForm {
            command: "/client-assistant".to_string(),
            channel_id: "C1".to_string(),
            user_id: "U1".to_string(),
            trigger_id: "T.1".to_string(),
            text: String::new(),
        };
        match InboundEvent::from(form) {
            InboundEvent::Command(cmd) => {
                assert_eq!(cmd.name, "/client-assistant");
                assert_eq!(cmd.channel, ChannelId::from("C1"));
                assert_eq!(cmd.trigger_ref, TriggerRef("T.1".to_string()));
            }
            other => panic!("expected command, got {other:?}"),
        }
    }

    #[test]
    fn test_button_in_message() {
        let payload = json!({
            "type": "block_actions",
            "user": { "id": "U1", "username": "sam" },
            "trigger_id": "T.2",
            "channel": { "id": "C1", "name": "general" },
            "container": { "type": "message" },
            "actions": [{
                "type": "button",
                "action_id": "approve_message",
                "block_id": "draft_actions",
                "value": "v1.abc.def",
            }],
        });

        let event = parse_interaction(&payload.to_string()).unwrap();
        let InboundEvent::Action(action) = event else {
            panic!("expected action");
        };
        assert_eq!(action.action_id, "approve_message");
        assert_eq!(action.value.as_deref(), Some("v1.abc.def"));
        assert_eq!(action.channel, Some(ChannelId::from("C1")));
        assert!(action.view.is_none());
    }

    #[test]
    fn test_select_inside_modal() {
        let payload = json!({
            "type": "block_actions",
            "user": { "id": "U1" },
            "trigger_id": "T.3",
            "view": {
                "id": "V1",
                "callback_id": "message_options",
                "private_metadata": "v1.ctx.sig",
                "state": { "values": {} },
            },
            "actions": [{
                "type": "static_select",
                "action_id": "message_option_selected",
                "selected_option": { "text": { "type": "plain_text", "text": "Custom" }, "value": "custom" },
            }],
        });

        let InboundEvent::Action(action) = parse_interaction(&payload.to_string()).unwrap() else {
            panic!("expected action");
        };
        assert_eq!(action.value.as_deref(), Some("custom"));
        assert!(action.channel.is_none());
        let view = action.view.unwrap();
        assert_eq!(view.view_ref, ViewRef("V1".to_string()));
        assert_eq!(view.private_metadata, "v1.ctx.sig");
    }

    #[test]
    fn test_view_submission_values() {
        let payload = json!({
            "type": "view_submission",
            "user": { "id": "U1" },
            "view": {
                "id": "V2",
                "callback_id": "submit_qa",
                "private_metadata": "v1.ctx.sig",
                "state": { "values": {
                    "message_input": {
                        "message_text": { "type": "plain_text_input", "value": "Hello" }
                    },
                    "template_select": {
                        "template_selected": {
                            "type": "static_select",
                            "selected_option": { "value": "project_update" }
                        }
                    },
                    "checklist_item_0": {
                        "checkbox_0": {
                            "type": "checkboxes",
                            "selected_options": [{ "value": "checked" }]
                        }
                    },
                    "checklist_item_1": {
                        "checkbox_1": { "type": "checkboxes", "selected_options": [] }
                    },
                    "notes": {
                        "notes_text": { "type": "plain_text_input", "value": null }
                    }
                }},
            },
        });

        let InboundEvent::ViewSubmission(sub) = parse_interaction(&payload.to_string()).unwrap()
        else {
            panic!("expected view submission");
        };
        assert_eq!(sub.callback_id, "submit_qa");
        assert_eq!(sub.private_metadata, "v1.ctx.sig");
        assert_eq!(sub.values.text("message_input", "message_text"), Some("Hello"));
        assert_eq!(
            sub.values.selected("template_select", "template_selected"),
            Some("project_update")
        );
        assert_eq!(
            sub.values.get("checklist_item_0", "checkbox_0"),
            Some(&FieldValue::Multi(vec!["checked".to_string()]))
        );
        assert_eq!(
            sub.values.get("checklist_item_1", "checkbox_1"),
            Some(&FieldValue::Multi(vec![]))
        );
        assert_eq!(
            sub.values.get("notes", "notes_text"),
            Some(&FieldValue::Text(None))
        );
    }

    #[test]
    fn test_unsupported_type() {
        let payload = json!({ "type": "view_closed", "user": { "id": "U1" } });
        assert!(matches!(
            parse_interaction(&payload.to_string()),
            Err(PayloadError::Unsupported)
        ));
    }

    #[test]
    fn test_block_actions_without_action() {
        let payload = json!({
            "type": "block_actions",
            "user": { "id": "U1" },
            "trigger_id": "T.4",
            "actions": [],
        });
        assert!(matches!(
            parse_interaction(&payload.to_string()),
            Err(PayloadError::NoAction)
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_interaction("{not json"),
            Err(PayloadError::Json(_))
        ));
    }
}
