//! Inbound chat-platform events.
//!
//! The HTTP layer parses the platform's wire payloads into these shapes; the
//! workflow only ever sees [`InboundEvent`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::flow::{ChannelId, UserId};

/// Short-lived handle that allows opening a modal in response to a user
/// interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerRef(pub String);

/// Identifier of an open modal, used to replace its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewRef(pub String);

/// A slash command invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEvent {
    /// Command name including the leading slash.
    pub name: String,
    pub channel: ChannelId,
    pub user: UserId,
    pub trigger_ref: TriggerRef,
    /// Free text typed after the command.
    #[serde(default)]
    pub text: String,
}

/// The modal an action was fired from, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionView {
    pub view_ref: ViewRef,
    pub private_metadata: String,
}

/// An interactive element (button, select) was activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub action_id: String,
    /// Button value or selected option value.
    pub value: Option<String>,
    pub user: UserId,
    pub trigger_ref: TriggerRef,
    /// Channel of the message containing the element, when there is one.
    pub channel: Option<ChannelId>,
    /// Set when the element lives inside a modal.
    pub view: Option<ActionView>,
}

/// A modal form was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSubmissionEvent {
    pub callback_id: String,
    pub user: UserId,
    pub values: FormValues,
    pub private_metadata: String,
}

/// Every event kind the workflow reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    Command(CommandEvent),
    Action(ActionEvent),
    ViewSubmission(ViewSubmissionEvent),
}

impl InboundEvent {
    /// The stable identifier the event is routed by.
    pub fn route_key(&self) -> &str {
        match self {
            InboundEvent::Command(cmd) => &cmd.name,
            InboundEvent::Action(action) => &action.action_id,
            InboundEvent::ViewSubmission(sub) => &sub.callback_id,
        }
    }

    /// The user who triggered the event.
    pub fn user(&self) -> &UserId {
        match self {
            InboundEvent::Command(cmd) => &cmd.user,
            InboundEvent::Action(action) => &action.user,
            InboundEvent::ViewSubmission(sub) => &sub.user,
        }
    }
}

/// The value of one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Free text input (None when left empty).
    Text(Option<String>),
    /// Single select (None when nothing chosen).
    Selected(Option<String>),
    /// Checkbox group: values of the checked options.
    Multi(Vec<String>),
}

/// Submitted form state: block id -> action id -> value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, BTreeMap<String, FieldValue>>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, block_id: &str, action_id: &str, value: FieldValue) {
        self.0
            .entry(block_id.to_string())
            .or_default()
            .insert(action_id.to_string(), value);
    }

    /// Builder-style [`FormValues::insert`].
    pub fn with(mut self, block_id: &str, action_id: &str, value: FieldValue) -> Self {
        self.insert(block_id, action_id, value);
        self
    }

    pub fn get(&self, block_id: &str, action_id: &str) -> Option<&FieldValue> {
        self.0.get(block_id).and_then(|b| b.get(action_id))
    }

    pub fn has_block(&self, block_id: &str) -> bool {
        self.0.contains_key(block_id)
    }

    /// Text input value, if the field exists and is non-empty.
    pub fn text(&self, block_id: &str, action_id: &str) -> Option<&str> {
        match self.get(block_id, action_id) {
            Some(FieldValue::Text(Some(text))) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Single-select value, if the field exists and something was chosen.
    pub fn selected(&self, block_id: &str, action_id: &str) -> Option<&str> {
        match self.get(block_id, action_id) {
            Some(FieldValue::Selected(Some(value))) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Iterate all fields as `(block_id, action_id, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &FieldValue)> {
        self.0.iter().flat_map(|(block, actions)| {
            actions
                .iter()
                .map(move |(action, value)| (block.as_str(), action.as_str(), value))
        })
    }
}
