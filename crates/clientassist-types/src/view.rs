//! Platform-neutral description of messages and modals.
//!
//! The workflow builds these; the platform adapter renders them to its own
//! layout format.

use serde::{Deserialize, Serialize};

/// One option of a select or checkbox group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Primary,
    Danger,
}

/// Interactive element inside an actions row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Button {
        action_id: String,
        text: String,
        value: Option<String>,
        style: Option<ButtonStyle>,
    },
    Select {
        action_id: String,
        placeholder: String,
        options: Vec<SelectOption>,
    },
}

/// A layout block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Markdown text.
    Section { text: String },
    /// A row of interactive elements.
    Actions {
        block_id: Option<String>,
        elements: Vec<Element>,
    },
    /// Form text input.
    TextInput {
        block_id: String,
        action_id: String,
        label: String,
        initial_value: Option<String>,
        multiline: bool,
    },
    /// Form single select.
    SelectInput {
        block_id: String,
        action_id: String,
        label: String,
        placeholder: String,
        options: Vec<SelectOption>,
    },
    /// Form checkbox group. Always optional: unchecked is a valid answer.
    Checkboxes {
        block_id: String,
        action_id: String,
        label: String,
        options: Vec<SelectOption>,
    },
}

/// A chat message: fallback text plus optional rich blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Plain text shown in notifications and on clients without block support.
    pub text: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl OutgoingMessage {
    /// A plain-text message with no blocks.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            blocks: Vec::new(),
        }
    }

    pub fn with_blocks(text: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            text: text.into(),
            blocks,
        }
    }

    /// Every button in the message, in order.
    pub fn buttons(&self) -> Vec<&Element> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Actions { elements, .. } => Some(elements),
                _ => None,
            })
            .flatten()
            .filter(|e| matches!(e, Element::Button { .. }))
            .collect()
    }
}

/// A modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub callback_id: String,
    pub title: String,
    /// Opaque string round-tripped by the platform (carries the correlation token).
    pub private_metadata: String,
    pub blocks: Vec<Block>,
    /// Submit button label; `None` for modals without a form.
    pub submit: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_collects_only_buttons() {
        let msg = OutgoingMessage::with_blocks(
            "draft",
            vec![
                Block::Section {
                    text: "draft".to_string(),
                },
                Block::Actions {
                    block_id: None,
                    elements: vec![
                        Element::Button {
                            action_id: "edit_message".to_string(),
                            text: "Edit".to_string(),
                            value: Some("tok".to_string()),
                            style: None,
                        },
                        Element::Select {
                            action_id: "pick".to_string(),
                            placeholder: "Pick".to_string(),
                            options: vec![SelectOption::new("a", "a")],
                        },
                    ],
                },
            ],
        );
        assert_eq!(msg.buttons().len(), 1);
    }

    #[test]
    fn test_plain_text_message_has_no_blocks() {
        let msg = OutgoingMessage::text("hello");
        assert_eq!(msg.text, "hello");
        assert!(msg.blocks.is_empty());
    }
}
