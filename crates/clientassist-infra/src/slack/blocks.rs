//! Block Kit rendering for abstract messages and views.

use serde_json::{Value, json};

use clientassist_types::view::{Block, ButtonStyle, Element, OutgoingMessage, SelectOption, View};

/// Slack caps modal titles at 24 characters.
const MAX_TITLE_CHARS: usize = 24;
/// Button, option and label text cap.
const MAX_LABEL_CHARS: usize = 75;

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}

fn plain_text(text: &str, max: usize) -> Value {
    json!({ "type": "plain_text", "text": truncate(text, max) })
}

fn option(opt: &SelectOption) -> Value {
    json!({
        "text": plain_text(&opt.label, MAX_LABEL_CHARS),
        "value": opt.value,
    })
}

fn static_select(action_id: &str, placeholder: &str, options: &[SelectOption]) -> Value {
    json!({
        "type": "static_select",
        "action_id": action_id,
        "placeholder": plain_text(placeholder, MAX_LABEL_CHARS),
        "options": options.iter().map(option).collect::<Vec<_>>(),
    })
}

fn element(element: &Element) -> Value {
    match element {
        Element::Button {
            action_id,
            text,
            value,
            style,
        } => {
            let mut button = json!({
                "type": "button",
                "action_id": action_id,
                "text": plain_text(text, MAX_LABEL_CHARS),
            });
            if let Some(value) = value {
                button["value"] = json!(value);
            }
            if let Some(style) = style {
                button["style"] = json!(match style {
                    ButtonStyle::Primary => "primary",
                    ButtonStyle::Danger => "danger",
                });
            }
            button
        }
        Element::Select {
            action_id,
            placeholder,
            options,
        } => static_select(action_id, placeholder, options),
    }
}

fn input(block_id: &str, label: &str, element: Value, optional: bool) -> Value {
    let mut block = json!({
        "type": "input",
        "block_id": block_id,
        "label": plain_text(label, MAX_LABEL_CHARS),
        "element": element,
    });
    if optional {
        block["optional"] = json!(true);
    }
    block
}

/// Render one block.
pub fn block(block: &Block) -> Value {
    match block {
        Block::Section { text } => json!({
            "type": "section",
            "text": { "type": "mrkdwn", "text": text },
        }),
        Block::Actions { block_id, elements } => {
            let mut actions = json!({
                "type": "actions",
                "elements": elements.iter().map(element).collect::<Vec<_>>(),
            });
            if let Some(block_id) = block_id {
                actions["block_id"] = json!(block_id);
            }
            actions
        }
        Block::TextInput {
            block_id,
            action_id,
            label,
            initial_value,
            multiline,
        } => {
            let mut text_input = json!({
                "type": "plain_text_input",
                "action_id": action_id,
                "multiline": multiline,
            });
            if let Some(initial) = initial_value {
                text_input["initial_value"] = json!(initial);
            }
            input(block_id, label, text_input, false)
        }
        Block::SelectInput {
            block_id,
            action_id,
            label,
            placeholder,
            options,
        } => input(
            block_id,
            label,
            static_select(action_id, placeholder, options),
            false,
        ),
        Block::Checkboxes {
            block_id,
            action_id,
            label,
            options,
        } => input(
            block_id,
            label,
            json!({
                "type": "checkboxes",
                "action_id": action_id,
                "options": options.iter().map(option).collect::<Vec<_>>(),
            }),
            true,
        ),
    }
}

pub fn blocks(blocks: &[Block]) -> Value {
    Value::Array(blocks.iter().map(block).collect())
}

/// Render a modal view.
pub fn view(view: &View) -> Value {
    let mut modal = json!({
        "type": "modal",
        "callback_id": view.callback_id,
        "title": plain_text(&view.title, MAX_TITLE_CHARS),
        "close": plain_text("Cancel", MAX_TITLE_CHARS),
        "private_metadata": view.private_metadata,
        "blocks": blocks(&view.blocks),
    });
    if let Some(submit) = &view.submit {
        modal["submit"] = plain_text(submit, MAX_TITLE_CHARS);
    }
    modal
}

/// Body fields shared by `chat.postMessage` and `chat.postEphemeral`.
pub fn message(channel: &str, message: &OutgoingMessage) -> Value {
    let mut body = json!({
        "channel": channel,
        "text": message.text,
    });
    if !message.blocks.is_empty() {
        body["blocks"] = blocks(&message.blocks);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_is_mrkdwn() {
        let rendered = block(&Block::Section {
            text: "*Draft*".to_string(),
        });
        assert_eq!(rendered["type"], "section");
        assert_eq!(rendered["text"]["type"], "mrkdwn");
        assert_eq!(rendered["text"]["text"], "*Draft*");
    }

    #[test]
    fn test_button_carries_value_and_style() {
        let rendered = block(&Block::Actions {
            block_id: None,
            elements: vec![
                Element::Button {
                    action_id: "approve_message".to_string(),
                    text: "Approve".to_string(),
                    value: Some("v1.tok".to_string()),
                    style: Some(ButtonStyle::Primary),
                },
                Element::Button {
                    action_id: "review_qa".to_string(),
                    text: "Review".to_string(),
                    value: None,
                    style: None,
                },
            ],
        });
        assert!(rendered.get("block_id").is_none());
        let approve = &rendered["elements"][0];
        assert_eq!(approve["type"], "button");
        assert_eq!(approve["value"], "v1.tok");
        assert_eq!(approve["style"], "primary");
        assert_eq!(approve["text"]["type"], "plain_text");

        let review = &rendered["elements"][1];
        assert!(review.get("value").is_none());
        assert!(review.get("style").is_none());
    }

    #[test]
    fn test_text_input_with_initial_value() {
        let rendered = block(&Block::TextInput {
            block_id: "message_input".to_string(),
            action_id: "message_text".to_string(),
            label: "Message".to_string(),
            initial_value: Some("We shipped v2 today.".to_string()),
            multiline: true,
        });
        assert_eq!(rendered["type"], "input");
        assert_eq!(rendered["block_id"], "message_input");
        assert!(rendered.get("optional").is_none());
        assert_eq!(rendered["element"]["type"], "plain_text_input");
        assert_eq!(rendered["element"]["multiline"], true);
        assert_eq!(rendered["element"]["initial_value"], "We shipped v2 today.");
    }

    #[test]
    fn test_checkboxes_are_optional_input() {
        let rendered = block(&Block::Checkboxes {
            block_id: "checklist_item_0".to_string(),
            action_id: "checkbox_0".to_string(),
            label: "Tone is professional".to_string(),
            options: vec![SelectOption::new("Yes", "checked")],
        });
        assert_eq!(rendered["type"], "input");
        assert_eq!(rendered["optional"], true);
        assert_eq!(rendered["element"]["type"], "checkboxes");
        assert_eq!(rendered["element"]["options"][0]["value"], "checked");
    }

    #[test]
    fn test_modal_title_is_truncated() {
        let rendered = view(&View {
            callback_id: "generate_message".to_string(),
            title: "A title that is far too long for a modal".to_string(),
            private_metadata: "v1.tok".to_string(),
            blocks: vec![],
            submit: Some("Generate".to_string()),
        });
        assert_eq!(rendered["type"], "modal");
        assert_eq!(rendered["private_metadata"], "v1.tok");
        assert_eq!(rendered["submit"]["text"], "Generate");
        let title = rendered["title"]["text"].as_str().unwrap();
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS);
        assert!(title.ends_with('…'));
    }

    #[test]
    fn test_modal_without_submit() {
        let rendered = view(&View {
            callback_id: "message_options".to_string(),
            title: "Client Assistant".to_string(),
            private_metadata: String::new(),
            blocks: vec![],
            submit: None,
        });
        assert!(rendered.get("submit").is_none());
        assert_eq!(rendered["title"]["text"], "Client Assistant");
    }

    #[test]
    fn test_message_omits_empty_blocks() {
        let body = message("C1", &OutgoingMessage::text("hello"));
        assert_eq!(body["channel"], "C1");
        assert_eq!(body["text"], "hello");
        assert!(body.get("blocks").is_none());

        let body = message(
            "C1",
            &OutgoingMessage::with_blocks(
                "hello",
                vec![Block::Section {
                    text: "hello".to_string(),
                }],
            ),
        );
        assert_eq!(body["blocks"].as_array().map(Vec::len), Some(1));
    }
}
