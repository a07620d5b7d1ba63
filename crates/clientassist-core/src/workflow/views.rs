//! Message and modal builders for every step of the flow.
//!
//! Everything here is platform-neutral; infra renders the result to the
//! platform's layout format. Interactive elements carry the correlation
//! token as their value (buttons) or as `private_metadata` (modals).

use clientassist_types::catalog::{
    ChecklistCatalog, ChecklistDefinition, ChecklistTally, TemplateCatalog, display_name,
};
use clientassist_types::error::{
    GenerationError, PublishError, UsageError, WorkflowError,
};
use clientassist_types::flow::{ContentOption, DraftMessage};
use clientassist_types::view::{
    Block, ButtonStyle, Element, OutgoingMessage, SelectOption, View,
};

use crate::checklist::{CHECKED_VALUE, item_action_id, item_block_id};
use crate::token::CorrelationToken;

use super::ids::{action, callback, field};

const GENERATE_TITLE: &str = "Generate Client Message";
const REVIEW_TITLE: &str = "Review QA Checklist";

pub const APPROVED_CONFIRMATION: &str =
    "Your message has been approved and posted to the channel.";

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

fn section(text: impl Into<String>) -> Block {
    Block::Section { text: text.into() }
}

fn button(
    action_id: &str,
    text: &str,
    token: &CorrelationToken,
    style: Option<ButtonStyle>,
) -> Element {
    Element::Button {
        action_id: action_id.to_string(),
        text: text.to_string(),
        value: Some(token.to_string()),
        style,
    }
}

fn edit_button(token: &CorrelationToken) -> Element {
    button(action::EDIT_MESSAGE, "Edit", token, None)
}

fn review_button(token: &CorrelationToken) -> Element {
    button(action::REVIEW_QA, "Review", token, None)
}

fn approve_button(token: &CorrelationToken) -> Element {
    button(
        action::APPROVE_MESSAGE,
        "Approve",
        token,
        Some(ButtonStyle::Primary),
    )
}

fn actions(elements: Vec<Element>) -> Block {
    Block::Actions {
        block_id: None,
        elements,
    }
}

// ---------------------------------------------------------------------------
// Start menu and generation modals
// ---------------------------------------------------------------------------

/// The ephemeral menu shown after the slash command.
pub fn menu(token: &CorrelationToken) -> OutgoingMessage {
    let text = "Welcome to the Client Assistant Bot! What would you like to do?";
    OutgoingMessage::with_blocks(
        text,
        vec![
            section(text),
            actions(vec![
                button(action::GENERATE_MESSAGE, GENERATE_TITLE, token, None),
                button(action::REVIEW_QA, REVIEW_TITLE, token, None),
            ]),
        ],
    )
}

/// First modal: pick how the content is supplied.
pub fn options_modal(token: &CorrelationToken) -> View {
    let options = ContentOption::ALL
        .iter()
        .map(|o| SelectOption::new(o.label(), o.to_string()))
        .collect();

    View {
        callback_id: callback::MESSAGE_OPTIONS.to_string(),
        title: GENERATE_TITLE.to_string(),
        private_metadata: token.to_string(),
        blocks: vec![
            section("Choose a message generation option:"),
            actions(vec![Element::Select {
                action_id: action::MESSAGE_OPTION_SELECTED.to_string(),
                placeholder: "Select an option".to_string(),
                options,
            }]),
        ],
        submit: None,
    }
}

/// Second modal: the form for the chosen option.
pub fn content_form(
    option: ContentOption,
    templates: &TemplateCatalog,
    token: &CorrelationToken,
) -> View {
    let block = match option {
        ContentOption::Predefined => Block::SelectInput {
            block_id: field::TEMPLATE_BLOCK.to_string(),
            action_id: field::TEMPLATE_ACTION.to_string(),
            label: "Choose a template:".to_string(),
            placeholder: "Select a template".to_string(),
            options: templates
                .names()
                .map(|name| SelectOption::new(display_name(name), name))
                .collect(),
        },
        ContentOption::Custom | ContentOption::Revise => Block::TextInput {
            block_id: field::MESSAGE_BLOCK.to_string(),
            action_id: field::MESSAGE_ACTION.to_string(),
            label: if option == ContentOption::Custom {
                "Enter your message:".to_string()
            } else {
                "Enter the message to revise:".to_string()
            },
            initial_value: None,
            multiline: true,
        },
    };

    View {
        callback_id: callback::GENERATE_MESSAGE.to_string(),
        title: GENERATE_TITLE.to_string(),
        private_metadata: token.to_string(),
        blocks: vec![block],
        submit: Some("Generate".to_string()),
    }
}

/// Edit modal, prefilled with the current draft.
pub fn edit_modal(draft: &str, token: &CorrelationToken) -> View {
    View {
        callback_id: callback::EDIT_MESSAGE_SUBMIT.to_string(),
        title: "Edit Message".to_string(),
        private_metadata: token.to_string(),
        blocks: vec![Block::TextInput {
            block_id: field::MESSAGE_BLOCK.to_string(),
            action_id: field::MESSAGE_ACTION.to_string(),
            label: "Edit your message:".to_string(),
            initial_value: Some(draft.to_string()),
            multiline: true,
        }],
        submit: Some("Submit".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Draft delivery
// ---------------------------------------------------------------------------

/// A generated draft.
///
/// With a token the draft carries Edit, Review and Approve. Without one it is
/// delivered as text only and `note` tells the user why.
pub fn draft_message(
    draft: &DraftMessage,
    token: Option<&CorrelationToken>,
    note: Option<&str>,
) -> OutgoingMessage {
    let heading = "Here's your generated message:";
    let mut blocks = vec![section(draft.text())];
    if let Some(token) = token {
        blocks.push(actions(vec![
            edit_button(token),
            review_button(token),
            approve_button(token),
        ]));
    }
    if let Some(note) = note {
        blocks.push(section(format!("_{note}_")));
    }
    OutgoingMessage::with_blocks(format!("{heading}\n\n{}", draft.text()), blocks)
}

/// Notice sent when the generation service did not produce a draft.
///
/// The base text is echoed back, and with a token an Edit button lets the
/// user try again without retyping it.
pub fn generation_failure(
    error: &GenerationError,
    base_text: &str,
    token: Option<&CorrelationToken>,
) -> OutgoingMessage {
    let reason = match error {
        GenerationError::EmptyResponse => "the generation service returned an empty message",
        GenerationError::ServiceFailure(_) => "the generation service is unavailable right now",
    };
    let text = format!("Sorry, I couldn't generate your message: {reason}.");

    let mut blocks = vec![
        section(&text),
        section(format!("*Your text:*\n{base_text}")),
    ];
    if let Some(token) = token {
        blocks.push(actions(vec![edit_button(token)]));
    }
    OutgoingMessage::with_blocks(text, blocks)
}

/// Wrap a message that could not be posted in its channel for delivery by
/// direct message instead.
pub fn direct_fallback(message: OutgoingMessage) -> OutgoingMessage {
    let notice = "There was an error posting the message to the channel, so here it is directly.";
    let mut blocks = Vec::with_capacity(message.blocks.len() + 1);
    if !message.blocks.is_empty() {
        blocks.push(section(notice));
        blocks.extend(message.blocks);
    }
    OutgoingMessage::with_blocks(format!("{notice}\n\n{}", message.text), blocks)
}

// ---------------------------------------------------------------------------
// QA review
// ---------------------------------------------------------------------------

/// Modal listing the available checklists.
pub fn checklist_picker(checklists: &ChecklistCatalog, token: &CorrelationToken) -> View {
    View {
        callback_id: callback::QA_CHECKLIST.to_string(),
        title: REVIEW_TITLE.to_string(),
        private_metadata: token.to_string(),
        blocks: vec![
            section("Choose a QA checklist to review:"),
            actions(vec![Element::Select {
                action_id: action::CHECKLIST_SELECTED.to_string(),
                placeholder: "Select a checklist".to_string(),
                options: checklists
                    .names()
                    .map(|name| SelectOption::new(display_name(name), name))
                    .collect(),
            }]),
        ],
        submit: None,
    }
}

/// The review form: the draft under review (if any), then one optional
/// checkbox group per item.
pub fn checklist_form(
    checklist: &ChecklistDefinition,
    draft: Option<&str>,
    token: &CorrelationToken,
) -> View {
    let mut blocks = Vec::with_capacity(checklist.items.len() + 1);
    if let Some(draft) = draft {
        blocks.push(section(format!("*Message under review:*\n{draft}")));
    }
    blocks.extend(checklist.items.iter().enumerate().map(|(i, item)| {
        Block::Checkboxes {
            block_id: item_block_id(i),
            action_id: item_action_id(i),
            label: format!("{}. {item}", i + 1),
            options: vec![SelectOption::new("Completed", CHECKED_VALUE)],
        }
    }));

    View {
        callback_id: callback::SUBMIT_QA.to_string(),
        title: REVIEW_TITLE.to_string(),
        private_metadata: token.to_string(),
        blocks,
        submit: Some("Submit".to_string()),
    }
}

pub fn tally_text(tally: &ChecklistTally) -> String {
    format!("QA Checklist completed: {tally} items checked.")
}

/// Result of a review. When a draft was reviewed the user can go on to edit
/// or approve it.
pub fn tally_report(tally: &ChecklistTally, token: Option<&CorrelationToken>) -> OutgoingMessage {
    let text = tally_text(tally);
    match token {
        Some(token) => OutgoingMessage::with_blocks(
            text.clone(),
            vec![
                section(text),
                actions(vec![edit_button(token), approve_button(token)]),
            ],
        ),
        None => OutgoingMessage::text(text),
    }
}

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

pub fn approved_confirmation() -> OutgoingMessage {
    OutgoingMessage::text(APPROVED_CONFIRMATION)
}

pub fn publish_failure(error: &PublishError) -> OutgoingMessage {
    OutgoingMessage::text(format!(
        "Sorry, I couldn't post your message to <#{}>. Make sure I've been added to the \
         channel and try again. ({})",
        error.channel, error.source
    ))
}

/// Something went wrong opening or updating a modal.
pub fn modal_failure() -> OutgoingMessage {
    OutgoingMessage::text("Sorry, I couldn't open that form. Please try again.")
}

/// Plain-language explanation of a rejected request.
pub fn usage_text(error: &UsageError) -> String {
    match error {
        UsageError::UnknownTemplate(name) => {
            format!("Template '{name}' is not available. Please pick another one.")
        }
        UsageError::UnknownChecklist(name) => {
            format!("Checklist '{name}' is not available. Please pick another one.")
        }
        UsageError::UnknownOption(option) => format!("'{option}' is not a message option."),
        UsageError::EmptyDraft => "Please enter a message.".to_string(),
        UsageError::MalformedSubmission(detail) => {
            format!("Something was missing from the form: {detail}.")
        }
        UsageError::IllegalTransition { .. } => {
            "That step isn't available for this message any more.".to_string()
        }
        UsageError::RevisionLimit { limit } => format!(
            "This message has already been revised {limit} times. Approve it or start a new \
             request."
        ),
    }
}

/// Notice for a request the planner turned down.
pub fn rejection(error: &WorkflowError, command: &str) -> OutgoingMessage {
    let text = match error {
        WorkflowError::Usage(usage) => usage_text(usage),
        WorkflowError::ContextUnavailable(_) => format!(
            "This request has expired or is no longer valid. Run `{command}` to start again."
        ),
        WorkflowError::UnhandledEvent(_) => "Sorry, I don't know how to handle that.".to_string(),
    };
    OutgoingMessage::text(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{default_checklists, default_templates};
    use clientassist_types::flow::DraftOrigin;
    use clientassist_types::llm::LlmError;

    fn token() -> CorrelationToken {
        crate::token::TokenCodec::new(b"k")
            .encode(&clientassist_types::flow::FlowContext::start(
                "C1".into(),
                "U1".into(),
            ))
            .unwrap()
    }

    fn button_ids(message: &OutgoingMessage) -> Vec<String> {
        message
            .buttons()
            .into_iter()
            .filter_map(|e| match e {
                Element::Button { action_id, .. } => Some(action_id.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_menu_buttons_carry_token() {
        let token = token();
        let menu = menu(&token);
        assert_eq!(button_ids(&menu), vec!["generate_message", "review_qa"]);
        for b in menu.buttons() {
            if let Element::Button { value, .. } = b {
                assert_eq!(value.as_deref(), Some(token.as_str()));
            }
        }
    }

    #[test]
    fn test_content_form_for_each_option() {
        let templates = default_templates();
        let predefined = content_form(ContentOption::Predefined, &templates, &token());
        assert_eq!(predefined.callback_id, "generate_message");
        match &predefined.blocks[0] {
            Block::SelectInput {
                block_id, options, ..
            } => {
                assert_eq!(block_id, "template_select");
                assert_eq!(options.len(), templates.len());
                assert!(options.iter().any(|o| o.label == "project update"));
            }
            other => panic!("expected template select, got {other:?}"),
        }

        let custom = content_form(ContentOption::Custom, &templates, &token());
        assert!(matches!(
            &custom.blocks[0],
            Block::TextInput { block_id, .. } if block_id == "message_input"
        ));
    }

    #[test]
    fn test_draft_message_actions() {
        let draft = DraftMessage::new("Hello client", DraftOrigin::Custom);
        let with_actions = draft_message(&draft, Some(&token()), None);
        assert_eq!(
            button_ids(&with_actions),
            vec!["edit_message", "review_qa", "approve_message"]
        );

        let plain = draft_message(&draft, None, Some("too long for actions"));
        assert!(plain.buttons().is_empty());
        assert!(plain.text.contains("Hello client"));
    }

    #[test]
    fn test_generation_failure_keeps_text() {
        let err = GenerationError::ServiceFailure(LlmError::Overloaded("busy".to_string()));
        let notice = generation_failure(&err, "We shipped v2 today.", Some(&token()));
        assert_eq!(button_ids(&notice), vec!["edit_message"]);
        assert!(notice.blocks.iter().any(
            |b| matches!(b, Block::Section { text } if text.contains("We shipped v2 today."))
        ));
    }

    #[test]
    fn test_checklist_form_field_ids() {
        let checklist = default_checklists().get("technical_qa").unwrap();
        let view = checklist_form(&checklist, Some("draft"), &token());
        assert_eq!(view.callback_id, "submit_qa");
        assert_eq!(view.blocks.len(), 6);
        match &view.blocks[1] {
            Block::Checkboxes {
                block_id,
                action_id,
                label,
                ..
            } => {
                assert_eq!(block_id, "checklist_item_0");
                assert_eq!(action_id, "checkbox_0");
                assert!(label.starts_with("1. "));
            }
            other => panic!("expected checkboxes, got {other:?}"),
        }
    }

    #[test]
    fn test_tally_report_text() {
        let tally = ChecklistTally {
            completed: 3,
            total: 5,
        };
        let report = tally_report(&tally, None);
        assert_eq!(report.text, "QA Checklist completed: 3/5 items checked.");
        assert!(report.blocks.is_empty());

        let with_actions = tally_report(&tally, Some(&token()));
        assert_eq!(button_ids(&with_actions), vec!["edit_message", "approve_message"]);
    }

    #[test]
    fn test_direct_fallback_keeps_blocks() {
        let draft = DraftMessage::new("Hi", DraftOrigin::Custom);
        let original = draft_message(&draft, Some(&token()), None);
        let wrapped = direct_fallback(original.clone());
        assert_eq!(wrapped.blocks.len(), original.blocks.len() + 1);
        assert_eq!(wrapped.buttons().len(), 3);
        assert!(wrapped.text.starts_with("There was an error posting"));

        let plain = direct_fallback(OutgoingMessage::text("hello"));
        assert!(plain.blocks.is_empty());
    }

    #[test]
    fn test_rejection_text() {
        let expired = rejection(
            &WorkflowError::ContextUnavailable(
                clientassist_types::error::ContextUnavailable::new("token malformed"),
            ),
            "/client-assistant",
        );
        assert!(expired.text.contains("/client-assistant"));

        let limit = rejection(
            &WorkflowError::Usage(UsageError::RevisionLimit { limit: 10 }),
            "/client-assistant",
        );
        assert!(limit.text.contains("10 times"));
    }
}
