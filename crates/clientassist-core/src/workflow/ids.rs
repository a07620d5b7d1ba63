//! Stable identifiers shared with the chat platform.
//!
//! Buttons, selects and modals are routed back to us by these ids, so they
//! must never change once a message carrying them has been sent.

/// Block action ids.
pub mod action {
    pub const GENERATE_MESSAGE: &str = "generate_message";
    pub const MESSAGE_OPTION_SELECTED: &str = "message_option_selected";
    pub const EDIT_MESSAGE: &str = "edit_message";
    pub const REVIEW_QA: &str = "review_qa";
    pub const CHECKLIST_SELECTED: &str = "checklist_selected";
    pub const APPROVE_MESSAGE: &str = "approve_message";
}

/// Modal callback ids.
pub mod callback {
    pub const MESSAGE_OPTIONS: &str = "message_options";
    pub const GENERATE_MESSAGE: &str = "generate_message";
    pub const EDIT_MESSAGE_SUBMIT: &str = "edit_message_submit";
    pub const QA_CHECKLIST: &str = "qa_checklist";
    pub const SUBMIT_QA: &str = "submit_qa";
}

/// Form field ids: (block id, element action id).
pub mod field {
    pub const TEMPLATE_BLOCK: &str = "template_select";
    pub const TEMPLATE_ACTION: &str = "template_selected";
    pub const MESSAGE_BLOCK: &str = "message_input";
    pub const MESSAGE_ACTION: &str = "message_text";
}
