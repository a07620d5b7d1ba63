//! Flow context and draft types.
//!
//! A flow is one traversal of the content workflow for a single user request.
//! Nothing about a flow is stored server-side: the [`FlowContext`] travels
//! between chat events inside a correlation token attached to buttons and
//! modal metadata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::UsageError;

/// A chat channel identifier (e.g., `C0123ABCD`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A chat user identifier (e.g., `U0123ABCD`).
///
/// A user id is also a valid destination for a direct message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl UserId {
    /// The direct-message channel for this user.
    pub fn as_direct_channel(&self) -> ChannelId {
        ChannelId(self.0.clone())
    }
}

/// How a flow ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// The draft was posted to the origin channel.
    Published,
    /// The user stopped interacting. Never recorded explicitly.
    Discarded,
}

/// The state a flow is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStage {
    Idle,
    OptionSelection,
    ContentAcquisition,
    Generated,
    Revising,
    QaReview,
    Resolved(Resolution),
}

impl fmt::Display for FlowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowStage::Idle => write!(f, "idle"),
            FlowStage::OptionSelection => write!(f, "option_selection"),
            FlowStage::ContentAcquisition => write!(f, "content_acquisition"),
            FlowStage::Generated => write!(f, "generated"),
            FlowStage::Revising => write!(f, "revising"),
            FlowStage::QaReview => write!(f, "qa_review"),
            FlowStage::Resolved(Resolution::Published) => write!(f, "resolved_published"),
            FlowStage::Resolved(Resolution::Discarded) => write!(f, "resolved_discarded"),
        }
    }
}

/// Context carried from one chat event to the next.
///
/// Fields are private so the origin channel cannot change once a flow has
/// started; every "mutation" returns a new context. Serialized field names
/// are short because the encoded token must fit in a button value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowContext {
    #[serde(rename = "f")]
    flow_id: Uuid,
    #[serde(rename = "c")]
    origin_channel: ChannelId,
    #[serde(rename = "u")]
    originating_user: UserId,
    #[serde(rename = "s")]
    stage: FlowStage,
    #[serde(rename = "d", default, skip_serializing_if = "Option::is_none")]
    current_draft: Option<String>,
    #[serde(rename = "r", default)]
    revisions: u32,
    #[serde(rename = "k", default, skip_serializing_if = "Option::is_none")]
    checklist: Option<String>,
    #[serde(rename = "o", default, skip_serializing_if = "Option::is_none")]
    option: Option<ContentOption>,
}

impl FlowContext {
    /// Start a new flow. The origin channel is fixed from here on.
    pub fn start(origin_channel: ChannelId, originating_user: UserId) -> Self {
        Self {
            flow_id: Uuid::now_v7(),
            origin_channel,
            originating_user,
            stage: FlowStage::Idle,
            current_draft: None,
            revisions: 0,
            checklist: None,
            option: None,
        }
    }

    pub fn flow_id(&self) -> Uuid {
        self.flow_id
    }

    pub fn origin_channel(&self) -> &ChannelId {
        &self.origin_channel
    }

    pub fn originating_user(&self) -> &UserId {
        &self.originating_user
    }

    pub fn stage(&self) -> FlowStage {
        self.stage
    }

    pub fn current_draft(&self) -> Option<&str> {
        self.current_draft.as_deref()
    }

    pub fn revisions(&self) -> u32 {
        self.revisions
    }

    pub fn checklist(&self) -> Option<&str> {
        self.checklist.as_deref()
    }

    /// Content option picked in the options modal, if any.
    pub fn option(&self) -> Option<ContentOption> {
        self.option
    }

    /// Same flow, new stage.
    pub fn at_stage(&self, stage: FlowStage) -> Self {
        Self {
            stage,
            ..self.clone()
        }
    }

    /// Same flow with `draft` replacing the current draft.
    pub fn with_draft(&self, draft: &DraftMessage) -> Self {
        Self {
            current_draft: Some(draft.text().to_string()),
            ..self.clone()
        }
    }

    /// Same flow with one more revise pass counted.
    pub fn with_revision(&self) -> Self {
        Self {
            revisions: self.revisions.saturating_add(1),
            ..self.clone()
        }
    }

    /// Same flow, reviewing the named checklist.
    pub fn with_checklist(&self, name: &str) -> Self {
        Self {
            checklist: Some(name.to_string()),
            ..self.clone()
        }
    }

    pub fn with_option(&self, option: ContentOption) -> Self {
        Self {
            option: Some(option),
            ..self.clone()
        }
    }
}

/// The three ways a user can supply content, as offered in the options menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentOption {
    Predefined,
    Custom,
    Revise,
}

impl ContentOption {
    pub const ALL: [ContentOption; 3] = [
        ContentOption::Predefined,
        ContentOption::Custom,
        ContentOption::Revise,
    ];

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            ContentOption::Predefined => "Predefined Templates",
            ContentOption::Custom => "Custom Message",
            ContentOption::Revise => "Revise Message",
        }
    }
}

impl fmt::Display for ContentOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentOption::Predefined => write!(f, "predefined"),
            ContentOption::Custom => write!(f, "custom"),
            ContentOption::Revise => write!(f, "revise"),
        }
    }
}

impl FromStr for ContentOption {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "predefined" => Ok(ContentOption::Predefined),
            "custom" => Ok(ContentOption::Custom),
            "revise" => Ok(ContentOption::Revise),
            other => Err(UsageError::UnknownOption(other.to_string())),
        }
    }
}

/// Which transformation the generation service is asked to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Generate,
    Revise,
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::Generate => write!(f, "generate"),
            GenerationMode::Revise => write!(f, "revise"),
        }
    }
}

/// Where a draft's text came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DraftOrigin {
    Template(String),
    Custom,
    Revision,
    Generated(GenerationMode),
}

/// Candidate message text at one point of a flow. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftMessage {
    text: String,
    origin: DraftOrigin,
}

impl DraftMessage {
    pub fn new(text: impl Into<String>, origin: DraftOrigin) -> Self {
        Self {
            text: text.into(),
            origin,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn origin(&self) -> &DraftOrigin {
        &self.origin
    }

    /// Character count, used for logging instead of the text itself.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
