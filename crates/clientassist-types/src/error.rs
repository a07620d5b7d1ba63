use thiserror::Error;

use crate::flow::{ChannelId, FlowStage};
use crate::llm::LlmError;

/// The user asked for something the workflow cannot do. Reported back to
/// the acting user; the flow does not advance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("unknown checklist '{0}'")]
    UnknownChecklist(String),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("the message text is empty")]
    EmptyDraft,

    #[error("malformed submission: {0}")]
    MalformedSubmission(String),

    #[error("cannot go from {from} to {to}")]
    IllegalTransition { from: FlowStage, to: FlowStage },

    #[error("revision limit of {limit} reached for this message")]
    RevisionLimit { limit: u32 },
}

/// The correlation token was missing, malformed or tampered with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("flow context unavailable: {reason}")]
pub struct ContextUnavailable {
    pub reason: String,
}

impl ContextUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A context could not be turned into a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token of {len} characters exceeds the {max} character limit")]
    TooLarge { len: usize, max: usize },

    #[error("token serialization error: {0}")]
    Serialization(String),
}

/// The generation service did not produce a draft.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("the generation service returned no text")]
    EmptyResponse,

    #[error("generation service failed: {0}")]
    ServiceFailure(#[from] LlmError),
}

/// A chat platform call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("{method} failed: {code}")]
    Api { method: String, code: String },

    #[error("invalid platform response: {0}")]
    InvalidResponse(String),
}

/// Posting to a channel failed. Only ever reported to the acting user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not post to {channel}: {source}")]
pub struct PublishError {
    pub channel: ChannelId,
    #[source]
    pub source: PlatformError,
}

/// Errors raised while routing an inbound event to a transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    ContextUnavailable(#[from] ContextUnavailable),

    #[error("no handler for '{0}'")]
    UnhandledEvent(String),
}

/// Startup configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing credential: set the {0} environment variable")]
    MissingCredential(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_error_display() {
        let err = UsageError::UnknownTemplate("weekly".to_string());
        assert_eq!(err.to_string(), "unknown template 'weekly'");

        let err = UsageError::IllegalTransition {
            from: FlowStage::Idle,
            to: FlowStage::Revising,
        };
        assert_eq!(err.to_string(), "cannot go from idle to revising");
    }

    #[test]
    fn test_generation_error_wraps_llm_error() {
        let err: GenerationError = LlmError::AuthenticationFailed.into();
        assert!(matches!(err, GenerationError::ServiceFailure(_)));
        assert!(err.to_string().contains("authentication failed"));
    }

    #[test]
    fn test_publish_error_display() {
        let err = PublishError {
            channel: ChannelId::from("C1"),
            source: PlatformError::Api {
                method: "chat.postMessage".to_string(),
                code: "not_in_channel".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "could not post to C1: chat.postMessage failed: not_in_channel"
        );
    }

    #[test]
    fn test_workflow_error_is_transparent() {
        let err: WorkflowError = UsageError::EmptyDraft.into();
        assert_eq!(err.to_string(), "the message text is empty");
    }
}
