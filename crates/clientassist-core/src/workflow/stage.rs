//! Legal stage transitions.
//!
//! `FlowStage` lives in `clientassist-types`; this module adds the transition
//! table as an extension trait since inherent impls on foreign types are not
//! allowed.

use clientassist_types::error::UsageError;
use clientassist_types::flow::{FlowContext, FlowStage, Resolution};

pub trait FlowStageExt {
    /// Whether a flow in this stage may move to `next`.
    fn can_advance_to(&self, next: FlowStage) -> bool;

    /// Whether the flow has ended.
    fn is_terminal(&self) -> bool;
}

impl FlowStageExt for FlowStage {
    fn can_advance_to(&self, next: FlowStage) -> bool {
        use FlowStage::*;

        match (*self, next) {
            (Resolved(_), _) => false,
            (Idle, OptionSelection) => true,
            (OptionSelection, ContentAcquisition | QaReview) => true,
            (ContentAcquisition, Generated) => true,
            // A failed generation still offers Edit on the base text.
            (ContentAcquisition, Revising) => true,
            (Generated, Revising | QaReview | Resolved(Resolution::Published)) => true,
            (Revising, Generated | Revising) => true,
            (QaReview, QaReview | Revising | Resolved(_)) => true,
            _ => false,
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, FlowStage::Resolved(_))
    }
}

/// Move `context` to `next`, or explain why it cannot go there.
pub fn advance(context: &FlowContext, next: FlowStage) -> Result<FlowContext, UsageError> {
    let from = context.stage();
    if !from.can_advance_to(next) {
        return Err(UsageError::IllegalTransition { from, to: next });
    }
    Ok(context.at_stage(next))
}
