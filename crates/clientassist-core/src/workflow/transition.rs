//! The planner: inbound event -> transition.
//!
//! Planning runs before the platform ack, so it is synchronous and does no
//! IO. It decodes the correlation token, validates form input and checks the
//! move is legal for the token's stage. Everything slow happens later in the
//! engine.

use std::collections::BTreeMap;
use std::sync::Arc;

use clientassist_types::catalog::{ChecklistDefinition, ChecklistTally};
use clientassist_types::config::WorkflowConfig;
use clientassist_types::error::{UsageError, WorkflowError};
use clientassist_types::event::{
    ActionEvent, ActionView, CommandEvent, InboundEvent, TriggerRef, ViewRef,
    ViewSubmissionEvent,
};
use clientassist_types::flow::{
    ContentOption, DraftMessage, FlowContext, FlowStage, GenerationMode, Resolution, UserId,
};

use crate::catalog::Catalogs;
use crate::checklist::{item_block_id, selections_from_form, tally};
use crate::resolver::{ContentChoice, resolve};
use crate::token::TokenCodec;

use super::ids::{action, callback, field};
use super::stage::{FlowStageExt, advance};
use super::views::usage_text;

/// One planned step, ready for the engine.
///
/// Every variant names the acting user so the engine can always report back.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Post the start menu.
    ShowMenu { user: UserId, context: FlowContext },
    /// Open the content options modal.
    OpenOptions {
        user: UserId,
        trigger: TriggerRef,
        context: FlowContext,
    },
    /// Swap the options modal for the form of the chosen option.
    ShowContentForm {
        user: UserId,
        view_ref: ViewRef,
        option: ContentOption,
        context: FlowContext,
    },
    /// Run a generate or revise pass and deliver the result.
    ///
    /// `context` is `None` when the token did not decode; the result then
    /// goes to the user directly.
    Generate {
        user: UserId,
        base: DraftMessage,
        mode: GenerationMode,
        context: Option<FlowContext>,
    },
    /// Open the edit modal on the current draft.
    OpenEditor {
        user: UserId,
        trigger: TriggerRef,
        context: FlowContext,
    },
    /// Open the checklist picker.
    OpenChecklistPicker {
        user: UserId,
        trigger: TriggerRef,
        context: FlowContext,
    },
    /// Swap the picker for the checklist form.
    ShowChecklistForm {
        user: UserId,
        view_ref: ViewRef,
        checklist: ChecklistDefinition,
        context: FlowContext,
    },
    /// Report a checklist tally.
    ReportTally {
        user: UserId,
        tally: ChecklistTally,
        context: FlowContext,
    },
    /// Post the draft to the origin channel.
    Publish { user: UserId, context: FlowContext },
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Transition::ShowMenu { .. } => "show_menu",
            Transition::OpenOptions { .. } => "open_options",
            Transition::ShowContentForm { .. } => "show_content_form",
            Transition::Generate { .. } => "generate",
            Transition::OpenEditor { .. } => "open_editor",
            Transition::OpenChecklistPicker { .. } => "open_checklist_picker",
            Transition::ShowChecklistForm { .. } => "show_checklist_form",
            Transition::ReportTally { .. } => "report_tally",
            Transition::Publish { .. } => "publish",
        }
    }

    pub fn user(&self) -> &UserId {
        match self {
            Transition::ShowMenu { user, .. }
            | Transition::OpenOptions { user, .. }
            | Transition::ShowContentForm { user, .. }
            | Transition::Generate { user, .. }
            | Transition::OpenEditor { user, .. }
            | Transition::OpenChecklistPicker { user, .. }
            | Transition::ShowChecklistForm { user, .. }
            | Transition::ReportTally { user, .. }
            | Transition::Publish { user, .. } => user,
        }
    }
}

/// Routes inbound events to transitions.
#[derive(Debug, Clone)]
pub struct Planner {
    codec: Arc<TokenCodec>,
    catalogs: Arc<Catalogs>,
    settings: WorkflowConfig,
}

impl Planner {
    pub fn new(codec: Arc<TokenCodec>, catalogs: Arc<Catalogs>, settings: WorkflowConfig) -> Self {
        Self {
            codec,
            catalogs,
            settings,
        }
    }

    pub fn command(&self) -> &str {
        &self.settings.command
    }

    /// Decide what an inbound event does.
    pub fn plan(&self, event: &InboundEvent) -> Result<Transition, WorkflowError> {
        match event {
            InboundEvent::Command(command) => self.plan_command(command),
            InboundEvent::Action(action) => self.plan_action(action),
            InboundEvent::ViewSubmission(submission) => self.plan_submission(submission),
        }
    }

    fn plan_command(&self, command: &CommandEvent) -> Result<Transition, WorkflowError> {
        if command.name != self.settings.command {
            return Err(WorkflowError::UnhandledEvent(command.name.clone()));
        }
        let context = FlowContext::start(command.channel.clone(), command.user.clone());
        let context = advance(&context, FlowStage::OptionSelection)?;
        Ok(Transition::ShowMenu {
            user: command.user.clone(),
            context,
        })
    }

    fn plan_action(&self, event: &ActionEvent) -> Result<Transition, WorkflowError> {
        let user = event.user.clone();
        let trigger = event.trigger_ref.clone();

        match event.action_id.as_str() {
            action::GENERATE_MESSAGE => {
                let context = self.decode_value(event)?;
                require(&context, FlowStage::ContentAcquisition)?;
                Ok(Transition::OpenOptions {
                    user,
                    trigger,
                    context,
                })
            }
            action::MESSAGE_OPTION_SELECTED => {
                let view = modal_of(event)?;
                let context = self.codec.decode(&view.private_metadata)?;
                let option: ContentOption = selected_value(event)?.parse()?;
                let context =
                    advance(&context, FlowStage::ContentAcquisition)?.with_option(option);
                Ok(Transition::ShowContentForm {
                    user,
                    view_ref: view.view_ref.clone(),
                    option,
                    context,
                })
            }
            action::EDIT_MESSAGE => {
                let context = self.decode_value(event)?;
                if context.current_draft().is_none() {
                    return Err(illegal(&context, FlowStage::Revising));
                }
                self.check_revision_budget(&context)?;
                let context = advance(&context, FlowStage::Revising)?;
                Ok(Transition::OpenEditor {
                    user,
                    trigger,
                    context,
                })
            }
            action::REVIEW_QA => {
                let context = self.decode_value(event)?;
                let context = advance(&context, FlowStage::QaReview)?;
                Ok(Transition::OpenChecklistPicker {
                    user,
                    trigger,
                    context,
                })
            }
            action::CHECKLIST_SELECTED => {
                let view = modal_of(event)?;
                let context = self.codec.decode(&view.private_metadata)?;
                let name = selected_value(event)?;
                let checklist = self
                    .catalogs
                    .checklists
                    .get(name)
                    .ok_or_else(|| UsageError::UnknownChecklist(name.to_string()))?;
                let context = advance(&context, FlowStage::QaReview)?.with_checklist(name);
                Ok(Transition::ShowChecklistForm {
                    user,
                    view_ref: view.view_ref.clone(),
                    checklist,
                    context,
                })
            }
            action::APPROVE_MESSAGE => {
                let context = self.decode_value(event)?;
                let published = FlowStage::Resolved(Resolution::Published);
                if context.current_draft().is_none() {
                    return Err(illegal(&context, published));
                }
                let context = advance(&context, published)?;
                Ok(Transition::Publish { user, context })
            }
            other => Err(WorkflowError::UnhandledEvent(other.to_string())),
        }
    }

    fn plan_submission(&self, event: &ViewSubmissionEvent) -> Result<Transition, WorkflowError> {
        let user = event.user.clone();

        match event.callback_id.as_str() {
            callback::GENERATE_MESSAGE => {
                let context = self.decode_lenient(&event.private_metadata);
                if let Some(ctx) = &context {
                    require(ctx, FlowStage::Generated)?;
                }
                let option = context.as_ref().and_then(FlowContext::option);
                let (choice, mode) = content_choice(event, option)?;
                let base = resolve(&self.catalogs.templates, &choice)?;
                Ok(Transition::Generate {
                    user,
                    base,
                    mode,
                    context,
                })
            }
            callback::EDIT_MESSAGE_SUBMIT => {
                let context = match self.decode_lenient(&event.private_metadata) {
                    Some(ctx) => {
                        require(&ctx, FlowStage::Generated)?;
                        self.check_revision_budget(&ctx)?;
                        Some(ctx.with_revision())
                    }
                    None => None,
                };
                let text = event
                    .values
                    .text(field::MESSAGE_BLOCK, field::MESSAGE_ACTION)
                    .unwrap_or_default();
                let base = resolve(
                    &self.catalogs.templates,
                    &ContentChoice::Revision(text.to_string()),
                )?;
                Ok(Transition::Generate {
                    user,
                    base,
                    mode: GenerationMode::Revise,
                    context,
                })
            }
            callback::SUBMIT_QA => {
                let context = self.codec.decode(&event.private_metadata)?;
                let name = context.checklist().ok_or_else(|| {
                    UsageError::MalformedSubmission("no checklist was selected".to_string())
                })?;
                let checklist = self
                    .catalogs
                    .checklists
                    .get(name)
                    .ok_or_else(|| UsageError::UnknownChecklist(name.to_string()))?;
                let tally = tally(&checklist, &selections_from_form(&event.values));
                Ok(Transition::ReportTally {
                    user,
                    tally,
                    context,
                })
            }
            other => Err(WorkflowError::UnhandledEvent(other.to_string())),
        }
    }

    fn decode_value(&self, event: &ActionEvent) -> Result<FlowContext, WorkflowError> {
        Ok(self.codec.decode(event.value.as_deref().unwrap_or_default())?)
    }

    /// Decode a token where the flow can still go on without it.
    fn decode_lenient(&self, token: &str) -> Option<FlowContext> {
        match self.codec.decode(token) {
            Ok(context) => Some(context),
            Err(e) => {
                tracing::warn!(reason = %e.reason, "flow context unavailable, delivering directly");
                None
            }
        }
    }

    fn check_revision_budget(&self, context: &FlowContext) -> Result<(), UsageError> {
        if context.revisions() >= self.settings.max_revisions {
            return Err(UsageError::RevisionLimit {
                limit: self.settings.max_revisions,
            });
        }
        Ok(())
    }
}

/// Field errors for a rejected form submission, keyed by block id.
///
/// Returned in the ack so the modal stays open with the message next to the
/// offending field. `None` when the error is not something the user can fix
/// in the form; it is then reported as a message instead.
pub fn field_errors(
    submission: &ViewSubmissionEvent,
    error: &WorkflowError,
) -> Option<BTreeMap<String, String>> {
    let WorkflowError::Usage(usage) = error else {
        return None;
    };

    let values = &submission.values;
    let block = match submission.callback_id.as_str() {
        callback::GENERATE_MESSAGE if values.has_block(field::TEMPLATE_BLOCK) => {
            field::TEMPLATE_BLOCK.to_string()
        }
        callback::GENERATE_MESSAGE | callback::EDIT_MESSAGE_SUBMIT
            if values.has_block(field::MESSAGE_BLOCK) =>
        {
            field::MESSAGE_BLOCK.to_string()
        }
        callback::SUBMIT_QA if values.has_block(&item_block_id(0)) => item_block_id(0),
        _ => return None,
    };

    Some(BTreeMap::from([(block, usage_text(usage))]))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn illegal(context: &FlowContext, to: FlowStage) -> WorkflowError {
    UsageError::IllegalTransition {
        from: context.stage(),
        to,
    }
    .into()
}

/// Check a move is legal without making it.
fn require(context: &FlowContext, next: FlowStage) -> Result<(), UsageError> {
    if context.stage().can_advance_to(next) {
        Ok(())
    } else {
        Err(UsageError::IllegalTransition {
            from: context.stage(),
            to: next,
        })
    }
}

fn modal_of(event: &ActionEvent) -> Result<&ActionView, UsageError> {
    event.view.as_ref().ok_or_else(|| {
        UsageError::MalformedSubmission(format!("'{}' used outside a modal", event.action_id))
    })
}

fn selected_value(event: &ActionEvent) -> Result<&str, UsageError> {
    event
        .value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| UsageError::MalformedSubmission("nothing was selected".to_string()))
}

/// Work out what the generate form asked for.
///
/// The form's own blocks decide between template and text. The option in the
/// token only separates custom text from a revision, and defaults to custom
/// when the token is gone.
fn content_choice(
    event: &ViewSubmissionEvent,
    option: Option<ContentOption>,
) -> Result<(ContentChoice, GenerationMode), UsageError> {
    let values = &event.values;

    if values.has_block(field::TEMPLATE_BLOCK) {
        let name = values
            .selected(field::TEMPLATE_BLOCK, field::TEMPLATE_ACTION)
            .ok_or_else(|| UsageError::MalformedSubmission("no template selected".to_string()))?;
        return Ok((
            ContentChoice::Predefined(name.to_string()),
            GenerationMode::Generate,
        ));
    }

    if values.has_block(field::MESSAGE_BLOCK) {
        let text = values
            .text(field::MESSAGE_BLOCK, field::MESSAGE_ACTION)
            .unwrap_or_default()
            .to_string();
        return Ok(match option {
            Some(ContentOption::Revise) => (ContentChoice::Revision(text), GenerationMode::Revise),
            _ => (ContentChoice::Custom(text), GenerationMode::Generate),
        });
    }

    Err(UsageError::MalformedSubmission(
        "the form has no message field".to_string(),
    ))
}
