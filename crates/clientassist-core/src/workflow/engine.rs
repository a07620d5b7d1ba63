//! The engine: executes planned transitions after the ack.
//!
//! Every slow step (generation, posts, modal calls) happens here. `execute`
//! never fails: whatever goes wrong is logged and, where possible, reported
//! to the acting user. Delivery to the origin channel falls back to a direct
//! message when the channel is unknown or the post fails.

use std::sync::Arc;

use clientassist_types::error::{GenerationError, PublishError, TokenError, WorkflowError};
use clientassist_types::event::{InboundEvent, TriggerRef, ViewRef};
use clientassist_types::flow::{
    ChannelId, DraftMessage, FlowContext, FlowStage, GenerationMode, Resolution, UserId,
};
use clientassist_types::view::{OutgoingMessage, View};

use crate::catalog::Catalogs;
use crate::generation::GenerationAdapter;
use crate::platform::ChatPlatform;
use crate::token::{CorrelationToken, TokenCodec};

use super::transition::Transition;
use super::views;

const NO_CONTEXT_NOTE: &str =
    "I couldn't tell which conversation this was for, so I've sent it to you directly.";

/// Executes transitions against a chat platform.
///
/// Generic over `P: ChatPlatform`; the binary uses the Slack client and tests
/// use a recording mock.
pub struct WorkflowEngine<P: ChatPlatform> {
    platform: Arc<P>,
    generator: Arc<GenerationAdapter>,
    codec: Arc<TokenCodec>,
    catalogs: Arc<Catalogs>,
    command: String,
}

impl<P: ChatPlatform> WorkflowEngine<P> {
    pub fn new(
        platform: Arc<P>,
        generator: Arc<GenerationAdapter>,
        codec: Arc<TokenCodec>,
        catalogs: Arc<Catalogs>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            generator,
            codec,
            catalogs,
            command: command.into(),
        }
    }

    /// Run one transition to completion.
    pub async fn execute(&self, transition: Transition) {
        tracing::debug!(
            transition = transition.name(),
            user = %transition.user(),
            "executing transition"
        );

        match transition {
            Transition::ShowMenu { user, context } => {
                let Some(token) = self.encode_or_report(&user, &context).await else {
                    return;
                };
                self.deliver(&user, Some(&context), views::menu(&token))
                    .await;
            }
            Transition::OpenOptions {
                user,
                trigger,
                context,
            } => {
                let Some(token) = self.encode_or_report(&user, &context).await else {
                    return;
                };
                self.open(&user, &trigger, views::options_modal(&token))
                    .await;
            }
            Transition::ShowContentForm {
                user,
                view_ref,
                option,
                context,
            } => {
                let Some(token) = self.encode_or_report(&user, &context).await else {
                    return;
                };
                let view = views::content_form(option, &self.catalogs.templates, &token);
                self.update(&user, &view_ref, view).await;
            }
            Transition::Generate {
                user,
                base,
                mode,
                context,
            } => self.generate(&user, base, mode, context).await,
            Transition::OpenEditor {
                user,
                trigger,
                context,
            } => {
                let Some(token) = self.encode_or_report(&user, &context).await else {
                    return;
                };
                let draft = context.current_draft().unwrap_or_default();
                self.open(&user, &trigger, views::edit_modal(draft, &token))
                    .await;
            }
            Transition::OpenChecklistPicker {
                user,
                trigger,
                context,
            } => {
                let Some(token) = self.encode_or_report(&user, &context).await else {
                    return;
                };
                let view = views::checklist_picker(&self.catalogs.checklists, &token);
                self.open(&user, &trigger, view).await;
            }
            Transition::ShowChecklistForm {
                user,
                view_ref,
                checklist,
                context,
            } => {
                let Some(token) = self.encode_or_report(&user, &context).await else {
                    return;
                };
                let view = views::checklist_form(&checklist, context.current_draft(), &token);
                self.update(&user, &view_ref, view).await;
            }
            Transition::ReportTally {
                user,
                tally,
                context,
            } => {
                tracing::info!(
                    flow_id = %context.flow_id(),
                    checklist = context.checklist().unwrap_or_default(),
                    completed = tally.completed,
                    total = tally.total,
                    "checklist reviewed"
                );

                if context.current_draft().is_some() {
                    let token = self.codec.encode(&context).ok();
                    let report = views::tally_report(&tally, token.as_ref());
                    self.deliver(&user, Some(&context), report).await;
                } else {
                    let context = context.at_stage(FlowStage::Resolved(Resolution::Discarded));
                    self.deliver(&user, Some(&context), views::tally_report(&tally, None))
                        .await;
                }
            }
            Transition::Publish { user, context } => self.publish(&user, &context).await,
        }
    }

    /// Tell the acting user why the planner turned their request down.
    pub async fn reject(&self, event: &InboundEvent, error: &WorkflowError) {
        if let WorkflowError::UnhandledEvent(key) = error {
            tracing::debug!(route = %key, "ignoring unhandled event");
            return;
        }

        let user = event.user();
        tracing::info!(route = event.route_key(), user = %user, error = %error, "request rejected");

        let channel = match event {
            InboundEvent::Command(command) => Some(&command.channel),
            InboundEvent::Action(action) => action.channel.as_ref(),
            InboundEvent::ViewSubmission(_) => None,
        };
        let notice = views::rejection(error, &self.command);

        if let Some(channel) = channel {
            match self.platform.post_ephemeral(channel, user, &notice).await {
                Ok(()) => return,
                Err(e) => tracing::warn!(channel = %channel, error = %e, "ephemeral notice failed"),
            }
        }
        self.direct(user, &notice).await;
    }

    // -----------------------------------------------------------------------
    // Steps
    // -----------------------------------------------------------------------

    async fn generate(
        &self,
        user: &UserId,
        base: DraftMessage,
        mode: GenerationMode,
        context: Option<FlowContext>,
    ) {
        match self.generator.transform(base.text(), mode).await {
            Ok(draft) => {
                let Some(context) = context else {
                    let message = views::draft_message(&draft, None, Some(NO_CONTEXT_NOTE));
                    self.direct(user, &message).await;
                    return;
                };

                let context = context.at_stage(FlowStage::Generated).with_draft(&draft);
                tracing::info!(
                    flow_id = %context.flow_id(),
                    channel = %context.origin_channel(),
                    mode = %mode,
                    revisions = context.revisions(),
                    "draft ready"
                );

                let message = match self.codec.encode(&context) {
                    Ok(token) => views::draft_message(&draft, Some(&token), None),
                    Err(e) => {
                        tracing::warn!(flow_id = %context.flow_id(), error = %e, "draft delivered without actions");
                        views::draft_message(&draft, None, Some(&too_large_note(&e)))
                    }
                };
                self.deliver(user, Some(&context), message).await;
            }
            Err(e) => {
                let context = context.map(|c| c.with_draft(&base));
                let token = context.as_ref().and_then(|c| self.codec.encode(c).ok());
                let notice = views::generation_failure(&e, base.text(), token.as_ref());
                if let GenerationError::ServiceFailure(cause) = &e {
                    tracing::warn!(user = %user, error = %cause, "generation failed");
                }
                self.deliver(user, context.as_ref(), notice).await;
            }
        }
    }

    async fn publish(&self, user: &UserId, context: &FlowContext) {
        let channel = context.origin_channel();
        let draft = context.current_draft().unwrap_or_default();

        match self
            .platform
            .post_message(channel, &OutgoingMessage::text(draft))
            .await
        {
            Ok(()) => {
                tracing::info!(flow_id = %context.flow_id(), channel = %channel, user = %user, "message published");
                self.deliver(user, Some(context), views::approved_confirmation())
                    .await;
            }
            Err(source) => {
                let error = PublishError {
                    channel: channel.clone(),
                    source,
                };
                tracing::warn!(flow_id = %context.flow_id(), error = %error, "publish failed");
                self.direct(user, &views::publish_failure(&error)).await;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Delivery
    // -----------------------------------------------------------------------

    /// Ephemeral to the origin channel, falling back to a direct message.
    async fn deliver(&self, user: &UserId, context: Option<&FlowContext>, message: OutgoingMessage) {
        if let Some(context) = context {
            let channel = context.origin_channel();
            match self.platform.post_ephemeral(channel, user, &message).await {
                Ok(()) => return,
                Err(e) => {
                    tracing::warn!(channel = %channel, user = %user, error = %e, "ephemeral post failed, sending directly");
                    self.direct(user, &views::direct_fallback(message)).await;
                    return;
                }
            }
        }
        self.direct(user, &message).await;
    }

    async fn direct(&self, user: &UserId, message: &OutgoingMessage) {
        let channel: ChannelId = user.as_direct_channel();
        if let Err(e) = self.platform.post_message(&channel, message).await {
            tracing::error!(user = %user, error = %e, "direct message failed, user not notified");
        }
    }

    async fn open(&self, user: &UserId, trigger: &TriggerRef, view: View) {
        if let Err(e) = self.platform.open_modal(trigger, &view).await {
            tracing::warn!(callback_id = %view.callback_id, error = %e, "could not open modal");
            self.direct(user, &views::modal_failure()).await;
        }
    }

    async fn update(&self, user: &UserId, view_ref: &ViewRef, view: View) {
        if let Err(e) = self.platform.update_modal(view_ref, &view).await {
            tracing::warn!(callback_id = %view.callback_id, error = %e, "could not update modal");
            self.direct(user, &views::modal_failure()).await;
        }
    }

    async fn encode_or_report(
        &self,
        user: &UserId,
        context: &FlowContext,
    ) -> Option<CorrelationToken> {
        match self.codec.encode(context) {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!(flow_id = %context.flow_id(), error = %e, "could not encode flow context");
                let notice = OutgoingMessage::text(format!(
                    "Sorry, I couldn't continue this request: {}. Run `{}` to start again.",
                    too_large_note(&e),
                    self.command
                ));
                self.direct(user, &notice).await;
                None
            }
        }
    }
}

fn too_large_note(error: &TokenError) -> String {
    match error {
        TokenError::TooLarge { .. } => {
            "this message is too long to attach Edit, Review and Approve buttons to".to_string()
        }
        TokenError::Serialization(_) => "the message actions could not be attached".to_string(),
    }
}
