//! ChatPlatform trait: the outbound capabilities the workflow needs.
//!
//! Uses native async fn in traits (RPITIT, Rust 2024 edition). The workflow
//! engine is generic over this trait; infra provides the Slack Web API
//! implementation.

use clientassist_types::error::PlatformError;
use clientassist_types::event::{TriggerRef, ViewRef};
use clientassist_types::flow::{ChannelId, UserId};
use clientassist_types::view::{OutgoingMessage, View};

pub trait ChatPlatform: Send + Sync {
    /// Open a modal in response to an interaction trigger.
    fn open_modal(
        &self,
        trigger: &TriggerRef,
        view: &View,
    ) -> impl Future<Output = Result<(), PlatformError>> + Send;

    /// Replace the contents of an already open modal.
    fn update_modal(
        &self,
        view_ref: &ViewRef,
        view: &View,
    ) -> impl Future<Output = Result<(), PlatformError>> + Send;

    /// Post a message visible to everyone in `channel`.
    fn post_message(
        &self,
        channel: &ChannelId,
        message: &OutgoingMessage,
    ) -> impl Future<Output = Result<(), PlatformError>> + Send;

    /// Post a message in `channel` that only `user` can see.
    fn post_ephemeral(
        &self,
        channel: &ChannelId,
        user: &UserId,
        message: &OutgoingMessage,
    ) -> impl Future<Output = Result<(), PlatformError>> + Send;
}
