//! HTTP layer: the Slack endpoints plus a health check.
//!
//! Every Slack request is acknowledged immediately; the workflow step it
//! triggers runs on a spawned task.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
