//! Workflow state machine.
//!
//! - `ids` -- stable action, callback and field ids
//! - `stage` -- legal stage transitions
//! - `views` -- messages and modals for each step
//! - `transition` -- the planner: inbound event -> transition (pure, pre-ack)
//! - `engine` -- executes transitions against a `ChatPlatform` (post-ack)

pub mod engine;
pub mod ids;
pub mod stage;
pub mod transition;
pub mod views;

pub use engine::WorkflowEngine;
pub use transition::{Planner, Transition, field_errors};
