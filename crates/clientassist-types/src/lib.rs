//! Shared domain types for ClientAssist.
//!
//! This crate contains the data shapes used across the workspace: the flow
//! context threaded between chat events, drafts, catalogs, inbound events,
//! abstract views and messages, LLM request/response types, configuration,
//! and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, thiserror.

pub mod catalog;
pub mod config;
pub mod error;
pub mod event;
pub mod flow;
pub mod llm;
pub mod view;
