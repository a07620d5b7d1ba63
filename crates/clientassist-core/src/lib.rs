//! Workflow orchestration and port trait definitions for ClientAssist.
//!
//! This crate defines the "ports" (`LlmProvider`, `ChatPlatform`) that the
//! infrastructure layer implements, plus the pure workflow logic that drives
//! a flow from slash command to published message. It depends only on
//! `clientassist-types` -- never on `clientassist-infra` or any IO crate.

pub mod catalog;
pub mod checklist;
pub mod generation;
pub mod llm;
pub mod platform;
pub mod resolver;
pub mod token;
pub mod workflow;
