//! Infrastructure implementations for ClientAssist.
//!
//! Concrete adapters for the ports defined in `clientassist-core`: the Slack
//! Web API client (`ChatPlatform`), the OpenAI-compatible generation provider
//! (`LlmProvider`), Slack payload parsing and Block Kit rendering, plus
//! configuration and credential loading.

pub mod config;
pub mod llm;
pub mod slack;
