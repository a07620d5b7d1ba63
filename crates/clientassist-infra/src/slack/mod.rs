//! Slack adapter: Web API client, inbound payload parsing and Block Kit
//! rendering.

pub mod blocks;
pub mod client;
pub mod payload;

pub use client::SlackClient;
