//! Observability setup for ClientAssist.

pub mod tracing_setup;
