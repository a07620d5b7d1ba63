//! CLI command definitions for the `clientassist` binary.

pub mod catalog;
pub mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Slack assistant that drafts, refines and reviews client messages.
#[derive(Parser)]
#[command(name = "clientassist", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config.toml (default: ~/.clientassist/config.toml).
    #[arg(long, global = true, env = "CLIENT_ASSIST_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Slack HTTP endpoint.
    Serve {
        /// Interface to bind (overrides [server].host).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides [server].port).
        #[arg(long, short)]
        port: Option<u16>,

        /// Export trace spans to stdout via OpenTelemetry.
        #[arg(long)]
        otel: bool,
    },

    /// List the message templates.
    Templates,

    /// List the QA checklists.
    Checklists,

    /// Validate configuration and credentials without starting the server.
    #[command(name = "check-config")]
    CheckConfig,
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_filter(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "info",
        1 => "info,clientassist=debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["clientassist", "serve", "--port", "8080", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Serve { host, port, otel } => {
                assert!(host.is_none());
                assert_eq!(port, Some(8080));
                assert!(!otel);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["clientassist", "templates", "--json", "--config", "/tmp/c.toml"])
                .unwrap();
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(cli.command, Commands::Templates));
    }

    #[test]
    fn test_check_config_name() {
        let cli = Cli::try_parse_from(["clientassist", "check-config"]).unwrap();
        assert!(matches!(cli.command, Commands::CheckConfig));
    }

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(0, true), "error");
        assert_eq!(default_filter(0, false), "info");
        assert_eq!(default_filter(1, false), "info,clientassist=debug");
        assert_eq!(default_filter(3, false), "trace");
    }
}
