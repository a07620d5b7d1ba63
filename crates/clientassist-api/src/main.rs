//! ClientAssist entry point.
//!
//! Binary name: `clientassist`
//!
//! Parses CLI arguments, loads configuration, then either lists catalogs,
//! checks configuration, or serves the Slack endpoints.

mod cli;
mod http;
mod state;

use std::path::PathBuf;

use clap::Parser;

use clientassist_core::catalog::Catalogs;
use clientassist_infra::config::{Credentials, default_config_path, load_config, resolve_data_dir};
use clientassist_observe::tracing_setup::{
    LogFormat, TracingOptions, init_tracing, shutdown_tracing,
};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config_path: PathBuf = cli
        .config
        .clone()
        .unwrap_or_else(|| default_config_path(&resolve_data_dir()));
    let config = load_config(&config_path).await;

    let result = match cli.command {
        Commands::Templates => cli::catalog::list_templates(&Catalogs::from_config(&config), cli.json),
        Commands::Checklists => {
            cli::catalog::list_checklists(&Catalogs::from_config(&config), cli.json)
        }
        Commands::CheckConfig => cli::config::check_config(&config_path, &config, cli.json),
        Commands::Serve { host, port, .. } => {
            let credentials = Credentials::from_env()?;
            let state = AppState::init(&config, credentials)?;

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(%addr, config = %config_path.display(), "listening");
            if !cli.quiet && !cli.json {
                println!(
                    "  {} ClientAssist listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("server stopped");
            Ok(())
        }
    };

    shutdown_tracing();
    result
}

/// Install the global subscriber for the parsed CLI flags.
fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let enable_otel = matches!(cli.command, Commands::Serve { otel: true, .. });
    init_tracing(&TracingOptions {
        default_filter: cli::default_filter(cli.verbose, cli.quiet).to_string(),
        format: if cli.json { LogFormat::Json } else { LogFormat::Pretty },
        enable_otel,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
