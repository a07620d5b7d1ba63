//! `check-config`: show the effective configuration and which credentials
//! are present, without starting the server.

use std::path::Path;

use anyhow::{Result, bail};
use console::style;

use clientassist_core::catalog::Catalogs;
use clientassist_infra::config::{CREDENTIAL_VARS, mask_secret};
use clientassist_types::config::AppConfig;

#[derive(Debug, PartialEq)]
struct CredentialStatus {
    name: &'static str,
    required: bool,
    /// Masked value when set.
    masked: Option<String>,
}

fn credential_report(lookup: impl Fn(&str) -> Option<String>) -> Vec<CredentialStatus> {
    CREDENTIAL_VARS
        .iter()
        .map(|&(name, required)| CredentialStatus {
            name,
            required,
            masked: lookup(name)
                .filter(|v| !v.trim().is_empty())
                .map(|v| mask_secret(&v)),
        })
        .collect()
}

fn missing_required(report: &[CredentialStatus]) -> Vec<&'static str> {
    report
        .iter()
        .filter(|c| c.required && c.masked.is_none())
        .map(|c| c.name)
        .collect()
}

pub fn check_config(config_path: &Path, config: &AppConfig, json: bool) -> Result<()> {
    let report = credential_report(|name| std::env::var(name).ok());
    let catalogs = Catalogs::from_config(config);
    let file_exists = config_path.exists();

    if json {
        let credentials: Vec<_> = report
            .iter()
            .map(|c| {
                serde_json::json!({
                    "name": c.name,
                    "required": c.required,
                    "set": c.masked.is_some(),
                    "masked": c.masked,
                })
            })
            .collect();
        let out = serde_json::json!({
            "config_path": config_path.display().to_string(),
            "config_file_exists": file_exists,
            "server": format!("{}:{}", config.server.host, config.server.port),
            "command": config.workflow.command,
            "model": config.generation.model,
            "base_url": config.generation.base_url,
            "max_revisions": config.workflow.max_revisions,
            "templates": catalogs.templates.len(),
            "checklists": catalogs.checklists.len(),
            "credentials": credentials,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let file_note = if file_exists {
            style("found").green()
        } else {
            style("not found, using defaults").yellow()
        };
        println!();
        println!("  Config   {} ({file_note})", style(config_path.display()).cyan());
        println!(
            "  Server   {}:{}",
            config.server.host, config.server.port
        );
        println!("  Command  {}", config.workflow.command);
        println!(
            "  Model    {} (max {} tokens)",
            config.generation.model, config.generation.max_tokens
        );
        println!("  Revisions per flow  {}", config.workflow.max_revisions);
        println!(
            "  Catalogs {} templates, {} checklists",
            catalogs.templates.len(),
            catalogs.checklists.len()
        );
        println!();
        for c in &report {
            match &c.masked {
                Some(masked) => println!("  {} {} {masked}", style("✓").green(), c.name),
                None if c.required => println!("  {} {} missing", style("✗").red(), c.name),
                None => println!("  {} {} not set (optional)", style("-").dim(), c.name),
            }
        }
        println!();
    }

    let missing = missing_required(&report);
    if !missing.is_empty() {
        bail!("missing required credentials: {}", missing.join(", "));
    }
    Ok(())
}
