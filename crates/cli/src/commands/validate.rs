//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::{ChainBlueprint, ProviderType};
use dispatcher::CHAIN_NAME;

use super::load_blueprint;
use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    provider_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<usize>,
    static_entry_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    match load_blueprint(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            let static_entry_count: usize =
                blueprint.providers.iter().map(|p| p.entries.len()).sum();

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    provider_count: blueprint.providers.len(),
                    max_results: blueprint.chain.max_results,
                    static_entry_count,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &ChainBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.providers.is_empty() {
        warnings.push("No providers configured - every lookup will fail".to_string());
    }

    for provider in &blueprint.providers {
        if provider.name == CHAIN_NAME {
            warnings.push(format!(
                "Provider named '{}' is indistinguishable from the chain in last-success reports",
                CHAIN_NAME
            ));
        }
        match provider.provider_type {
            ProviderType::Static if provider.entries.is_empty() => {
                warnings.push(format!(
                    "Static provider '{}' has no entries and will never answer",
                    provider.name
                ));
            }
            ProviderType::Fault => {
                if let Some(fault) = provider.fault {
                    warnings.push(format!(
                        "Provider '{}' always fails with {:?}",
                        provider.name, fault
                    ));
                }
            }
            _ => {}
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Providers: {}", summary.provider_count);
            match summary.max_results {
                Some(limit) => println!("  Max results: {}", limit),
                None => println!("  Max results: provider default"),
            }
            println!("  Static entries: {}", summary.static_entry_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
