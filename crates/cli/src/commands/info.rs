//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::{ChainBlueprint, ProviderConfig};

use super::load_blueprint;
use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<usize>,
    providers: Vec<ProviderInfo>,
}

#[derive(Serialize)]
struct ProviderInfo {
    position: usize,
    name: String,
    provider_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    radius_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fault: Option<String>,
    entry_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    entries: Vec<String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    let blueprint = load_blueprint(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

fn build_config_info(blueprint: &ChainBlueprint, args: &InfoArgs) -> ConfigInfo {
    let providers = blueprint
        .providers
        .iter()
        .enumerate()
        .map(|(i, p)| ProviderInfo {
            position: i + 1,
            name: p.name.clone(),
            provider_type: format!("{:?}", p.provider_type),
            request_limit: p.request_limit,
            radius_km: p.radius_km,
            path: p.path.as_ref().map(|path| path.display().to_string()),
            fault: p.fault.map(|f| format!("{:?}", f)),
            entry_count: p.entries.len(),
            entries: if args.entries {
                describe_entries(p)
            } else {
                Vec::new()
            },
        })
        .collect();

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        max_results: blueprint.chain.max_results,
        providers,
    }
}

fn describe_entries(provider: &ProviderConfig) -> Vec<String> {
    provider
        .entries
        .iter()
        .map(|entry| format!("{} → {}", entry.query, entry.address))
        .collect()
}

fn print_config_info(blueprint: &ChainBlueprint, args: &InfoArgs) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 Geochain Configuration                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("⚙️  Chain");
    println!("   ├─ Version: {:?}", blueprint.version);
    match blueprint.chain.max_results {
        Some(limit) => println!("   └─ Max results: {}", limit),
        None => println!("   └─ Max results: provider default"),
    }

    println!("\n🌍 Providers ({}, in dispatch order)", blueprint.providers.len());
    for (i, provider) in blueprint.providers.iter().enumerate() {
        let is_last = i == blueprint.providers.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        println!(
            "   {} {}. {} ({:?})",
            prefix,
            i + 1,
            provider.name,
            provider.provider_type
        );

        if let Some(limit) = provider.request_limit {
            println!("   {}  ├─ Request limit: {}", child_prefix, limit);
        }
        if let Some(radius) = provider.radius_km {
            println!("   {}  ├─ Radius: {} km", child_prefix, radius);
        }
        if let Some(ref path) = provider.path {
            println!("   {}  ├─ Path: {}", child_prefix, path.display());
        }
        if let Some(fault) = provider.fault {
            println!("   {}  ├─ Fault: {:?}", child_prefix, fault);
        }

        if args.entries && !provider.entries.is_empty() {
            println!("   {}  📌 Entries ({}):", child_prefix, provider.entries.len());
            let entries = describe_entries(provider);
            for (j, entry) in entries.iter().enumerate() {
                let entry_prefix = if j == entries.len() - 1 { "└─" } else { "├─" };
                println!("   {}     {} {}", child_prefix, entry_prefix, entry);
            }
        } else {
            println!("   {}  └─ {} entries", child_prefix, provider.entries.len());
        }
    }

    println!();
}
