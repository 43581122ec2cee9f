//! `geocode` and `reverse` command implementations.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use contracts::{Address, ContractError, Coordinates, LookupResult};
use dispatcher::{Chain, Geocoder};

use super::build_chain;
use crate::cli::{GeocodeArgs, ReverseArgs};
use crate::error::CliError;

/// Lookup result for JSON output
#[derive(Serialize)]
struct LookupReport<'a> {
    query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<String>,
    results: &'a [Address],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    provider_errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    providers_over_quota: Vec<String>,
}

/// Execute the `geocode` command
pub async fn run_geocode(args: &GeocodeArgs) -> Result<()> {
    info!(address = %args.address, config = %args.config.display(), "Geocoding");

    let chain = build_chain(&args.config, args.limit).await?;
    let result = chain.geocode(&args.address).await;

    report(&chain, args.address.clone(), result, args.json)
}

/// Execute the `reverse` command
pub async fn run_reverse(args: &ReverseArgs) -> Result<()> {
    let coordinates = Coordinates::try_new(args.latitude, args.longitude)
        .map_err(|e| CliError::invalid_input(e.to_string()))?;
    info!(%coordinates, config = %args.config.display(), "Reverse geocoding");

    let chain = build_chain(&args.config, args.limit).await?;
    let result = chain.reverse(coordinates).await;

    report(&chain, coordinates.to_string(), result, args.json)
}

fn report(chain: &Chain, query: String, result: LookupResult, json: bool) -> Result<()> {
    let (addresses, error) = match result {
        Ok(addresses) => (addresses, None),
        Err(e) => (Vec::new(), Some(e)),
    };

    let report = LookupReport {
        query,
        provider: error
            .is_none()
            .then(|| chain.last_successful_provider()),
        results: &addresses,
        error: error.as_ref().map(ToString::to_string),
        provider_errors: error
            .as_ref()
            .map(|e| e.chained_errors().iter().map(ToString::to_string).collect())
            .unwrap_or_default(),
        providers_over_quota: chain.providers_over_quota(),
    };

    if json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize lookup result")?;
        println!("{}", json);
    } else {
        print_report(&report);
    }

    match error {
        Some(e) => Err(lookup_failed(e)),
        None => Ok(()),
    }
}

fn lookup_failed(e: ContractError) -> anyhow::Error {
    anyhow::Error::new(e).context("Lookup failed")
}

fn print_report(report: &LookupReport<'_>) {
    match (&report.provider, &report.error) {
        (Some(provider), _) => {
            println!("✓ {} result(s) for {} from '{}'", report.results.len(), report.query, provider);
            for (i, address) in report.results.iter().enumerate() {
                println!("  {}. {}", i + 1, address);
            }
        }
        (None, Some(error)) => {
            println!("✗ {}", error);
            for provider_error in &report.provider_errors {
                println!("  - {}", provider_error);
            }
        }
        (None, None) => {}
    }

    if !report.providers_over_quota.is_empty() {
        println!("\n⚠ Over quota: {}", report.providers_over_quota.join(", "));
    }
}
