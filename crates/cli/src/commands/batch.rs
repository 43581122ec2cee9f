//! `batch` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use contracts::{ContractError, FailureClass};
use dispatcher::{Chain, Geocoder, MetricsSnapshot};
use observability::{LookupStatsAggregator, LookupSummary};

use super::build_chain;
use crate::cli::BatchArgs;

/// Batch summary for JSON output
#[derive(Serialize)]
struct BatchReport {
    total_lookups: u64,
    succeeded: u64,
    failed: u64,
    success_rate: f64,
    credential_failures: u64,
    duration_secs: f64,
    mean_latency_ms: f64,
    winners: Vec<WinnerInfo>,
    providers: Vec<ProviderInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    providers_over_quota: Vec<String>,
}

#[derive(Serialize)]
struct WinnerInfo {
    provider: String,
    lookups: u64,
}

#[derive(Serialize)]
struct ProviderInfo {
    name: String,
    attempts: u64,
    successes: u64,
    failures: u64,
    quota_exceeded: u64,
    skipped: u64,
}

impl From<(String, MetricsSnapshot)> for ProviderInfo {
    fn from((name, snapshot): (String, MetricsSnapshot)) -> Self {
        Self {
            name,
            attempts: snapshot.attempt_count,
            successes: snapshot.success_count,
            failures: snapshot.failure_count,
            quota_exceeded: snapshot.quota_exceeded_count,
            skipped: snapshot.skipped_count,
        }
    }
}

/// Execute the `batch` command
pub async fn run_batch(args: &BatchArgs) -> Result<()> {
    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let chain = build_chain(&args.config, args.limit).await?;

    let content = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("Failed to read addresses from {}", args.input.display()))?;
    let queries = parse_queries(&content);
    if queries.is_empty() {
        anyhow::bail!("No addresses found in {}", args.input.display());
    }

    info!(
        lookups = queries.len(),
        providers = chain.len(),
        "Starting batch"
    );

    let started = Instant::now();
    let run = geocode_all(&chain, &queries).await;
    let duration = started.elapsed();

    let summary = run.aggregator.summary();
    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        duration_secs = duration.as_secs_f64(),
        "Batch finished"
    );

    if args.json {
        let report = build_report(&chain, &summary, duration);
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize batch summary")?;
        println!("{}", json);
    } else {
        print_summary(&chain, &summary, duration);
    }

    match run.aborted {
        Some(e) => Err(anyhow::Error::new(e).context(format!(
            "Batch stopped after {} of {} lookups",
            summary.total_lookups,
            queries.len()
        ))),
        None => Ok(()),
    }
}

/// Outcome of a batch run
struct BatchRun {
    aggregator: LookupStatsAggregator,
    /// Credential failure that stopped the run early
    aborted: Option<ContractError>,
}

/// One address per line; blank lines and `#` comments are skipped
fn parse_queries(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// Geocode every query, stopping at the first credential failure
async fn geocode_all(chain: &Chain, queries: &[&str]) -> BatchRun {
    let mut aggregator = LookupStatsAggregator::new();

    for query in queries {
        let lookup_started = Instant::now();
        let result = chain.geocode(query).await;
        let latency_ms = lookup_started.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(addresses) => {
                let provider = chain.last_successful_provider();
                debug!(query, provider = %provider, results = addresses.len(), "Resolved");
                aggregator.record_success(&provider, addresses.len(), latency_ms);
            }
            Err(e) => {
                let class = e.failure_class();
                aggregator.record_failure(class, latency_ms);
                if class == FailureClass::InvalidCredentials {
                    error!(query, error = %e, "Invalid credentials, stopping batch");
                    return BatchRun {
                        aggregator,
                        aborted: Some(e),
                    };
                }
                warn!(query, error = %e, "Lookup failed");
            }
        }
    }

    BatchRun {
        aggregator,
        aborted: None,
    }
}

fn build_report(chain: &Chain, summary: &LookupSummary, duration: Duration) -> BatchReport {
    BatchReport {
        total_lookups: summary.total_lookups,
        succeeded: summary.succeeded,
        failed: summary.failed,
        success_rate: summary.success_rate,
        credential_failures: summary.credential_failures,
        duration_secs: duration.as_secs_f64(),
        mean_latency_ms: summary.latency_ms.mean,
        winners: summary
            .winners
            .iter()
            .map(|(provider, lookups)| WinnerInfo {
                provider: provider.clone(),
                lookups: *lookups,
            })
            .collect(),
        providers: chain.metrics().into_iter().map(ProviderInfo::from).collect(),
        providers_over_quota: chain.providers_over_quota(),
    }
}

fn print_summary(chain: &Chain, summary: &LookupSummary, duration: Duration) {
    println!();
    print!("{}", summary);
    println!("Duration: {:.2}s", duration.as_secs_f64());

    let providers = chain.metrics();
    if !providers.is_empty() {
        println!("\nProviders:");
        for (i, (name, snapshot)) in providers.iter().enumerate() {
            let prefix = if i == providers.len() - 1 { "└─" } else { "├─" };
            println!(
                "  {} {}: attempts={}, successes={}, failures={}, quota_exceeded={}, skipped={}",
                prefix,
                name,
                snapshot.attempt_count,
                snapshot.success_count,
                snapshot.failure_count,
                snapshot.quota_exceeded_count,
                snapshot.skipped_count
            );
        }
    }

    let over_quota = chain.providers_over_quota();
    if !over_quota.is_empty() {
        println!("\n⚠ Over quota: {}", over_quota.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Address, Coordinates, FaultKind, StaticEntry};
    use dispatcher::{FaultProvider, StaticProvider};

    #[test]
    fn test_parse_queries() {
        let content = "Paris\n\n# comment\n  Berlin  \n";
        assert_eq!(parse_queries(content), vec!["Paris", "Berlin"]);
    }

    #[tokio::test]
    async fn test_geocode_all_aggregates() {
        let local = StaticProvider::new(
            "local",
            vec![StaticEntry {
                query: "Paris".into(),
                aliases: vec![],
                address: Address::at(Coordinates::new(48.8566, 2.3522)),
            }],
        );
        let chain = Chain::new();
        chain
            .add_provider(FaultProvider::new("metered", FaultKind::QuotaExceeded))
            .add_provider(local);

        let run = geocode_all(&chain, &["Paris", "Atlantis", "paris"]).await;
        assert!(run.aborted.is_none());
        let summary = run.aggregator.summary();

        assert_eq!(summary.total_lookups, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.winners, vec![("local".to_string(), 2)]);

        let report = build_report(&chain, &summary, Duration::from_millis(10));
        assert_eq!(report.providers_over_quota, vec!["metered"]);
        assert_eq!(report.providers[0].attempts, 1);
        assert_eq!(report.providers[0].skipped, 2);
    }

    #[tokio::test]
    async fn test_geocode_all_stops_on_invalid_credentials() {
        let chain = Chain::new();
        chain.add_provider(FaultProvider::new("revoked", FaultKind::InvalidCredentials));

        let run = geocode_all(&chain, &["Paris", "Berlin", "Tokyo"]).await;

        assert!(matches!(
            run.aborted,
            Some(ContractError::InvalidCredentials { .. })
        ));
        let summary = run.aggregator.summary();
        assert_eq!(summary.total_lookups, 1);
        assert_eq!(summary.credential_failures, 1);
        assert_eq!(chain.metrics()[0].1.attempt_count, 1);
    }
}
