//! ProviderHandle - a registered provider with its own metrics

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};

use contracts::{Address, SharedGeocoder};

use crate::metrics::ProviderMetrics;
use crate::outcome::{Lookup, Outcome};

/// Handle to a provider registered in a chain
///
/// Cloning is cheap; clones share the provider and its metrics.
#[derive(Clone)]
pub struct ProviderHandle {
    /// Provider name, captured at registration
    name: String,
    /// The provider itself
    provider: SharedGeocoder,
    /// Shared metrics
    metrics: Arc<ProviderMetrics>,
}

impl ProviderHandle {
    /// Wrap a provider
    pub fn new(provider: SharedGeocoder) -> Self {
        Self {
            name: provider.erased_name().to_string(),
            provider,
            metrics: Arc::new(ProviderMetrics::new()),
        }
    }

    /// Get provider name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the wrapped provider
    pub fn provider(&self) -> &SharedGeocoder {
        &self.provider
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<ProviderMetrics> {
        &self.metrics
    }

    /// Whether the provider itself reports exhausted quota
    pub fn exceeded_quota(&self) -> bool {
        self.provider.erased_exceeded_quota()
    }

    /// Record that a lookup skipped this provider
    pub fn mark_skipped(&self, operation: &str) {
        self.metrics.inc_skipped_count();
        observability::record_provider_skipped(&self.name, operation);
        debug!(provider = %self.name, operation, "Provider over quota, skipped");
    }

    /// Run one lookup against the provider and classify the result
    #[instrument(
        name = "provider_handle_lookup",
        skip(self, lookup),
        fields(provider = %self.name, operation = lookup.operation())
    )]
    pub async fn lookup(&self, lookup: &Lookup<'_>) -> Outcome<Vec<Address>> {
        self.metrics.inc_attempt_count();
        let started = Instant::now();

        let result = match *lookup {
            Lookup::Geocode(address) => self.provider.erased_geocode(address).await,
            Lookup::Reverse(coordinates) => self.provider.erased_reverse(coordinates).await,
        };

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        let outcome = Outcome::from(result);

        observability::record_lookup_latency_ms(&self.name, elapsed_ms);
        observability::record_lookup(&self.name, lookup.operation(), outcome.status());

        match &outcome {
            Outcome::Success(addresses) => {
                self.metrics.inc_success_count();
                debug!(
                    provider = %self.name,
                    results = addresses.len(),
                    elapsed_ms,
                    "Lookup succeeded"
                );
            }
            Outcome::QuotaExceeded(e) => {
                self.metrics.inc_failure_count();
                self.metrics.inc_quota_exceeded_count();
                warn!(provider = %self.name, error = %e, "Provider quota exceeded");
            }
            Outcome::InvalidCredentials(e) | Outcome::Failed(e) => {
                self.metrics.inc_failure_count();
                warn!(
                    provider = %self.name,
                    status = outcome.status(),
                    error = %e,
                    "Lookup failed"
                );
            }
        }

        outcome
    }
}

impl std::fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("name", &self.name)
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{FaultProvider, StaticProvider};
    use contracts::{Coordinates, FaultKind, StaticEntry};

    fn paris_provider() -> StaticProvider {
        StaticProvider::new(
            "local",
            vec![StaticEntry {
                query: "Paris".into(),
                aliases: vec![],
                address: Address {
                    locality: Some("Paris".into()),
                    ..Address::at(Coordinates::new(48.8566, 2.3522))
                },
            }],
        )
    }

    #[tokio::test]
    async fn test_handle_success_updates_metrics() {
        let handle = ProviderHandle::new(Arc::new(paris_provider()));
        assert_eq!(handle.name(), "local");

        let outcome = handle.lookup(&Lookup::Geocode("paris")).await;
        match outcome {
            Outcome::Success(addresses) => {
                assert_eq!(addresses.len(), 1);
                assert_eq!(addresses[0].provided_by, "local");
            }
            other => panic!("expected success, got {other:?}"),
        }

        let snapshot = handle.metrics().snapshot();
        assert_eq!(snapshot.attempt_count, 1);
        assert_eq!(snapshot.success_count, 1);
        assert_eq!(snapshot.failure_count, 0);
    }

    #[tokio::test]
    async fn test_handle_quota_failure_updates_metrics() {
        let handle = ProviderHandle::new(Arc::new(FaultProvider::new(
            "metered",
            FaultKind::QuotaExceeded,
        )));

        let outcome = handle
            .lookup(&Lookup::Reverse(Coordinates::new(0.0, 0.0)))
            .await;
        assert!(matches!(outcome, Outcome::QuotaExceeded(_)));

        let snapshot = handle.metrics().snapshot();
        assert_eq!(snapshot.failure_count, 1);
        assert_eq!(snapshot.quota_exceeded_count, 1);
    }

    #[test]
    fn test_handle_skip_counter() {
        let handle = ProviderHandle::new(Arc::new(paris_provider()));
        handle.mark_skipped("geocode");
        handle.mark_skipped("reverse");
        assert_eq!(handle.metrics().skipped_count(), 2);
        assert_eq!(handle.metrics().attempt_count(), 0);
    }
}
