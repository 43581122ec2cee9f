//! Chain - ordered fallback over several providers
//!
//! A lookup is handed to each registered provider in turn until one answers.
//! Invalid credentials abort the scan, quota exhaustion excludes the provider
//! from every later call on this chain, any other failure is collected and
//! reported in the aggregate `ChainNoResult` error.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, error, info, instrument, warn};

use contracts::{ContractError, Coordinates, Geocoder, LookupResult, SharedGeocoder};

use crate::handle::ProviderHandle;
use crate::metrics::MetricsSnapshot;
use crate::outcome::{Lookup, Outcome};

/// Name reported by every chain
pub const CHAIN_NAME: &str = "chain";

/// Fallback chain of geocoding providers
///
/// Providers are keyed by name and kept in registration order. The chain is
/// itself a [`Geocoder`], so chains can be nested.
pub struct Chain {
    /// Registered providers, in dispatch order
    handles: RwLock<Vec<ProviderHandle>>,
    /// Names of providers that ran out of quota, in the order it happened
    over_quota: Mutex<Vec<String>>,
    /// Provider that answered the latest successful lookup
    last_successful: Mutex<String>,
}

impl Chain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self {
            handles: RwLock::new(Vec::new()),
            over_quota: Mutex::new(Vec::new()),
            last_successful: Mutex::new(CHAIN_NAME.to_string()),
        }
    }

    /// Create a chain from providers, registered in iteration order
    pub fn with_providers<I>(providers: I) -> Self
    where
        I: IntoIterator<Item = SharedGeocoder>,
    {
        let chain = Self::new();
        for provider in providers {
            chain.add_shared(provider);
        }
        chain
    }

    /// Register a provider
    ///
    /// A provider with the same name replaces the registered one in place.
    pub fn add_provider<P>(&self, provider: P) -> &Self
    where
        P: Geocoder + Sync + 'static,
    {
        self.add_shared(Arc::new(provider))
    }

    /// Register a provider that may also be used elsewhere
    pub fn add_shared(&self, provider: SharedGeocoder) -> &Self {
        let handle = ProviderHandle::new(provider);
        let mut handles = self.handles.write().unwrap_or_else(PoisonError::into_inner);

        match handles.iter_mut().find(|h| h.name() == handle.name()) {
            Some(slot) => {
                debug!(provider = %handle.name(), "Replacing registered provider");
                *slot = handle;
            }
            None => {
                debug!(provider = %handle.name(), position = handles.len(), "Provider registered");
                handles.push(handle);
            }
        }
        self
    }

    /// Remove the provider with the given name
    ///
    /// Returns `false` when no such provider was registered.
    pub fn remove_provider(&self, name: &str) -> bool {
        let mut handles = self.handles.write().unwrap_or_else(PoisonError::into_inner);
        let before = handles.len();
        handles.retain(|h| h.name() != name);

        let removed = handles.len() != before;
        if removed {
            debug!(provider = %name, "Provider removed");
        }
        removed
    }

    /// Registered provider names, in dispatch order
    pub fn provider_names(&self) -> Vec<String> {
        self.snapshot()
            .iter()
            .map(|h| h.name().to_string())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.snapshot().iter().any(|h| h.name() == name)
    }

    pub fn len(&self) -> usize {
        self.handles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Providers excluded after exhausting their quota
    pub fn providers_over_quota(&self) -> Vec<String> {
        self.over_quota
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Provider behind the latest successful lookup, or [`CHAIN_NAME`] before any
    pub fn last_successful_provider(&self) -> String {
        self.last_successful
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_last_successful_provider(&self, name: impl Into<String>) {
        *self
            .last_successful
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = name.into();
    }

    /// Get metrics for all providers
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.snapshot()
            .iter()
            .map(|h| (h.name().to_string(), h.metrics().snapshot()))
            .collect()
    }

    /// Copy of the provider list; no lock is held while providers run
    fn snapshot(&self) -> Vec<ProviderHandle> {
        self.handles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn is_excluded(&self, handle: &ProviderHandle) -> bool {
        let listed = self
            .over_quota
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|name| name == handle.name());
        listed || handle.exceeded_quota()
    }

    fn mark_over_quota(&self, name: &str) {
        let mut over_quota = self.over_quota.lock().unwrap_or_else(PoisonError::into_inner);
        if !over_quota.iter().any(|n| n == name) {
            over_quota.push(name.to_string());
            observability::record_providers_over_quota(over_quota.len());
            warn!(provider = %name, "Provider excluded from chain until restart");
        }
    }

    #[instrument(
        name = "chain_dispatch",
        skip(self, lookup),
        fields(operation = lookup.operation())
    )]
    async fn dispatch(&self, lookup: Lookup<'_>) -> LookupResult {
        let handles = self.snapshot();
        let mut errors = Vec::new();

        for handle in &handles {
            if self.is_excluded(handle) {
                handle.mark_skipped(lookup.operation());
                continue;
            }

            match handle.lookup(&lookup).await {
                Outcome::Success(addresses) => {
                    self.set_last_successful_provider(handle.name());
                    debug!(
                        provider = %handle.name(),
                        failed_before = errors.len(),
                        "Chain lookup satisfied"
                    );
                    return Ok(addresses);
                }
                Outcome::InvalidCredentials(e) => {
                    error!(provider = %handle.name(), error = %e, "Invalid credentials, aborting chain");
                    return Err(e);
                }
                Outcome::QuotaExceeded(e) => {
                    self.mark_over_quota(handle.name());
                    errors.push(e);
                }
                Outcome::Failed(e) => {
                    errors.push(e);
                }
            }
        }

        observability::record_chain_exhausted(lookup.operation(), errors.len());
        warn!(
            providers = handles.len(),
            attempted = errors.len(),
            "No provider could satisfy the lookup"
        );
        Err(ContractError::chain_no_result(
            lookup.no_result_message(),
            errors,
        ))
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Geocoder for Chain {
    fn name(&self) -> &str {
        CHAIN_NAME
    }

    async fn geocode(&self, address: &str) -> LookupResult {
        self.dispatch(Lookup::Geocode(address)).await
    }

    async fn reverse(&self, coordinates: Coordinates) -> LookupResult {
        self.dispatch(Lookup::Reverse(coordinates)).await
    }

    /// Forward the cap to every provider in order, stopping at the first failure
    ///
    /// Excluded providers are configured too.
    fn set_max_results(&self, limit: usize) -> Result<(), ContractError> {
        if limit == 0 {
            return Err(ContractError::invalid_argument("max_results must be > 0"));
        }
        for handle in self.snapshot() {
            handle.provider().erased_set_max_results(limit)?;
        }
        info!(limit, providers = self.len(), "Max results propagated");
        Ok(())
    }

    /// True only when every registered provider is excluded
    fn exceeded_quota(&self) -> bool {
        let handles = self.snapshot();
        !handles.is_empty() && handles.iter().all(|h| self.is_excluded(h))
    }
}
