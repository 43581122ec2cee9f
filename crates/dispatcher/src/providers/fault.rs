//! FaultProvider - always fails, for rehearsing failover

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, instrument};

use contracts::{ContractError, Coordinates, FaultKind, Geocoder, LookupResult, ProviderConfig};

/// Provider that fails every lookup with a configured error
pub struct FaultProvider {
    name: String,
    kind: FaultKind,
    calls: AtomicU64,
}

impl FaultProvider {
    /// Create a new FaultProvider
    pub fn new(name: impl Into<String>, kind: FaultKind) -> Self {
        Self {
            name: name.into(),
            kind,
            calls: AtomicU64::new(0),
        }
    }

    /// Create from provider config
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ContractError> {
        let kind = config.fault.ok_or_else(|| {
            ContractError::config_validation(
                format!("providers[{}].fault", config.name),
                "fault provider requires a fault kind",
            )
        })?;
        Ok(Self::new(&config.name, kind))
    }

    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    /// Number of lookups received
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    fn fail(&self, operation: &str) -> ContractError {
        self.calls.fetch_add(1, Ordering::Relaxed);
        debug!(provider = %self.name, kind = ?self.kind, operation, "Injecting fault");

        match self.kind {
            FaultKind::QuotaExceeded => {
                ContractError::quota_exceeded(&self.name, "injected quota exhaustion")
            }
            FaultKind::InvalidCredentials => {
                ContractError::invalid_credentials(&self.name, "injected credential rejection")
            }
            FaultKind::Unavailable => ContractError::provider(&self.name, "service unavailable"),
            FaultKind::NoResult => ContractError::no_result(&self.name, "injected empty answer"),
            FaultKind::Unsupported => ContractError::unsupported(&self.name, operation),
        }
    }
}

impl Geocoder for FaultProvider {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "fault_provider_geocode", skip(self), fields(provider = %self.name))]
    async fn geocode(&self, _address: &str) -> LookupResult {
        Err(self.fail("geocode"))
    }

    #[instrument(name = "fault_provider_reverse", skip(self), fields(provider = %self.name))]
    async fn reverse(&self, _coordinates: Coordinates) -> LookupResult {
        Err(self.fail("reverse"))
    }

    fn set_max_results(&self, _limit: usize) -> Result<(), ContractError> {
        Ok(())
    }
}
