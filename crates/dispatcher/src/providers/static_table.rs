//! StaticProvider - answers lookups from an in-memory table

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::{debug, instrument};

use contracts::{
    Address, ContractError, Coordinates, Geocoder, LookupResult, ProviderConfig, StaticEntry,
};

/// Result cap used until `set_max_results` is called
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Reverse lookup search radius used when none is configured
pub const DEFAULT_RADIUS_KM: f64 = 1.0;

/// Provider backed by a fixed list of places
pub struct StaticProvider {
    name: String,
    entries: Vec<StaticEntry>,
    radius_km: f64,
    max_results: AtomicUsize,
    /// Requests served before reporting exhausted quota
    request_limit: Option<u64>,
    requests: AtomicU64,
}

impl StaticProvider {
    /// Create a new StaticProvider with the given name and places
    pub fn new(name: impl Into<String>, entries: Vec<StaticEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
            radius_km: DEFAULT_RADIUS_KM,
            max_results: AtomicUsize::new(DEFAULT_MAX_RESULTS),
            request_limit: None,
            requests: AtomicU64::new(0),
        }
    }

    pub fn with_request_limit(mut self, limit: u64) -> Self {
        self.request_limit = Some(limit);
        self
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    /// Create from provider config (inline entries)
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ContractError> {
        Self::from_config_with_entries(config, config.entries.clone())
    }

    /// Create from provider config, taking the places from elsewhere
    pub(crate) fn from_config_with_entries(
        config: &ProviderConfig,
        entries: Vec<StaticEntry>,
    ) -> Result<Self, ContractError> {
        let mut provider = Self::new(&config.name, entries);

        if let Some(radius_km) = config.radius_km {
            if !(radius_km.is_finite() && radius_km > 0.0) {
                return Err(ContractError::config_validation(
                    format!("providers[{}].radius_km", config.name),
                    format!("radius_km must be > 0, got {radius_km}"),
                ));
            }
            provider = provider.with_radius_km(radius_km);
        }
        if let Some(limit) = config.request_limit {
            provider = provider.with_request_limit(limit);
        }
        Ok(provider)
    }

    /// Number of requests received so far
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Current result cap
    pub fn max_results(&self) -> usize {
        self.max_results.load(Ordering::Relaxed)
    }

    pub fn entries(&self) -> &[StaticEntry] {
        &self.entries
    }

    /// Count the request against the limit
    fn admit(&self) -> Result<(), ContractError> {
        let served = self.requests.fetch_add(1, Ordering::Relaxed);
        match self.request_limit {
            Some(limit) if served >= limit => Err(ContractError::quota_exceeded(
                &self.name,
                format!("request limit of {limit} reached"),
            )),
            _ => Ok(()),
        }
    }

    fn tagged(&self, address: &Address) -> Address {
        Address {
            provided_by: self.name.clone(),
            ..address.clone()
        }
    }

    fn forward(&self, address: &str) -> LookupResult {
        if address.trim().is_empty() {
            return Err(ContractError::invalid_argument("address must not be empty"));
        }

        let found: Vec<Address> = self
            .entries
            .iter()
            .filter(|entry| entry.matches(address))
            .take(self.max_results())
            .map(|entry| self.tagged(&entry.address))
            .collect();

        if found.is_empty() {
            return Err(ContractError::no_result(
                &self.name,
                format!("no place matches \"{address}\""),
            ));
        }
        Ok(found)
    }

    fn backward(&self, coordinates: Coordinates) -> LookupResult {
        let mut nearby: Vec<(f64, &StaticEntry)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let at = entry.address.coordinates?;
                let distance = coordinates.distance_km(&at);
                (distance <= self.radius_km).then_some((distance, entry))
            })
            .collect();
        nearby.sort_by(|a, b| a.0.total_cmp(&b.0));

        if nearby.is_empty() {
            return Err(ContractError::no_result(
                &self.name,
                format!("no place within {} km of {coordinates}", self.radius_km),
            ));
        }

        Ok(nearby
            .into_iter()
            .take(self.max_results())
            .map(|(_, entry)| self.tagged(&entry.address))
            .collect())
    }
}

impl Geocoder for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "static_provider_geocode",
        skip(self),
        fields(provider = %self.name)
    )]
    async fn geocode(&self, address: &str) -> LookupResult {
        self.admit()?;
        let found = self.forward(address)?;
        debug!(provider = %self.name, results = found.len(), "Table hit");
        Ok(found)
    }

    #[instrument(
        name = "static_provider_reverse",
        skip(self),
        fields(provider = %self.name)
    )]
    async fn reverse(&self, coordinates: Coordinates) -> LookupResult {
        self.admit()?;
        coordinates.validate()?;
        self.backward(coordinates)
    }

    fn set_max_results(&self, limit: usize) -> Result<(), ContractError> {
        if limit == 0 {
            return Err(ContractError::invalid_argument(
                "max results must be greater than zero",
            ));
        }
        self.max_results.store(limit, Ordering::Relaxed);
        Ok(())
    }

    fn exceeded_quota(&self) -> bool {
        self.request_limit
            .is_some_and(|limit| self.requests() >= limit)
    }
}
