//! Geocoder trait - provider capability contract
//!
//! Every provider, and the fallback chain itself, implements this trait.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::{Address, ContractError, Coordinates};

/// Result of a single lookup
pub type LookupResult = Result<Vec<Address>, ContractError>;

/// Boxed, sendable future used by [`ErasedGeocoder`]
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Geocoding provider trait
///
/// All provider implementations must implement this trait.
#[trait_variant::make(Geocoder: Send)]
pub trait LocalGeocoder {
    /// Provider name (used for quota bookkeeping, logging and metrics)
    fn name(&self) -> &str;

    /// Forward lookup: address -> places
    ///
    /// # Errors
    /// `InvalidCredentials` and `QuotaExceeded` have dedicated meaning for
    /// fallback chains; anything else is treated as a recoverable failure.
    async fn geocode(&self, address: &str) -> LookupResult;

    /// Reverse lookup: coordinates -> places
    async fn reverse(&self, coordinates: Coordinates) -> LookupResult;

    /// Cap the number of returned places
    ///
    /// Must be idempotent.
    fn set_max_results(&self, limit: usize) -> Result<(), ContractError>;

    /// Whether the provider knows its quota is exhausted
    fn exceeded_quota(&self) -> bool {
        false
    }
}

/// Object-safe mirror of [`Geocoder`]
///
/// `async fn` in traits cannot be called through `dyn`, so chains hold
/// providers as [`SharedGeocoder`]. Implemented for every `Geocoder + Sync`.
pub trait ErasedGeocoder: Send + Sync {
    fn erased_name(&self) -> &str;

    fn erased_geocode<'a>(&'a self, address: &'a str) -> BoxFuture<'a, LookupResult>;

    fn erased_reverse(&self, coordinates: Coordinates) -> BoxFuture<'_, LookupResult>;

    fn erased_set_max_results(&self, limit: usize) -> Result<(), ContractError>;

    fn erased_exceeded_quota(&self) -> bool;
}

impl<T> ErasedGeocoder for T
where
    T: Geocoder + Sync,
{
    fn erased_name(&self) -> &str {
        Geocoder::name(self)
    }

    fn erased_geocode<'a>(&'a self, address: &'a str) -> BoxFuture<'a, LookupResult> {
        Box::pin(Geocoder::geocode(self, address))
    }

    fn erased_reverse(&self, coordinates: Coordinates) -> BoxFuture<'_, LookupResult> {
        Box::pin(Geocoder::reverse(self, coordinates))
    }

    fn erased_set_max_results(&self, limit: usize) -> Result<(), ContractError> {
        Geocoder::set_max_results(self, limit)
    }

    fn erased_exceeded_quota(&self) -> bool {
        Geocoder::exceeded_quota(self)
    }
}

/// Shared, type-erased provider handle
pub type SharedGeocoder = Arc<dyn ErasedGeocoder>;
