//! # Dispatcher
//!
//! Geocoding fallback chain.
//!
//! Responsibilities:
//! - Hand each lookup to registered providers in order
//! - Stop at the first answer, abort on invalid credentials
//! - Exclude providers that ran out of quota
//! - Aggregate every other failure into one `ChainNoResult` error

pub mod builder;
pub mod chain;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod outcome;
pub mod providers;

pub use builder::{ChainBuilder, create_chain};
pub use chain::{CHAIN_NAME, Chain};
pub use contracts::{Geocoder, SharedGeocoder};
pub use error::DispatcherError;
pub use handle::ProviderHandle;
pub use metrics::{MetricsSnapshot, ProviderMetrics};
pub use outcome::{Lookup, Outcome};
pub use providers::{FaultProvider, FileProvider, StaticProvider};
