//! Provider implementations
//!
//! Offline providers only: StaticProvider, FileProvider and FaultProvider.
//! Vendor backends implement `contracts::Geocoder` in their own crates.

mod fault;
mod file;
mod static_table;

pub use self::fault::FaultProvider;
pub use self::file::FileProvider;
pub use self::static_table::{DEFAULT_MAX_RESULTS, DEFAULT_RADIUS_KM, StaticProvider};
