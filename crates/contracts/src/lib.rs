//! # Contracts
//!
//! Frozen interface contracts, defining inter-crate data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Lookup Model
//! - Forward lookup: free-form address -> `Vec<Address>`
//! - Reverse lookup: `Coordinates` -> `Vec<Address>`
//! - Failures are `ContractError`, classified by `FailureClass`

mod address;
mod blueprint;
mod coordinates;
mod error;
mod geocoder;

pub use address::*;
pub use blueprint::*;
pub use coordinates::Coordinates;
pub use error::*;
pub use geocoder::{
    BoxFuture, ErasedGeocoder, Geocoder, LocalGeocoder, LookupResult, SharedGeocoder,
};
