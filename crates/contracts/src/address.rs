//! Address - lookup result item

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Coordinates;

/// Bounding box in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// A single geocoded place
///
/// Every field is optional because providers differ widely in what they
/// return. `provided_by` is filled by the provider that produced the item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub provided_by: String,
}

impl Address {
    /// Address located at the given coordinates
    pub fn at(coordinates: Coordinates) -> Self {
        Self {
            coordinates: Some(coordinates),
            ..Self::default()
        }
    }

    /// Single-line human readable form, e.g. `10 Downing Street, SW1A 2AA London, United Kingdom`
    pub fn formatted(&self) -> String {
        let street = join_non_empty(&[&self.street_number, &self.street_name], " ");
        let city = join_non_empty(&[&self.postal_code, &self.locality], " ");

        [Some(street), Some(city), self.region.clone(), self.country.clone()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn join_non_empty(parts: &[&Option<String>], separator: &str) -> String {
    parts
        .iter()
        .filter_map(|p| p.as_deref())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self.formatted();
        match (formatted.is_empty(), &self.coordinates) {
            (true, Some(c)) => write!(f, "{c}"),
            (true, None) => write!(f, "<empty address>"),
            (false, Some(c)) => write!(f, "{formatted} {c}"),
            (false, None) => write!(f, "{formatted}"),
        }
    }
}
