//! ChainBlueprint - Config Loader output
//!
//! Describes the fallback chain: global settings and the ordered provider list.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::Address;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete chain configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Chain-wide settings
    #[serde(default)]
    pub chain: ChainSettings,

    /// Providers in dispatch order
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

/// Chain-wide settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainSettings {
    /// Result cap pushed to every provider after construction
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Unique provider name
    pub name: String,

    /// Provider type
    pub provider_type: ProviderType,

    /// Requests served before the provider reports exhausted quota (static/file)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_limit: Option<u64>,

    /// Reverse lookup search radius in km (static/file)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_km: Option<f64>,

    /// Inline places (static)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<StaticEntry>,

    /// JSON file holding an array of places (file)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Failure to inject (fault)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault: Option<FaultKind>,
}

impl ProviderConfig {
    /// Minimal config of the given type
    pub fn new(name: impl Into<String>, provider_type: ProviderType) -> Self {
        Self {
            name: name.into(),
            provider_type,
            request_limit: None,
            radius_km: None,
            entries: Vec::new(),
            path: None,
            fault: None,
        }
    }
}

/// Provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    /// In-memory table
    Static,
    /// Table loaded from a JSON file
    File,
    /// Always fails with a configured error
    Fault,
}

/// Failure injected by a fault provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    QuotaExceeded,
    InvalidCredentials,
    Unavailable,
    NoResult,
    Unsupported,
}

/// A known place served by table-backed providers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticEntry {
    /// Primary query this place answers
    pub query: String,

    /// Alternative spellings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// Returned place
    #[serde(default)]
    pub address: Address,
}

impl StaticEntry {
    /// Whether `query` or one of the aliases matches (case and whitespace insensitive)
    pub fn matches(&self, query: &str) -> bool {
        let wanted = normalize_query(query);
        !wanted.is_empty()
            && std::iter::once(&self.query)
                .chain(self.aliases.iter())
                .any(|candidate| normalize_query(candidate) == wanted)
    }
}

/// Lowercase and collapse whitespace
pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
