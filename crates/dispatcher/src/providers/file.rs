//! FileProvider - table provider whose places live in a JSON file

use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use contracts::{ContractError, Coordinates, Geocoder, LookupResult, ProviderConfig, StaticEntry};

use super::StaticProvider;

/// Provider serving places loaded from a JSON array of entries
pub struct FileProvider {
    path: PathBuf,
    table: StaticProvider,
}

impl FileProvider {
    /// Load entries from `path`
    pub async fn open(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let path = path.as_ref().to_path_buf();
        let entries = load_entries(&path).await?;
        Ok(Self {
            table: StaticProvider::new(name, entries),
            path,
        })
    }

    /// Create from provider config (uses `path`)
    #[instrument(name = "file_provider_from_config", skip(config), fields(provider = %config.name))]
    pub async fn from_config(config: &ProviderConfig) -> Result<Self, ContractError> {
        let path = config.path.clone().ok_or_else(|| {
            ContractError::config_validation(
                format!("providers[{}].path", config.name),
                "file provider requires a path",
            )
        })?;

        let entries = load_entries(&path).await?;
        info!(provider = %config.name, path = %path.display(), entries = entries.len(), "Places loaded");

        Ok(Self {
            table: StaticProvider::from_config_with_entries(config, entries)?,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Underlying table
    pub fn table(&self) -> &StaticProvider {
        &self.table
    }
}

/// Read a JSON array of entries
async fn load_entries(path: &Path) -> Result<Vec<StaticEntry>, ContractError> {
    let content = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&content).map_err(|e| ContractError::ConfigParse {
        message: format!("invalid places file {}: {e}", path.display()),
        source: Some(Box::new(e)),
    })
}

impl Geocoder for FileProvider {
    fn name(&self) -> &str {
        Geocoder::name(&self.table)
    }

    async fn geocode(&self, address: &str) -> LookupResult {
        self.table.geocode(address).await
    }

    async fn reverse(&self, coordinates: Coordinates) -> LookupResult {
        self.table.reverse(coordinates).await
    }

    fn set_max_results(&self, limit: usize) -> Result<(), ContractError> {
        self.table.set_max_results(limit)
    }

    fn exceeded_quota(&self) -> bool {
        self.table.exceeded_quota()
    }
}
