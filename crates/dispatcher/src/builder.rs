//! ChainBuilder - assembles a chain from configuration

use std::sync::Arc;
use tracing::{info, instrument};

use contracts::{ChainBlueprint, Geocoder, ProviderConfig, ProviderType, SharedGeocoder};

use crate::chain::Chain;
use crate::error::DispatcherError;
use crate::providers::{FaultProvider, FileProvider, StaticProvider};

/// Builder for creating a Chain
pub struct ChainBuilder {
    blueprint: ChainBlueprint,
}

impl ChainBuilder {
    /// Create a new ChainBuilder
    pub fn new(blueprint: ChainBlueprint) -> Self {
        Self { blueprint }
    }

    /// Create every provider, register them in order and apply chain settings
    #[instrument(
        name = "chain_builder_build",
        skip(self),
        fields(provider_count = self.blueprint.providers.len())
    )]
    pub async fn build(self) -> Result<Chain, DispatcherError> {
        let chain = Chain::new();
        for config in &self.blueprint.providers {
            chain.add_shared(create_provider(config).await?);
        }

        if let Some(limit) = self.blueprint.chain.max_results {
            chain.set_max_results(limit)?;
        }

        info!(
            providers = chain.len(),
            max_results = ?self.blueprint.chain.max_results,
            "Chain ready"
        );
        Ok(chain)
    }
}

/// Create a provider from configuration
#[instrument(
    name = "chain_create_provider",
    skip(config),
    fields(provider = %config.name, provider_type = ?config.provider_type)
)]
async fn create_provider(config: &ProviderConfig) -> Result<SharedGeocoder, DispatcherError> {
    match config.provider_type {
        ProviderType::Static => {
            let provider = StaticProvider::from_config(config)
                .map_err(|e| DispatcherError::provider_creation(&config.name, e.to_string()))?;
            Ok(Arc::new(provider))
        }
        ProviderType::File => {
            let provider = FileProvider::from_config(config)
                .await
                .map_err(|e| DispatcherError::provider_creation(&config.name, e.to_string()))?;
            Ok(Arc::new(provider))
        }
        ProviderType::Fault => {
            let provider = FaultProvider::from_config(config)
                .map_err(|e| DispatcherError::provider_creation(&config.name, e.to_string()))?;
            Ok(Arc::new(provider))
        }
    }
}

/// Convenience function to create a chain from a blueprint
#[instrument(name = "chain_create", skip(blueprint))]
pub async fn create_chain(blueprint: ChainBlueprint) -> Result<Chain, DispatcherError> {
    ChainBuilder::new(blueprint).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Address, ChainSettings, Coordinates, FaultKind, StaticEntry};

    fn blueprint() -> ChainBlueprint {
        let mut primary = ProviderConfig::new("flaky", ProviderType::Fault);
        primary.fault = Some(FaultKind::Unavailable);

        let mut local = ProviderConfig::new("local", ProviderType::Static);
        local.entries = vec![
            StaticEntry {
                query: "Paris".into(),
                aliases: vec![],
                address: Address::at(Coordinates::new(48.8566, 2.3522)),
            },
            StaticEntry {
                query: "Paris".into(),
                aliases: vec![],
                address: Address::at(Coordinates::new(33.6609, -95.5555)),
            },
        ];

        ChainBlueprint {
            chain: ChainSettings {
                max_results: Some(1),
            },
            providers: vec![primary, local],
            ..ChainBlueprint::default()
        }
    }

    #[tokio::test]
    async fn test_build_from_blueprint() {
        let chain = create_chain(blueprint()).await.unwrap();
        assert_eq!(chain.provider_names(), vec!["flaky", "local"]);

        let found = chain.geocode("Paris").await.unwrap();
        assert_eq!(found.len(), 1, "max_results should be applied");
        assert_eq!(chain.last_successful_provider(), "local");
    }

    #[tokio::test]
    async fn test_build_reports_failing_provider() {
        let mut bp = blueprint();
        bp.providers[0].fault = None;

        let err = ChainBuilder::new(bp).build().await.err().unwrap();
        match err {
            DispatcherError::ProviderCreation { name, .. } => assert_eq!(name, "flaky"),
            other => panic!("expected ProviderCreation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_build_rejects_zero_max_results() {
        let mut bp = blueprint();
        bp.chain.max_results = Some(0);

        let err = create_chain(bp).await.err().unwrap();
        assert!(matches!(err, DispatcherError::Contract(_)));
    }
}
