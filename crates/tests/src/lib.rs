//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 配置文件 → ChainBuilder → 查询 的端到端测试
//! - fallback 语义（配额排除、凭证中止、错误聚合）

#[cfg(test)]
mod contract_tests {
    use contracts::{ContractError, Coordinates, FailureClass};

    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_coordinates_json_shape() {
        // ChainNoResult 的 reverse 消息依赖此格式
        let json = serde_json::to_string(&Coordinates::new(48.8566, 2.3522)).unwrap();
        assert_eq!(json, r#"{"latitude":48.8566,"longitude":2.3522}"#);
    }

    #[test]
    fn test_failure_class_labels() {
        assert_eq!(
            ContractError::invalid_credentials("p", "bad key")
                .failure_class()
                .as_str(),
            "invalid_credentials"
        );
        assert_eq!(FailureClass::QuotaExceeded.as_str(), "quota_exceeded");
        assert_eq!(FailureClass::Other.as_str(), "other");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::sync::Arc;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{ContractError, Coordinates, FailureClass};
    use dispatcher::{create_chain, Chain, FaultProvider, Geocoder, CHAIN_NAME};
    use observability::LookupStatsAggregator;

    /// [A 普通失败, B 配额耗尽, C 命中]
    const FALLBACK_TOML: &str = r#"
[chain]
max_results = 3

[[providers]]
name = "A"
provider_type = "fault"
fault = "unavailable"

[[providers]]
name = "B"
provider_type = "fault"
fault = "quota_exceeded"

[[providers]]
name = "C"
provider_type = "static"

[[providers.entries]]
query = "Paris"
[providers.entries.address]
locality = "Paris"
country = "France"
[providers.entries.address.coordinates]
latitude = 48.8566
longitude = 2.3522
"#;

    async fn chain_from(toml: &str) -> Chain {
        let blueprint = ConfigLoader::load_from_str(toml, ConfigFormat::Toml).unwrap();
        create_chain(blueprint).await.unwrap()
    }

    fn attempts(chain: &Chain, name: &str) -> (u64, u64) {
        chain
            .metrics()
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| (s.attempt_count, s.skipped_count))
            .unwrap()
    }

    /// End-to-end test: TOML -> ConfigLoader -> ChainBuilder -> geocode
    #[tokio::test]
    async fn test_e2e_fallback_scenario() {
        let chain = chain_from(FALLBACK_TOML).await;
        assert_eq!(chain.last_successful_provider(), CHAIN_NAME);

        let found = chain.geocode("Paris").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].locality.as_deref(), Some("Paris"));
        assert_eq!(found[0].provided_by, "C");
        assert_eq!(chain.last_successful_provider(), "C");
        assert_eq!(chain.providers_over_quota(), vec!["B"]);

        // B is skipped from now on, A is retried
        chain.geocode("Paris").await.unwrap();
        assert_eq!(attempts(&chain, "A"), (2, 0));
        assert_eq!(attempts(&chain, "B"), (1, 1));
        assert_eq!(attempts(&chain, "C"), (2, 0));
        assert_eq!(chain.providers_over_quota(), vec!["B"]);
    }

    #[tokio::test]
    async fn test_e2e_exhausted_chain_aggregates_errors() {
        let chain = chain_from(FALLBACK_TOML).await;

        let err = chain.geocode("Atlantis").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"No provider could provide the address "Atlantis""#
        );
        let classes: Vec<_> = err
            .chained_errors()
            .iter()
            .map(ContractError::failure_class)
            .collect();
        assert_eq!(
            classes,
            vec![
                FailureClass::Other,
                FailureClass::QuotaExceeded,
                FailureClass::Other
            ]
        );

        // Skipped providers do not contribute an error
        let err = chain.geocode("Atlantis").await.unwrap_err();
        assert_eq!(err.chained_errors().len(), 2);
        assert_eq!(chain.last_successful_provider(), CHAIN_NAME);
    }

    #[tokio::test]
    async fn test_e2e_reverse_exhausted_message() {
        let chain = chain_from(FALLBACK_TOML).await;

        let err = chain
            .reverse(Coordinates::new(-33.8688, 151.2093))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"No provider could provide the coordinates {"latitude":-33.8688,"longitude":151.2093}"#
        );

        let found = chain
            .reverse(Coordinates::new(48.8570, 2.3530))
            .await
            .unwrap();
        assert_eq!(found[0].provided_by, "C");
    }

    #[tokio::test]
    async fn test_e2e_invalid_credentials_abort() {
        let toml = r#"
[[providers]]
name = "A"
provider_type = "fault"
fault = "no_result"

[[providers]]
name = "B"
provider_type = "fault"
fault = "invalid_credentials"

[[providers]]
name = "C"
provider_type = "static"

[[providers.entries]]
query = "Paris"
"#;
        let chain = chain_from(toml).await;

        let err = chain.geocode("Paris").await.unwrap_err();
        assert!(matches!(err, ContractError::InvalidCredentials { ref provider, .. } if provider == "B"));
        assert_eq!(attempts(&chain, "C"), (0, 0));
        assert!(chain.providers_over_quota().is_empty());
        assert_eq!(chain.last_successful_provider(), CHAIN_NAME);
    }

    #[tokio::test]
    async fn test_e2e_empty_chain() {
        let chain = chain_from("").await;
        assert!(chain.is_empty());

        let err = chain.geocode("Paris").await.unwrap_err();
        assert!(matches!(err, ContractError::ChainNoResult { .. }));
        assert!(err.chained_errors().is_empty());
        assert!(!chain.exceeded_quota());
    }

    #[tokio::test]
    async fn test_e2e_request_limit_self_reported() {
        let toml = r#"
[[providers]]
name = "metered"
provider_type = "static"
request_limit = 1

[[providers.entries]]
query = "Berlin"

[[providers]]
name = "backup"
provider_type = "static"

[[providers.entries]]
query = "Berlin"
"#;
        let chain = chain_from(toml).await;

        chain.geocode("Berlin").await.unwrap();
        assert_eq!(chain.last_successful_provider(), "metered");

        // The provider reports its own quota; the chain list stays untouched
        chain.geocode("Berlin").await.unwrap();
        assert_eq!(chain.last_successful_provider(), "backup");
        assert_eq!(attempts(&chain, "metered"), (1, 1));
        assert!(chain.providers_over_quota().is_empty());
    }

    #[tokio::test]
    async fn test_e2e_file_provider() {
        let mut places = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        places
            .write_all(
                br#"[
                    {"query": "Tokyo Tower", "aliases": ["tokyo-tower"],
                     "address": {"locality": "Tokyo", "country_code": "JP",
                                 "coordinates": {"latitude": 35.6586, "longitude": 139.7454}}}
                ]"#,
            )
            .unwrap();

        let toml = format!(
            r#"
[[providers]]
name = "archive"
provider_type = "file"
radius_km = 0.5
path = "{}"
"#,
            places.path().display()
        );
        let chain = chain_from(&toml).await;

        let found = chain.geocode("TOKYO   tower").await.unwrap();
        assert_eq!(found[0].country_code.as_deref(), Some("JP"));
        assert_eq!(found[0].provided_by, "archive");

        let nearby = chain
            .reverse(Coordinates::new(35.6590, 139.7450))
            .await
            .unwrap();
        assert_eq!(nearby.len(), 1);

        // ~1.1 km away, outside the configured radius
        assert!(chain.reverse(Coordinates::new(35.6686, 139.7454)).await.is_err());
    }

    #[tokio::test]
    async fn test_e2e_missing_places_file() {
        let toml = r#"
[[providers]]
name = "archive"
provider_type = "file"
path = "/nonexistent/places.json"
"#;
        let blueprint = ConfigLoader::load_from_str(toml, ConfigFormat::Toml).unwrap();
        let err = create_chain(blueprint).await.err().unwrap();
        assert!(err.to_string().contains("archive"), "got: {err}");
    }

    #[tokio::test]
    async fn test_e2e_nested_chain() {
        let inner = Arc::new(Chain::new());
        inner.add_provider(FaultProvider::new(
            "inner-metered",
            contracts::FaultKind::QuotaExceeded,
        ));

        let outer = chain_from(FALLBACK_TOML).await;
        outer.remove_provider("C");
        outer.add_shared(inner.clone());
        assert_eq!(outer.provider_names(), vec!["A", "B", CHAIN_NAME]);

        let err = outer.geocode("Paris").await.unwrap_err();
        assert_eq!(err.chained_errors().len(), 3);
        assert!(inner.exceeded_quota());

        // Inner chain now reports exhausted quota and is skipped
        let err = outer.geocode("Paris").await.unwrap_err();
        assert_eq!(err.chained_errors().len(), 1);
        assert_eq!(attempts(&outer, CHAIN_NAME), (1, 1));
    }

    #[tokio::test]
    async fn test_e2e_batch_statistics() {
        let chain = chain_from(FALLBACK_TOML).await;
        let mut aggregator = LookupStatsAggregator::new();

        for query in ["Paris", "Atlantis", "paris"] {
            match chain.geocode(query).await {
                Ok(found) => aggregator.record_success(
                    &chain.last_successful_provider(),
                    found.len(),
                    1.0,
                ),
                Err(e) => aggregator.record_failure(e.failure_class(), 1.0),
            }
        }

        let summary = aggregator.summary();
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.winners, vec![("C".to_string(), 2)]);
    }
}
