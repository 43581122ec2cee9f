//! 配置解析模块
//!
//! 支持 TOML (主要) 和 JSON (可选) 格式。

use contracts::{ChainBlueprint, ContractError};

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式 (推荐)
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// 解析 TOML 格式配置
pub fn parse_toml(content: &str) -> Result<ChainBlueprint, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 解析 JSON 格式配置
pub fn parse_json(content: &str) -> Result<ChainBlueprint, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 根据格式解析配置
pub fn parse(content: &str, format: ConfigFormat) -> Result<ChainBlueprint, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{FaultKind, ProviderType};

    #[test]
    fn test_parse_toml_minimal() {
        let content = r#"
[chain]
max_results = 3

[[providers]]
name = "local"
provider_type = "static"

[[providers.entries]]
query = "Paris"
[providers.entries.address]
locality = "Paris"
country_code = "FR"
[providers.entries.address.coordinates]
latitude = 48.8566
longitude = 2.3522

[[providers]]
name = "flaky"
provider_type = "fault"
fault = "unavailable"
"#;
        let result = parse_toml(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.chain.max_results, Some(3));
        assert_eq!(bp.providers.len(), 2);
        assert_eq!(bp.providers[0].provider_type, ProviderType::Static);
        assert_eq!(bp.providers[0].entries.len(), 1);
        let coordinates = bp.providers[0].entries[0].address.coordinates.unwrap();
        assert!((coordinates.latitude - 48.8566).abs() < 1e-9);
        assert_eq!(bp.providers[1].fault, Some(FaultKind::Unavailable));
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "providers": [
                { "name": "archive", "provider_type": "file", "path": "places.json" },
                { "name": "metered", "provider_type": "fault", "fault": "quota_exceeded" }
            ]
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.chain.max_results, None);
        assert_eq!(bp.providers[0].path.as_deref(), Some(std::path::Path::new("places.json")));
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_parse_unknown_provider_type() {
        let content = r#"
[[providers]]
name = "vendor"
provider_type = "carrier_pigeon"
"#;
        assert!(parse_toml(content).is_err());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
