//! 配置校验模块
//!
//! 校验规则：
//! - provider name 非空且唯一
//! - chain.max_results > 0
//! - request_limit > 0, radius_km > 0
//! - 各类型 provider 的必填字段齐全，且不含其他类型的字段
//! - 静态条目的 query 非空、坐标合法

use std::collections::HashSet;

use contracts::{ChainBlueprint, ContractError, ProviderConfig, ProviderType};

/// 校验 ChainBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &ChainBlueprint) -> Result<(), ContractError> {
    validate_chain_settings(blueprint)?;
    validate_provider_names(blueprint)?;
    for (idx, provider) in blueprint.providers.iter().enumerate() {
        validate_limits(idx, provider)?;
        validate_type_fields(idx, provider)?;
        validate_entries(idx, provider)?;
    }
    Ok(())
}

/// 校验 chain 全局设置
fn validate_chain_settings(blueprint: &ChainBlueprint) -> Result<(), ContractError> {
    if blueprint.chain.max_results == Some(0) {
        return Err(ContractError::config_validation(
            "chain.max_results",
            "max_results must be > 0",
        ));
    }
    Ok(())
}

/// 校验 provider name 非空且唯一
///
/// 同名 provider 在 chain 中会互相覆盖，这里直接拒绝。
fn validate_provider_names(blueprint: &ChainBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, provider) in blueprint.providers.iter().enumerate() {
        if provider.name.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("providers[{}].name", idx),
                "provider name cannot be empty",
            ));
        }
        if !seen.insert(provider.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("providers[name={}]", provider.name),
                "duplicate provider name",
            ));
        }
    }
    Ok(())
}

/// 校验数值参数
fn validate_limits(idx: usize, provider: &ProviderConfig) -> Result<(), ContractError> {
    if provider.request_limit == Some(0) {
        return Err(ContractError::config_validation(
            format!("providers[{}].request_limit", idx),
            "request_limit must be > 0",
        ));
    }
    if let Some(radius_km) = provider.radius_km {
        if !(radius_km.is_finite() && radius_km > 0.0) {
            return Err(ContractError::config_validation(
                format!("providers[{}].radius_km", idx),
                format!("radius_km must be > 0, got {radius_km}"),
            ));
        }
    }
    Ok(())
}

/// 校验各类型的必填字段
fn validate_type_fields(idx: usize, provider: &ProviderConfig) -> Result<(), ContractError> {
    let field = |name: &str| format!("providers[{}].{}", idx, name);
    let is = |kind: ProviderType| provider.provider_type == kind;

    if !is(ProviderType::Static) && !provider.entries.is_empty() {
        return Err(ContractError::config_validation(
            field("entries"),
            "entries only apply to static providers",
        ));
    }
    if !is(ProviderType::File) && provider.path.is_some() {
        return Err(ContractError::config_validation(
            field("path"),
            "path only applies to file providers",
        ));
    }
    if !is(ProviderType::Fault) && provider.fault.is_some() {
        return Err(ContractError::config_validation(
            field("fault"),
            "fault only applies to fault providers",
        ));
    }

    match provider.provider_type {
        ProviderType::File if provider.path.is_none() => Err(ContractError::config_validation(
            field("path"),
            "file provider requires a path",
        )),
        ProviderType::Fault if provider.fault.is_none() => Err(ContractError::config_validation(
            field("fault"),
            "fault provider requires a fault kind",
        )),
        _ => Ok(()),
    }
}

/// 校验静态条目
fn validate_entries(idx: usize, provider: &ProviderConfig) -> Result<(), ContractError> {
    for (entry_idx, entry) in provider.entries.iter().enumerate() {
        if entry.query.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("providers[{}].entries[{}].query", idx, entry_idx),
                "query cannot be empty",
            ));
        }
        if let Some(coordinates) = &entry.address.coordinates {
            coordinates.validate().map_err(|e| {
                ContractError::config_validation(
                    format!("providers[{}].entries[{}].address.coordinates", idx, entry_idx),
                    e.to_string(),
                )
            })?;
        }
    }
    Ok(())
}
