//! Command implementations.

mod batch;
mod geocode;
mod info;
mod validate;

pub use batch::run_batch;
pub use geocode::{run_geocode, run_reverse};
pub use info::run_info;
pub use validate::run_validate;

use std::path::Path;

use contracts::{ChainBlueprint, ContractError};
use dispatcher::Chain;
use tracing::info;

use crate::error::{CliError, Result};

/// Load and validate the configuration file
fn load_blueprint(path: &Path) -> Result<ChainBlueprint> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()));
    }
    config_loader::ConfigLoader::load_from_path(path).map_err(|e| match e {
        ContractError::Io(io) => CliError::Io(io),
        other => CliError::config_load(other.to_string()),
    })
}

/// Build the chain described by `path`, optionally overriding the result cap
async fn build_chain(path: &Path, limit: Option<usize>) -> Result<Chain> {
    let mut blueprint = load_blueprint(path)?;

    if let Some(limit) = limit {
        if limit == 0 {
            return Err(CliError::invalid_input("--limit must be > 0"));
        }
        info!(limit, "Overriding max_results from CLI");
        blueprint.chain.max_results = Some(limit);
    }

    dispatcher::create_chain(blueprint)
        .await
        .map_err(|e| CliError::chain_build(e.to_string()))
}
