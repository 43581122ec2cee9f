//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Provider creation error
    #[error("failed to create provider '{name}': {message}")]
    ProviderCreation { name: String, message: String },

    /// Provider or chain error (from contract)
    #[error("provider error: {0}")]
    Contract(#[from] contracts::ContractError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatcherError {
    /// Create a provider creation error
    pub fn provider_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
