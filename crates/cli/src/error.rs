//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration could not be loaded
    #[error("Failed to load configuration: {message}")]
    ConfigLoad { message: String },

    /// Chain could not be assembled from the configuration
    #[error("Failed to build provider chain: {message}")]
    ChainBuild { message: String },

    /// Bad user input
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn config_load(message: impl Into<String>) -> Self {
        Self::ConfigLoad {
            message: message.into(),
        }
    }

    pub fn chain_build(message: impl Into<String>) -> Self {
        Self::ChainBuild {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
