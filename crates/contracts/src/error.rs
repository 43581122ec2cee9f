//! Layered error definitions
//!
//! Categorized by source: config / provider / chain

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Provider Errors =====
    /// Provider rejected the configured credentials
    #[error("provider '{provider}' rejected credentials: {message}")]
    InvalidCredentials { provider: String, message: String },

    /// Provider quota is exhausted
    #[error("provider '{provider}' exceeded its quota: {message}")]
    QuotaExceeded { provider: String, message: String },

    /// Provider answered but found nothing
    #[error("provider '{provider}' found no result: {message}")]
    NoResult { provider: String, message: String },

    /// Provider does not support the requested operation
    #[error("provider '{provider}' does not support {operation}")]
    UnsupportedOperation { provider: String, operation: String },

    /// Invalid request argument
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Any other provider failure (transport, parsing, ...)
    #[error("provider '{provider}' failed: {message}")]
    Provider { provider: String, message: String },

    // ===== Chain Errors =====
    /// Every provider of a chain failed or was skipped
    #[error("{message}")]
    ChainNoResult {
        message: String,
        errors: Vec<ContractError>,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// How a failed lookup is treated by a fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// Configuration problem, aborts the whole dispatch
    InvalidCredentials,
    /// Recoverable, but the provider should not be asked again
    QuotaExceeded,
    /// Recoverable for this call only
    Other,
}

impl FailureClass {
    /// Label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::QuotaExceeded => "quota_exceeded",
            Self::Other => "other",
        }
    }
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create invalid credentials error
    pub fn invalid_credentials(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create quota exceeded error
    pub fn quota_exceeded(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::QuotaExceeded {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create no result error
    pub fn no_result(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NoResult {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create unsupported operation error
    pub fn unsupported(provider: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            provider: provider.into(),
            operation: operation.into(),
        }
    }

    /// Create invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create generic provider error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create aggregate chain error
    pub fn chain_no_result(message: impl Into<String>, errors: Vec<ContractError>) -> Self {
        Self::ChainNoResult {
            message: message.into(),
            errors,
        }
    }

    /// Classify this error for fallback purposes
    pub fn failure_class(&self) -> FailureClass {
        match self {
            Self::InvalidCredentials { .. } => FailureClass::InvalidCredentials,
            Self::QuotaExceeded { .. } => FailureClass::QuotaExceeded,
            _ => FailureClass::Other,
        }
    }

    /// Underlying failures collected by a chain (empty for other variants)
    pub fn chained_errors(&self) -> &[ContractError] {
        match self {
            Self::ChainNoResult { errors, .. } => errors,
            _ => &[],
        }
    }
}
