//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("No admin API base URL configured")]
    NoApiUrlConfigured,

    #[error("Invalid URL for {0}: must start with http:// or https://")]
    InvalidUrl(&'static str),

    #[error("Readiness attempts must be at least 1")]
    InvalidReadinessAttempts,

    #[error("Token refresh margin must not exceed {max} seconds")]
    RefreshMarginTooLarge { max: u64 },

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
