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
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Invalid base URL format: {0}")]
    InvalidBaseUrl(&'static str),

    #[error("History cap must be at least 1")]
    InvalidHistoryCap,

    #[error("Session TTL must be at least 1 second")]
    InvalidSessionTtl,
}
