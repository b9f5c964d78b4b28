//! Travel-data API configuration (IRCTC via RapidAPI)

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Travel-data API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RailApiConfig {
    /// RapidAPI key
    pub api_key: String,

    /// RapidAPI host header value
    #[serde(default = "default_host")]
    pub host: String,

    /// Base URL of the API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl RailApiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate travel-data API configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.is_empty() {
            return Err(ValidationError::MissingRequired("RAIL_API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl("RAIL_BASE_URL"));
        }
        Ok(())
    }
}

impl Default for RailApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            host: default_host(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_host() -> String {
    "irctc1.p.rapidapi.com".to_string()
}

fn default_base_url() -> String {
    "https://irctc1.p.rapidapi.com".to_string()
}

fn default_timeout() -> u64 {
    20
}
