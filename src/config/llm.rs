//! Generative backend configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Generative backend configuration (Hugging Face router, OpenAI-compatible)
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// API key for the inference endpoint
    pub api_key: String,

    /// Model identifier (e.g., "meta-llama/Meta-Llama-3-8B-Instruct")
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl LlmConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate LLM configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.is_empty() {
            return Err(ValidationError::MissingRequired("LLM_API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl("LLM_BASE_URL"));
        }
        if self.model.is_empty() {
            return Err(ValidationError::MissingRequired("LLM_MODEL"));
        }
        Ok(())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_model() -> String {
    "meta-llama/Meta-Llama-3-8B-Instruct".to_string()
}

fn default_base_url() -> String {
    "https://router.huggingface.co/v1".to_string()
}

fn default_timeout() -> u64 {
    40
}

fn default_max_tokens() -> u32 {
    256
}

fn default_temperature() -> f32 {
    0.3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();
        assert_eq!(config.model, "meta-llama/Meta-Llama-3-8B-Instruct");
        assert_eq!(config.base_url, "https://router.huggingface.co/v1");
        assert_eq!(config.timeout_secs, 40);
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.temperature, 0.3);
    }

    #[test]
    fn test_validation_missing_api_key() {
        let config = LlmConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_base_url() {
        let config = LlmConfig {
            api_key: "hf_xxx".to_string(),
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        let config = LlmConfig {
            api_key: "hf_xxx".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
