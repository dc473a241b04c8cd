use clap::Args;
use std::time::Duration;
use thiserror::Error;

use crate::constants;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ANTHROPIC_API_KEY is not set")]
    MissingApiKey,

    #[error("temperature must be between 0.0 and 1.0, got {0}")]
    InvalidTemperature(f32),

    #[error("max tokens must be greater than zero")]
    InvalidMaxTokens,
}

/// Settings for the Anthropic Messages API client.
///
/// Every field can come from a flag or from the environment (including a
/// `.env` file loaded at startup).
#[derive(Args, Debug, Clone)]
pub struct ProviderConfig {
    /// Anthropic API key.
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Base URL of the Anthropic API.
    #[arg(long, env = "ANTHROPIC_BASE_URL", default_value = constants::DEFAULT_ANTHROPIC_BASE_URL)]
    pub base_url: String,

    /// Model used for every completion.
    #[arg(long, env = "WWJD_MODEL", default_value = constants::DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "WWJD_MAX_TOKENS", default_value_t = constants::DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    #[arg(long, env = "WWJD_TEMPERATURE", default_value_t = constants::DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// Seconds to wait for the provider before giving up on a request.
    #[arg(long, env = "WWJD_REQUEST_TIMEOUT_SECS", default_value_t = constants::DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,
}

impl ProviderConfig {
    /// Config with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: constants::DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            model: constants::DEFAULT_MODEL.to_string(),
            max_tokens: constants::DEFAULT_MAX_TOKENS,
            temperature: constants::DEFAULT_TEMPERATURE,
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Refuse configurations the server must not start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::new("sk-test");
        assert_eq!(config.model, "claude-3-sonnet-20240229");
        assert_eq!(config.max_tokens, 3015);
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_key_rejected() {
        let config = ProviderConfig::new("   ");
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_out_of_range_temperature_rejected() {
        let mut config = ProviderConfig::new("sk-test");
        config.temperature = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTemperature(_))));
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let mut config = ProviderConfig::new("sk-test");
        config.max_tokens = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidMaxTokens)));
    }
}
