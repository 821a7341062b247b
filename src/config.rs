//! Configuration types for background removal operations

use crate::error::{RemovalError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default model used for background removal
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Default API endpoint for the generation service
pub const DEFAULT_API_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Fixed instruction sent with every removal request
pub const REMOVAL_PROMPT: &str =
    "Remove the background. Return the subject on a transparent background.";

/// Default sampling temperature. Near-zero: this is an image transformation
/// task, not creative generation, and output consistency matters.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Default deadline for a single remote generation call
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for background removal operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovalConfig {
    /// API key for the generation service
    pub api_key: String,

    /// Model identifier sent with each generation request
    pub model: String,

    /// Base URL of the generation service
    pub api_endpoint: String,

    /// Sampling temperature (0.0-2.0)
    pub temperature: f32,

    /// Deadline for a single remote call
    pub timeout: Duration,
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl RemovalConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> RemovalConfigBuilder {
        RemovalConfigBuilder::new()
    }

    /// Build a configuration from process-wide environment variables.
    ///
    /// Reads the credential from `GEMINI_API_KEY`, falling back to
    /// `API_KEY`. The credential is read once at startup; absence fails
    /// here rather than on the first remote call.
    ///
    /// # Errors
    /// - Neither environment variable is set or the value is empty
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                RemovalError::invalid_config(
                    "API key not found: set GEMINI_API_KEY (or API_KEY) in the environment",
                )
            })?;

        Self::builder().api_key(api_key).build()
    }

    /// Validate the configuration values
    ///
    /// # Errors
    /// - Empty API key, model, or endpoint
    /// - Temperature outside 0.0-2.0
    /// - Zero timeout
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(RemovalError::invalid_config("API key must not be empty"));
        }
        if self.model.is_empty() {
            return Err(RemovalError::invalid_config(
                "model identifier must not be empty",
            ));
        }
        if self.api_endpoint.is_empty() {
            return Err(RemovalError::invalid_config(
                "API endpoint must not be empty",
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(RemovalError::config_value_error(
                "temperature",
                self.temperature,
                "0.0-2.0",
            ));
        }
        if self.timeout.is_zero() {
            return Err(RemovalError::invalid_config("timeout must be non-zero"));
        }
        Ok(())
    }
}

/// Builder for [`RemovalConfig`]
#[derive(Debug, Default)]
pub struct RemovalConfigBuilder {
    config: RemovalConfig,
}

impl RemovalConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RemovalConfig::default(),
        }
    }

    #[must_use]
    pub fn api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.config.api_key = api_key.into();
        self
    }

    #[must_use]
    pub fn model<S: Into<String>>(mut self, model: S) -> Self {
        self.config.model = model.into();
        self
    }

    #[must_use]
    pub fn api_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        // A trailing slash would double up when the request path is joined
        let endpoint = endpoint.into();
        self.config.api_endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build and validate the configuration
    ///
    /// # Errors
    /// - Any validation failure from [`RemovalConfig::validate`]
    pub fn build(self) -> Result<RemovalConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = RemovalConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_endpoint, DEFAULT_API_ENDPOINT);
        assert!((config.temperature - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_builder_requires_api_key() {
        let result = RemovalConfig::builder().build();
        assert!(matches!(result, Err(RemovalError::InvalidConfig(_))));
    }

    #[test]
    fn test_builder_clamps_temperature() {
        let config = RemovalConfig::builder()
            .api_key("test-key")
            .temperature(5.0)
            .build()
            .unwrap();
        assert!((config.temperature - 2.0).abs() < f32::EPSILON);

        let config = RemovalConfig::builder()
            .api_key("test-key")
            .temperature(-1.0)
            .build()
            .unwrap();
        assert!(config.temperature.abs() < f32::EPSILON);
    }

    #[test]
    fn test_builder_normalizes_endpoint() {
        let config = RemovalConfig::builder()
            .api_key("test-key")
            .api_endpoint("https://example.com/")
            .build()
            .unwrap();
        assert_eq!(config.api_endpoint, "https://example.com");
    }

    #[test]
    fn test_validate_rejects_out_of_range_temperature() {
        let mut config = RemovalConfig {
            api_key: "test-key".to_string(),
            ..RemovalConfig::default()
        };
        config.temperature = 2.5; // Bypass builder clamping
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
        assert!(err.to_string().contains("0.0-2.0"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = RemovalConfig {
            api_key: "test-key".to_string(),
            timeout: Duration::ZERO,
            ..RemovalConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
