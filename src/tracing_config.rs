//! Tracing configuration for structured logging
//!
//! Following tracing convention, the library only emits events;
//! applications embedding it install a subscriber. This module offers a
//! small configuration surface for hosts that do not bring their own.

use crate::error::{RemovalError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Tracing subscriber configuration
#[derive(Debug, Default)]
pub struct TracingConfig {
    /// Verbosity level (0 = warn, 1 = info, 2 = debug, 3+ = trace)
    pub verbosity: u8,
    /// Environment filter string (overrides verbosity if set)
    pub env_filter: Option<String>,
}

impl TracingConfig {
    /// Create a new tracing configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity level (0-3+)
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set a custom environment filter
    #[must_use]
    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Convert verbosity level to a tracing filter string
    #[must_use]
    pub fn verbosity_to_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "gemini_bgremove=warn",
            1 => "gemini_bgremove=info",
            2 => "gemini_bgremove=debug",
            _ => "gemini_bgremove=trace",
        }
    }

    /// Install a global subscriber for this configuration.
    ///
    /// An explicit filter wins, then `RUST_LOG`, then the verbosity level.
    ///
    /// # Errors
    /// - Malformed filter directive
    /// - A global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let filter = match &self.env_filter {
            Some(directives) => EnvFilter::try_new(directives),
            None => EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(self.verbosity_to_filter())),
        }
        .map_err(|e| RemovalError::invalid_config(format!("invalid tracing filter: {e}")))?;

        Registry::default()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
            .map_err(|e| {
                RemovalError::invalid_config(format!("failed to install tracing subscriber: {e}"))
            })
    }
}

/// Install a default subscriber honoring `RUST_LOG`
///
/// # Errors
/// - A global subscriber is already installed
pub fn init_tracing() -> Result<()> {
    TracingConfig::new().init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_filter_mapping() {
        assert_eq!(
            TracingConfig::new().with_verbosity(0).verbosity_to_filter(),
            "gemini_bgremove=warn"
        );
        assert_eq!(
            TracingConfig::new().with_verbosity(2).verbosity_to_filter(),
            "gemini_bgremove=debug"
        );
        assert_eq!(
            TracingConfig::new().with_verbosity(9).verbosity_to_filter(),
            "gemini_bgremove=trace"
        );
    }

    #[test]
    fn test_explicit_filter_overrides_verbosity() {
        let config = TracingConfig::new()
            .with_verbosity(0)
            .with_env_filter("gemini_bgremove=trace");
        assert_eq!(config.env_filter.as_deref(), Some("gemini_bgremove=trace"));
    }
}
