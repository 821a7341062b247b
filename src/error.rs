//! Error types for background removal operations

use thiserror::Error;

/// Result type alias for background removal operations
pub type Result<T> = std::result::Result<T, RemovalError>;

/// Error types for background removal operations
#[derive(Error, Debug)]
pub enum RemovalError {
    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Upload rejected because its declared MIME type is not an image type
    #[error("Unsupported media type '{0}': expected an image/* MIME type")]
    UnsupportedMediaType(String),

    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The generation response carried no content parts at all
    #[error("No content generated")]
    EmptyResponse,

    /// The generation response carried parts, but none with inline image data
    #[error("Model did not return an image.")]
    NoImage,

    /// The remote call exceeded the configured deadline
    #[error("Background removal timed out after {0}s")]
    Timeout(u64),

    /// Network, auth, or quota failure from the remote call, surfaced verbatim
    #[error("{0}")]
    Transport(String),

    /// The remote capability answered with a payload we could not decode
    #[error("Invalid response payload: {0}")]
    InvalidResponse(String),
}

impl RemovalError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an unsupported media type error from a declared MIME type
    pub fn unsupported_media_type<S: Into<String>>(mime_type: S) -> Self {
        Self::UnsupportedMediaType(mime_type.into())
    }

    /// Create a transport error, preserving the underlying message
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an invalid response error
    pub fn invalid_response<S: Into<String>>(msg: S) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Create a configuration error with the offending value and valid range
    pub fn config_value_error<T: std::fmt::Display>(
        parameter: &str,
        value: T,
        valid_range: &str,
    ) -> Self {
        Self::InvalidConfig(format!(
            "Invalid {}: {} (valid range: {})",
            parameter, value, valid_range
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = RemovalError::invalid_config("missing API key");
        assert!(matches!(err, RemovalError::InvalidConfig(_)));

        let err = RemovalError::unsupported_media_type("text/plain");
        assert!(matches!(err, RemovalError::UnsupportedMediaType(_)));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            RemovalError::EmptyResponse.to_string(),
            "No content generated"
        );
        assert_eq!(
            RemovalError::NoImage.to_string(),
            "Model did not return an image."
        );
        assert_eq!(
            RemovalError::Timeout(60).to_string(),
            "Background removal timed out after 60s"
        );
        // Transport messages pass through without decoration
        assert_eq!(
            RemovalError::transport("connection refused").to_string(),
            "connection refused"
        );
    }

    #[test]
    fn test_config_value_error_context() {
        let err = RemovalError::config_value_error("temperature", 3.5, "0.0-2.0");
        let msg = err.to_string();
        assert!(msg.contains("temperature"));
        assert!(msg.contains("3.5"));
        assert!(msg.contains("0.0-2.0"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist");
        let err: RemovalError = io_err.into();
        assert!(matches!(err, RemovalError::Io(_)));
        assert!(err.to_string().contains("file does not exist"));
    }
}
