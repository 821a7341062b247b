//! Backend implementations for the remote removal capability
//!
//! The pipeline talks to the outside world only through the
//! [`BackgroundRemover`] trait, so the remote capability's request and
//! response shapes never leak into session-state handling.

use crate::error::Result;
use async_trait::async_trait;

pub mod gemini;

// Test utilities for backend testing
#[cfg(test)]
pub mod test_utils;

pub use self::gemini::GeminiBackend;

/// Trait for background removal backends
#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    /// Remove the background from an encoded image.
    ///
    /// `encoded_image` is a base64 payload, optionally carrying a
    /// `data:<mime>;base64,` header; `mime_type` is the original content
    /// type. On success returns the processed image as a
    /// `data:image/png;base64,` URI.
    ///
    /// # Errors
    /// - `EmptyResponse` if the capability produced no content
    /// - `NoImage` if no response part carried inline image data
    /// - `Timeout` / `Transport` for failures of the call itself
    async fn remove_background(&self, encoded_image: &str, mime_type: &str) -> Result<String>;
}
