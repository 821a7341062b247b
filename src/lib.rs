#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Gemini Background Removal Library
//!
//! A Rust library that removes the background from an image by delegating
//! the segmentation work to the Gemini image generation API. The crate owns
//! the upload-to-result session state machine and the adapter to the remote
//! capability; pixels are never decoded locally.
//!
//! ## Features
//!
//! - **Session pipeline**: Idle → Uploading → Processing → {Success | Error}
//!   driven by a pure reducer; every observer sees whole state snapshots
//! - **Single in-flight operation**: concurrent submissions are ignored, so
//!   at most one generation request runs per session
//! - **Backend seam**: the [`BackgroundRemover`] trait isolates session
//!   handling from the remote request/response shapes
//! - **Typed failures**: contract violations by the remote capability,
//!   transport failures, and timeouts surface as distinct errors
//! - **Bounded calls**: every generation request carries a configurable
//!   deadline (60 s by default)
//!
//! ## Quick Start
//!
//! ### One-shot processing
//!
//! ```rust,no_run
//! use gemini_bgremove::{remove_background_from_path, RemovalConfig};
//!
//! # async fn example() -> gemini_bgremove::Result<()> {
//! let config = RemovalConfig::from_env()?;
//! let processed = remove_background_from_path("subject.jpg", &config).await?;
//! // `processed` is a data:image/png;base64,... URI with transparency
//! # Ok(())
//! # }
//! ```
//!
//! ### Driving a session
//!
//! ```rust,no_run
//! use gemini_bgremove::{ImageUpload, ProcessingStatus, RemovalConfig, RemovalPipeline};
//!
//! # async fn example() -> gemini_bgremove::Result<()> {
//! let pipeline = RemovalPipeline::new(RemovalConfig::from_env()?)?;
//!
//! let state = pipeline.submit_image(ImageUpload::from_path("subject.jpg")).await?;
//! match state.status {
//!     ProcessingStatus::Success => {
//!         let image = state.image.unwrap();
//!         println!("processed: {} bytes", image.processed.unwrap().len());
//!     },
//!     ProcessingStatus::Error => eprintln!("{}", state.error.unwrap()),
//!     _ => unreachable!("submit_image returns a terminal snapshot"),
//! }
//! pipeline.reset();
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod services;
pub mod tracing_config;
pub mod types;

// Public API exports
pub use backends::{BackgroundRemover, GeminiBackend};
pub use config::{RemovalConfig, RemovalConfigBuilder, DEFAULT_MODEL, REMOVAL_PROMPT};
pub use error::{RemovalError, Result};
pub use pipeline::{reduce, RemovalPipeline, SessionEvent, FALLBACK_ERROR_MESSAGE};
pub use services::codec::{encode_data_uri, is_image_mime_type, strip_data_uri_header};
pub use tracing_config::{init_tracing, TracingConfig};
pub use types::{ImageUpload, ProcessedImage, ProcessingStatus, SessionState, UploadSource};

/// Remove the background from an image provided as bytes.
///
/// One-shot API without session state, suitable for servers and batch
/// callers. Returns the processed image as a `data:image/png;base64,` URI.
///
/// # Errors
/// - `UnsupportedMediaType` when `mime_type` is not `image/*`
/// - Any backend failure (`EmptyResponse`, `NoImage`, `Timeout`,
///   `Transport`)
///
/// # Examples
/// ```rust,no_run
/// use gemini_bgremove::{remove_background_from_bytes, RemovalConfig};
///
/// # async fn example(upload: Vec<u8>) -> gemini_bgremove::Result<()> {
/// let config = RemovalConfig::from_env()?;
/// let processed = remove_background_from_bytes(&upload, "image/jpeg", &config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn remove_background_from_bytes(
    bytes: &[u8],
    mime_type: &str,
    config: &RemovalConfig,
) -> Result<String> {
    if !is_image_mime_type(mime_type) {
        return Err(RemovalError::unsupported_media_type(mime_type));
    }
    let backend = GeminiBackend::new(config.clone())?;
    let encoded = encode_data_uri(bytes, mime_type);
    backend.remove_background(&encoded, mime_type).await
}

/// Remove the background from an image file on disk.
///
/// The MIME type is guessed from the file extension.
///
/// # Errors
/// - `UnsupportedMediaType` for extensions outside the `image/*` category
/// - IO failure reading the file
/// - Any backend failure
pub async fn remove_background_from_path<P: AsRef<std::path::Path>>(
    path: P,
    config: &RemovalConfig,
) -> Result<String> {
    let upload = ImageUpload::from_path(path.as_ref());
    if !is_image_mime_type(&upload.mime_type) {
        return Err(RemovalError::unsupported_media_type(upload.mime_type));
    }
    let bytes = tokio::fs::read(path.as_ref()).await?;
    remove_background_from_bytes(&bytes, &upload.mime_type, config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_one_shot_rejects_non_image_bytes() {
        let config = RemovalConfig::builder().api_key("test-key").build().unwrap();
        let result = remove_background_from_bytes(b"hello", "text/plain", &config).await;
        assert!(matches!(result, Err(RemovalError::UnsupportedMediaType(_))));
    }

    #[tokio::test]
    async fn test_one_shot_rejects_non_image_path() {
        let config = RemovalConfig::builder().api_key("test-key").build().unwrap();
        let result = remove_background_from_path("notes.txt", &config).await;
        assert!(matches!(result, Err(RemovalError::UnsupportedMediaType(_))));
    }
}
