//! Upload-to-result removal pipeline
//!
//! [`RemovalPipeline`] owns the single session state and drives it through
//! Idle → Uploading → Processing → {Success | Error}. Transitions are
//! expressed as [`SessionEvent`]s consumed by the pure [`reduce`] function;
//! each application replaces the whole state value, so observers never see
//! a half-applied transition.

use crate::{
    backends::{BackgroundRemover, GeminiBackend},
    config::RemovalConfig,
    error::{RemovalError, Result},
    services::codec,
    types::{ImageUpload, ProcessedImage, ProcessingStatus, SessionState, UploadSource},
};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Message shown when a failure carries no message of its own
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to process image. Please try again.";

/// State machine events. Produced only by the pipeline; exposed so
/// renderers and tests can drive [`reduce`] directly.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A submission passed validation and was accepted
    UploadStarted,
    /// The upload's bytes were read and encoded
    EncodingCompleted {
        /// Original image as a base64 data URI
        original: String,
        /// Declared MIME type of the upload
        mime_type: String,
    },
    /// The backend returned a processed image
    RemovalCompleted {
        /// Processed image as a base64 data URI
        processed: String,
    },
    /// Encoding or removal failed
    Failed {
        /// Failure message; empty maps to [`FALLBACK_ERROR_MESSAGE`]
        message: String,
    },
    /// The session was reset to idle
    Reset,
    /// The error banner was dismissed without changing anything else
    ErrorDismissed,
}

/// Pure transition function over session state.
///
/// A new submission or a failure keeps the prior image pair for display but
/// clears its `processed` field, so a processed result is present exactly
/// in the Success state and a failed transformation never leaves a stale
/// one behind.
#[must_use]
pub fn reduce(state: &SessionState, event: SessionEvent) -> SessionState {
    match event {
        SessionEvent::UploadStarted => SessionState {
            status: ProcessingStatus::Uploading,
            image: state.image.as_ref().map(|image| ProcessedImage {
                processed: None,
                ..image.clone()
            }),
            error: None,
        },
        SessionEvent::EncodingCompleted {
            original,
            mime_type,
        } => SessionState {
            status: ProcessingStatus::Processing,
            image: Some(ProcessedImage {
                original,
                processed: None,
                mime_type,
            }),
            error: None,
        },
        SessionEvent::RemovalCompleted { processed } => SessionState {
            status: ProcessingStatus::Success,
            image: Some(ProcessedImage {
                original: state
                    .image
                    .as_ref()
                    .map(|image| image.original.clone())
                    .unwrap_or_default(),
                processed: Some(processed),
                // The model's output format may differ from the input;
                // it is always delivered as PNG with transparency
                mime_type: codec::PNG_MIME_TYPE.to_string(),
            }),
            error: None,
        },
        SessionEvent::Failed { message } => SessionState {
            status: ProcessingStatus::Error,
            image: state.image.as_ref().map(|image| ProcessedImage {
                processed: None,
                ..image.clone()
            }),
            error: Some(if message.is_empty() {
                FALLBACK_ERROR_MESSAGE.to_string()
            } else {
                message
            }),
        },
        SessionEvent::Reset => SessionState::new(),
        SessionEvent::ErrorDismissed => SessionState {
            error: None,
            ..state.clone()
        },
    }
}

/// Controller for one removal session
pub struct RemovalPipeline {
    backend: Arc<dyn BackgroundRemover>,
    state: Mutex<SessionState>,
}

impl RemovalPipeline {
    /// Create a pipeline backed by the Gemini backend.
    ///
    /// # Errors
    /// - Invalid configuration (missing API key, out-of-range values)
    pub fn new(config: RemovalConfig) -> Result<Self> {
        Ok(Self::with_backend(Arc::new(GeminiBackend::new(config)?)))
    }

    /// Create a pipeline over any [`BackgroundRemover`] implementation
    #[must_use]
    pub fn with_backend(backend: Arc<dyn BackgroundRemover>) -> Self {
        Self {
            backend,
            state: Mutex::new(SessionState::new()),
        }
    }

    /// Snapshot of the current session state
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.lock_state().clone()
    }

    /// Submit an image for background removal and drive the session to a
    /// terminal state.
    ///
    /// Uploads whose declared MIME type is not `image/*` are rejected
    /// synchronously without touching session state. While an operation is
    /// in flight, further submissions are ignored and the current snapshot
    /// is returned, so at most one backend call runs at a time. All other
    /// failures surface through the Error state of the returned snapshot.
    ///
    /// # Errors
    /// - `UnsupportedMediaType` for non-image submissions
    #[instrument(skip(self, upload), fields(file = %upload.file_name, mime_type = %upload.mime_type))]
    pub async fn submit_image(&self, upload: ImageUpload) -> Result<SessionState> {
        if !codec::is_image_mime_type(&upload.mime_type) {
            warn!("rejected submission: not an image type");
            return Err(RemovalError::unsupported_media_type(upload.mime_type));
        }

        // Check and transition under a single lock acquisition so two
        // racing submissions can never both reach the backend
        {
            let mut state = self.lock_state();
            if state.status.is_in_flight() {
                warn!(status = %state.status, "submission ignored: operation already in flight");
                return Ok(state.clone());
            }
            *state = reduce(&state, SessionEvent::UploadStarted);
        }
        debug!("upload accepted");

        let original = match encode_upload(&upload).await {
            Ok(original) => original,
            Err(e) => {
                warn!(error = %e, "failed to encode upload");
                return Ok(self.apply(SessionEvent::Failed {
                    message: e.to_string(),
                }));
            },
        };

        self.apply(SessionEvent::EncodingCompleted {
            original: original.clone(),
            mime_type: upload.mime_type.clone(),
        });

        match self
            .backend
            .remove_background(&original, &upload.mime_type)
            .await
        {
            Ok(processed) => {
                info!("background removal succeeded");
                Ok(self.apply(SessionEvent::RemovalCompleted { processed }))
            },
            Err(e) => {
                warn!(error = %e, "background removal failed");
                Ok(self.apply(SessionEvent::Failed {
                    message: e.to_string(),
                }))
            },
        }
    }

    /// Return the session to idle, clearing image and error unconditionally
    pub fn reset(&self) -> SessionState {
        debug!("session reset");
        self.apply(SessionEvent::Reset)
    }

    /// Clear the error message, leaving status and image untouched.
    /// Idempotent.
    pub fn dismiss_error(&self) -> SessionState {
        self.apply(SessionEvent::ErrorDismissed)
    }

    fn apply(&self, event: SessionEvent) -> SessionState {
        let mut state = self.lock_state();
        *state = reduce(&state, event);
        state.clone()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        // A poisoned lock only means a panic elsewhere; the snapshot is
        // still whole because transitions replace the entire value
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Read the upload's bytes and encode them as a base64 data URI
async fn encode_upload(upload: &ImageUpload) -> Result<String> {
    let bytes = match &upload.source {
        UploadSource::Memory(bytes) => bytes.clone(),
        UploadSource::Path(path) => tokio::fs::read(path).await?,
    };
    Ok(codec::encode_data_uri(&bytes, &upload.mime_type))
}
