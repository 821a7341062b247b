//! Core types for the upload-to-result session

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Status of the removal session. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingStatus {
    /// No image accepted yet
    Idle,
    /// A submission was accepted and its bytes are being encoded
    Uploading,
    /// The remote removal call is in flight
    Processing,
    /// Background removal finished and a processed image is available
    Success,
    /// The last operation failed
    Error,
}

impl ProcessingStatus {
    /// Whether an operation is currently in flight
    #[must_use]
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::Uploading | Self::Processing)
    }
}

impl Default for ProcessingStatus {
    fn default() -> Self {
        Self::Idle
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Uploading => write!(f, "uploading"),
            Self::Processing => write!(f, "processing"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The original/processed image pair carried through the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedImage {
    /// Original image as a base64 data URI
    pub original: String,

    /// Processed image as a base64 data URI; absent until removal succeeds
    pub processed: Option<String>,

    /// MIME type of the pair. Tracks the input type until removal succeeds,
    /// then the output format produced by the model.
    pub mime_type: String,
}

/// One session's worth of mutable state.
///
/// Every transition replaces the whole value, so a renderer holding any
/// snapshot never observes a half-applied transition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Current pipeline status
    pub status: ProcessingStatus,

    /// Image pair, present once a submission has been accepted
    pub image: Option<ProcessedImage>,

    /// Human-readable failure message, present only after a failure
    pub error: Option<String>,
}

impl SessionState {
    /// Fresh session in the idle state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Where an upload's bytes come from
#[derive(Debug, Clone)]
pub enum UploadSource {
    /// Bytes already in memory
    Memory(Vec<u8>),
    /// Bytes to be read from a file on disk
    Path(PathBuf),
}

/// A file-like object submitted to the pipeline: byte content plus a
/// declared MIME type.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original file name, kept for logging
    pub file_name: String,

    /// Declared content type; must be in the `image/*` category
    pub mime_type: String,

    /// Byte content of the upload
    pub source: UploadSource,
}

impl ImageUpload {
    /// Create an upload from in-memory bytes
    #[must_use]
    pub fn from_bytes<N, M>(file_name: N, mime_type: M, bytes: Vec<u8>) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            source: UploadSource::Memory(bytes),
        }
    }

    /// Create an upload from a file path, guessing the MIME type from the
    /// file extension. Unknown extensions map to
    /// `application/octet-stream`, which the pipeline rejects.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path_ref = path.as_ref();
        let file_name = path_ref
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_type_for_extension(path_ref).to_string();

        Self {
            file_name,
            mime_type,
            source: UploadSource::Path(path_ref.to_path_buf()),
        }
    }
}

fn mime_type_for_extension(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        _ => "application/octet-stream",
    }
}
