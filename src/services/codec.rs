//! Data-URI payload handling
//!
//! The remote capability consumes and produces raw base64 payloads, while
//! callers exchange self-describing data URIs. This module owns the
//! conversions between the two so neither the pipeline nor the backend
//! carries string-mangling logic.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// MIME type of every processed result. The model's image output is
/// treated as PNG-capable with transparency.
pub const PNG_MIME_TYPE: &str = "image/png";

/// Whether a declared MIME type is in the `image/*` category
#[must_use]
pub fn is_image_mime_type(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// Encode raw bytes as a base64 data URI with the given MIME type
#[must_use]
pub fn encode_data_uri(bytes: &[u8], mime_type: &str) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Strip a `data:<mime>;base64,` header, if present, returning the raw
/// base64 payload. Payloads without a header pass through unchanged.
#[must_use]
pub fn strip_data_uri_header(payload: &str) -> &str {
    if !payload.starts_with("data:") {
        return payload;
    }
    match payload.find(";base64,") {
        Some(index) => &payload[index + ";base64,".len()..],
        None => payload,
    }
}
