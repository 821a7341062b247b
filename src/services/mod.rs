//! Stateless helper services shared by the pipeline and backends

pub mod codec;

pub use codec::{encode_data_uri, is_image_mime_type, strip_data_uri_header, PNG_MIME_TYPE};
