//! Gemini image-generation backend
//!
//! One network round trip per call: the encoded image, its declared MIME
//! type, and the fixed removal instruction are packaged into a single
//! `generateContent` request, and the heterogeneous response parts are
//! scanned for the first inline image.

use crate::{
    backends::BackgroundRemover,
    config::{RemovalConfig, REMOVAL_PROMPT},
    error::{RemovalError, Result},
    services::codec,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{debug, instrument};

/// Process-wide HTTP client handle, initialized once and never re-created.
/// Request deadlines are applied per call from the configuration.
static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

fn shared_client() -> Result<&'static Client> {
    if let Some(client) = HTTP_CLIENT.get() {
        return Ok(client);
    }
    let client = Client::builder()
        .build()
        .map_err(|e| RemovalError::transport(format!("Failed to create HTTP client: {e}")))?;
    Ok(HTTP_CLIENT.get_or_init(|| client))
}

/// Background removal backed by the Gemini image generation API
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    config: RemovalConfig,
    client: &'static Client,
}

impl GeminiBackend {
    /// Create a new backend from a validated configuration.
    ///
    /// # Errors
    /// - Invalid configuration (a missing API key fails here, not on the
    ///   first call)
    /// - HTTP client construction failure
    pub fn new(config: RemovalConfig) -> Result<Self> {
        config.validate()?;
        let client = shared_client()?;
        Ok(Self { config, client })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_endpoint, self.config.model
        )
    }
}

#[async_trait]
impl BackgroundRemover for GeminiBackend {
    #[instrument(
        skip(self, encoded_image),
        fields(model = %self.config.model, mime_type = %mime_type)
    )]
    async fn remove_background(&self, encoded_image: &str, mime_type: &str) -> Result<String> {
        // The capability expects raw encoded bytes, not a data URI
        let payload = codec::strip_data_uri_header(encoded_image);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: Blob {
                            mime_type: mime_type.to_string(),
                            data: payload.to_string(),
                        },
                    },
                    Part::Text {
                        text: REMOVAL_PROMPT.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };

        debug!(url = %self.request_url(), "sending generation request");
        let response = self
            .client
            .post(self.request_url())
            .header("x-goog-api-key", &self.config.api_key)
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RemovalError::Timeout(self.config.timeout.as_secs())
                } else {
                    RemovalError::transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemovalError::transport(format!(
                "Generation request failed with {status}: {body}"
            )));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RemovalError::invalid_response(e.to_string()))?;

        extract_inline_image(payload)
    }
}

/// Scan the response parts, in order, for the first inline image and
/// re-wrap it as a PNG data URI.
fn extract_inline_image(response: GenerateContentResponse) -> Result<String> {
    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .filter(|parts| !parts.is_empty())
        .ok_or(RemovalError::EmptyResponse)?;

    for part in parts {
        if let Part::InlineData { inline_data } = part {
            if !inline_data.data.is_empty() {
                debug!(mime_type = %inline_data.mime_type, "inline image found in response");
                // Always a PNG header so transparency survives
                return Ok(format!(
                    "data:{};base64,{}",
                    codec::PNG_MIME_TYPE,
                    inline_data.data
                ));
            }
        }
    }

    Err(RemovalError::NoImage)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

/// A single response or request part. The wire format is heterogeneous;
/// parts we do not care about (thoughts, function calls) decode into
/// `Other` and are skipped during scanning.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    Text {
        text: String,
    },
    Other(serde_json::Value),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}
