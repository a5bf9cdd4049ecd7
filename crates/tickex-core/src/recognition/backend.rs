//! OCR backend seam and the HTTP implementation.
//!
//! The backend is the only component that knows the OCR wire format;
//! everything downstream works on already-mapped [`TextBlock`]s.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::OcrBackendError;
use crate::models::config::RecognitionConfig;
use crate::models::document::{BlockGeometry, BlockKind, TextBlock};

/// Input to one synchronous detect-text call.
#[derive(Debug, Clone, Copy)]
pub enum OcrInput<'a> {
    /// Raw document bytes.
    Bytes(&'a [u8]),
    /// A remote object the backend fetches itself.
    Remote { bucket: &'a str, key: &'a str },
}

/// An OCR backend invoked in synchronous detect-text mode.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    /// Recognize text in the given document.
    ///
    /// Returns [`OcrBackendError::UnsupportedDocument`] when the document
    /// format/complexity cannot be handled synchronously; the recognition
    /// service reacts to that exact variant with the page-split fallback.
    async fn detect_text(&self, input: OcrInput<'_>) -> Result<Vec<TextBlock>, OcrBackendError>;
}

#[derive(Serialize)]
struct DetectTextRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    s3_object: Option<S3ObjectRef<'a>>,
}

#[derive(Serialize)]
struct S3ObjectRef<'a> {
    bucket: &'a str,
    key: &'a str,
}

#[derive(Deserialize)]
struct DetectTextResponse {
    #[serde(default)]
    blocks: Vec<WireBlock>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// One block record as the OCR service reports it.
#[derive(Deserialize)]
struct WireBlock {
    id: Option<String>,
    text: Option<String>,
    block_type: Option<String>,
    confidence: Option<f32>,
    bounding_box: Option<WireBoundingBox>,
}

#[derive(Deserialize)]
struct WireBoundingBox {
    left: Option<f32>,
    top: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
}

impl WireBlock {
    /// Map a wire record into a [`TextBlock`].
    ///
    /// `id` defaults to empty; a bounding box is kept only when all four
    /// geometry fields are present; other absent optionals stay absent.
    fn into_block(self) -> TextBlock {
        let geometry = self.bounding_box.and_then(|b| match (b.left, b.top, b.width, b.height) {
            (Some(left), Some(top), Some(width), Some(height)) => Some(BlockGeometry {
                left,
                top,
                width,
                height,
            }),
            _ => None,
        });

        TextBlock {
            id: self.id.unwrap_or_default(),
            text: self.text,
            kind: self
                .block_type
                .as_deref()
                .map(BlockKind::from_wire)
                .unwrap_or(BlockKind::Other),
            confidence: self.confidence,
            geometry,
        }
    }
}

/// OCR backend that posts documents to an HTTP detect-text service.
pub struct HttpOcrBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpOcrBackend {
    /// Build a backend from the recognition configuration.
    pub fn new(config: &RecognitionConfig) -> Result<Self, OcrBackendError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| OcrBackendError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl OcrBackend for HttpOcrBackend {
    async fn detect_text(&self, input: OcrInput<'_>) -> Result<Vec<TextBlock>, OcrBackendError> {
        let request = match input {
            OcrInput::Bytes(bytes) => DetectTextRequest {
                bytes: Some(BASE64.encode(bytes)),
                s3_object: None,
            },
            OcrInput::Remote { bucket, key } => DetectTextRequest {
                bytes: None,
                s3_object: Some(S3ObjectRef { bucket, key }),
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrBackendError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let envelope: ErrorEnvelope = response
                .json()
                .await
                .map_err(|e| OcrBackendError::Transport(e.to_string()))?;

            // The fallback triggers on the discriminator, never on message text.
            if envelope.code == "UNSUPPORTED_DOCUMENT" {
                return Err(OcrBackendError::UnsupportedDocument);
            }
            return Err(OcrBackendError::Service(format!(
                "{status}: {} {}",
                envelope.code, envelope.message
            )));
        }

        let body: DetectTextResponse = response
            .json()
            .await
            .map_err(|e| OcrBackendError::Transport(e.to_string()))?;

        let blocks: Vec<TextBlock> = body.blocks.into_iter().map(WireBlock::into_block).collect();
        debug!("OCR backend returned {} blocks", blocks.len());

        Ok(blocks)
    }
}
