//! Generative model boundary

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Maximum accepted image payload in bytes (5 MiB).
///
/// Callers must enforce this bound before handing an attachment to the
/// pipeline; the image is held in memory for the duration of one call.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Model invocation errors
#[derive(Error, Debug)]
pub enum ModelError {
    /// Transport-level failure reaching the endpoint
    #[error("Model endpoint unavailable: {0}")]
    Unavailable(String),

    /// Endpoint answered with a non-success status
    #[error("Model endpoint returned status {status}: {body}")]
    Endpoint { status: u16, body: String },

    /// Response carried no usable text
    #[error("Model response contained no text")]
    EmptyResponse,
}

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Inline binary attachment with its declared media type
#[derive(Clone)]
pub struct ImageAttachment {
    /// Declared media type (e.g., "image/png")
    pub media_type: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    /// Create a new attachment
    pub fn new(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes,
        }
    }
}

impl fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ImageAttachment({}, {} bytes)",
            self.media_type,
            self.bytes.len()
        )
    }
}

/// Request/response boundary to a generative model
///
/// Accepts a textual prompt plus zero or one inline attachment and returns
/// the model's raw text. This abstraction allows for different
/// implementations: an HTTP client against a hosted model, or a mock in
/// tests.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Invoke the model and return its raw textual response
    async fn generate(
        &self,
        prompt: &str,
        image: Option<&ImageAttachment>,
    ) -> ModelResult<String>;
}
