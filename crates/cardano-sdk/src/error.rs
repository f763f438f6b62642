//! Error types for the SDK façade.

use cardano_sdk_core::CodecError;
use thiserror::Error;

/// Errors that can occur in SDK operations.
#[derive(Debug, Error)]
pub enum SdkError {
    /// CBOR, conversion or argument error from a value crate.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Malformed JSON input.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SdkError {
    /// Whether the failure came from malformed CBOR input.
    pub fn is_decoding(&self) -> bool {
        match self {
            SdkError::Codec(e) => e.is_decoding(),
            SdkError::Json(_) => false,
        }
    }
}

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, SdkError>;
