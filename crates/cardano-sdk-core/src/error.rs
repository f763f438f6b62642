//! Error types for the Cardano SDK core.

use thiserror::Error;

/// Errors raised while building, decoding, or encoding SDK objects.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// An argument had the wrong size or shape.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Hex input could not be parsed.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// A caller-supplied output buffer is too small.
    #[error("insufficient buffer: needed {needed} bytes, {available} available")]
    InsufficientBuffer { needed: usize, available: usize },

    /// Malformed or unexpected wire data.
    #[error("decoding error: {0}")]
    Decoding(String),

    /// An invalid internal state was reached while encoding.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A payload was accessed through an accessor for a different kind.
    #[error("type conversion error: expected {expected}, found {actual}")]
    TypeConversion {
        expected: &'static str,
        actual: &'static str,
    },

    /// Container access past the end.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Decoding hit the configured nesting limit.
    #[error("nesting too deep: limit is {limit} levels")]
    NestingTooDeep { limit: usize },
}

impl CodecError {
    /// Whether this error came from malformed input rather than misuse.
    pub fn is_decoding(&self) -> bool {
        matches!(
            self,
            CodecError::Decoding(_) | CodecError::NestingTooDeep { .. }
        )
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CodecError>;
