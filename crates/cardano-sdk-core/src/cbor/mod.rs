//! CBOR (RFC 8949) reader and writer.
//!
//! The writer always emits the smallest head for an argument. The reader
//! accepts any well-formed item (non-minimal heads, indefinite lengths) so
//! that decoded values can replay the exact bytes they came from.

mod reader;
mod writer;

pub use reader::CborReader;
pub use writer::CborWriter;

use serde::{Deserialize, Serialize};

pub(crate) const MAJOR_UNSIGNED: u8 = 0;
pub(crate) const MAJOR_NEGATIVE: u8 = 1;
pub(crate) const MAJOR_BYTES: u8 = 2;
pub(crate) const MAJOR_TEXT: u8 = 3;
pub(crate) const MAJOR_ARRAY: u8 = 4;
pub(crate) const MAJOR_MAP: u8 = 5;
pub(crate) const MAJOR_TAG: u8 = 6;
pub(crate) const MAJOR_SIMPLE: u8 = 7;

/// Additional-info value marking an indefinite length.
pub(crate) const INDEFINITE: u8 = 31;

/// The "break" stop code closing an indefinite-length item.
pub const BREAK: u8 = 0xff;

/// Longest byte or text string written as a single definite item.
///
/// Longer payloads are split into chunks of this size inside an
/// indefinite-length string. This is a ledger constant.
pub const MAX_CHUNK_LEN: usize = 64;

/// The kind of the next item in a [`CborReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CborReaderState {
    UnsignedInteger,
    NegativeInteger,
    ByteString,
    StartIndefiniteLengthByteString,
    TextString,
    StartIndefiniteLengthTextString,
    StartArray,
    StartMap,
    Tag,
    SimpleValue,
    Boolean,
    Null,
    Undefined,
    HalfPrecisionFloat,
    SinglePrecisionFloat,
    DoublePrecisionFloat,
    /// A break stop code (end of an indefinite-length item).
    Break,
    /// No input left.
    Finished,
}

impl CborReaderState {
    /// Whether the next item is a byte string of either length form.
    pub fn is_byte_string(self) -> bool {
        matches!(
            self,
            CborReaderState::ByteString | CborReaderState::StartIndefiniteLengthByteString
        )
    }

    /// Whether the next item is a text string of either length form.
    pub fn is_text_string(self) -> bool {
        matches!(
            self,
            CborReaderState::TextString | CborReaderState::StartIndefiniteLengthTextString
        )
    }
}
