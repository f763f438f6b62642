//! Traits shared by every CBOR-serializable SDK type.

use bytes::Bytes;

use crate::buffer::Buffer;
use crate::cbor::{CborReader, CborWriter};
use crate::error::{CodecError, Result};
use crate::limits::DecodeLimits;

/// Types that encode to CBOR.
pub trait ToCbor {
    /// Append this value's encoding to `writer`.
    fn to_cbor(&self, writer: &mut CborWriter) -> Result<()>;

    /// Encode into a fresh byte vector.
    fn to_cbor_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = CborWriter::new();
        self.to_cbor(&mut writer)?;
        Ok(writer.encode())
    }

    /// Encode into a hex string.
    fn to_cbor_hex(&self) -> Result<String> {
        Ok(hex::encode(self.to_cbor_bytes()?))
    }
}

/// Types that decode from CBOR.
pub trait FromCbor: Sized {
    /// Decode one value from the reader's current position.
    fn from_cbor(reader: &mut CborReader) -> Result<Self>;

    /// Decode a value that must span all of `bytes`.
    fn from_cbor_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_cbor_bytes_with(bytes, DecodeLimits::default())
    }

    /// Like [`FromCbor::from_cbor_bytes`] with explicit decode limits.
    fn from_cbor_bytes_with(bytes: &[u8], limits: DecodeLimits) -> Result<Self> {
        let mut reader = CborReader::new(Bytes::copy_from_slice(bytes)).with_limits(limits);
        let value = Self::from_cbor(&mut reader)?;
        if !reader.is_finished() {
            return Err(CodecError::Decoding(format!(
                "{} trailing bytes after value",
                reader.remaining()
            )));
        }
        Ok(value)
    }

    /// Decode a value from hex-encoded CBOR.
    fn from_cbor_hex(s: &str) -> Result<Self> {
        Self::from_cbor_bytes(&hex::decode(s)?)
    }
}

/// Types that keep the exact bytes they were decoded from.
///
/// While a cache is present, encoding replays it verbatim. Mutating a
/// decoded value's children in place leaves the cached bytes stale until
/// [`EncodedCache::clear_encoded_cache`] is called on it.
pub trait EncodedCache {
    /// Drop the cached encoding of this value and of everything it contains.
    fn clear_encoded_cache(&self);

    /// The cached encoding, if this value came from decoding.
    fn encoded_cache(&self) -> Option<Buffer>;

    fn has_encoded_cache(&self) -> bool {
        self.encoded_cache().is_some()
    }
}
