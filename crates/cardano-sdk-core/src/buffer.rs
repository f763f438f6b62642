//! Owned byte buffer with hex import/export.

use bytes::Bytes;
use std::fmt;

use crate::error::Result;

/// An owned, immutable byte sequence.
///
/// Cloning is cheap: the underlying storage is shared.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Buffer(Bytes);

impl Buffer {
    /// An empty buffer.
    pub const fn new() -> Self {
        Self(Bytes::new())
    }

    /// Take ownership of a byte vector.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self(Bytes::from(bytes))
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        Ok(Self::from_vec(hex::decode(s)?))
    }

    /// Convert to a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// A new buffer holding `self` followed by `other`.
    pub fn concat(&self, other: &Buffer) -> Buffer {
        let mut joined = Vec::with_capacity(self.len() + other.len());
        joined.extend_from_slice(&self.0);
        joined.extend_from_slice(&other.0);
        Self::from_vec(joined)
    }

    /// The shared storage backing this buffer.
    pub fn as_bytes(&self) -> &Bytes {
        &self.0
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Buffer({})", self.to_hex())
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(bytes))
    }
}

impl From<Bytes> for Buffer {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}
