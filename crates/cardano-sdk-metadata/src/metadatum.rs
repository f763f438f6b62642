//! Transaction metadatum values.
//!
//! A [`Metadatum`] is a map, list, integer, byte string or text string.
//! Unlike Plutus Data there are no constructors, and no tag other than the
//! bignum tags is accepted.

use std::cell::RefCell;
use std::fmt;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use cardano_sdk_core::bigint::parse_integer;
use cardano_sdk_core::{
    Buffer, CborReader, CborReaderState, CborWriter, CodecError, EncodedCache, FromCbor, Object,
    Result, Shared, ToCbor,
};

use crate::list::MetadatumList;
use crate::map::MetadatumMap;

/// Discriminant of a [`Metadatum`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadatumKind {
    Map,
    List,
    Integer,
    Bytes,
    Text,
}

impl MetadatumKind {
    pub fn name(self) -> &'static str {
        match self {
            MetadatumKind::Map => "Map",
            MetadatumKind::List => "List",
            MetadatumKind::Integer => "Integer",
            MetadatumKind::Bytes => "Bytes",
            MetadatumKind::Text => "Text",
        }
    }
}

impl fmt::Display for MetadatumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The payload of a [`Metadatum`].
#[derive(Debug, Clone, PartialEq)]
pub enum MetadatumValue {
    Map(MetadatumMap),
    List(MetadatumList),
    Integer(BigInt),
    Bytes(Buffer),
    Text(String),
}

impl MetadatumValue {
    pub fn kind(&self) -> MetadatumKind {
        match self {
            MetadatumValue::Map(_) => MetadatumKind::Map,
            MetadatumValue::List(_) => MetadatumKind::List,
            MetadatumValue::Integer(_) => MetadatumKind::Integer,
            MetadatumValue::Bytes(_) => MetadatumKind::Bytes,
            MetadatumValue::Text(_) => MetadatumKind::Text,
        }
    }
}

struct MetadatumCell {
    value: MetadatumValue,
    cache: RefCell<Option<Buffer>>,
}

/// A shared metadatum value.
#[derive(Clone)]
pub struct Metadatum {
    inner: Object<MetadatumCell>,
}

impl Metadatum {
    fn from_parts(value: MetadatumValue, cache: Option<Buffer>) -> Self {
        Self {
            inner: Object::new(MetadatumCell {
                value,
                cache: RefCell::new(cache),
            }),
        }
    }

    pub fn new(value: MetadatumValue) -> Self {
        Self::from_parts(value, None)
    }

    pub fn new_map(map: MetadatumMap) -> Self {
        Self::new(MetadatumValue::Map(map))
    }

    pub fn new_list(list: MetadatumList) -> Self {
        Self::new(MetadatumValue::List(list))
    }

    pub fn new_integer(value: BigInt) -> Self {
        Self::new(MetadatumValue::Integer(value))
    }

    pub fn new_integer_from_u64(value: u64) -> Self {
        Self::new_integer(BigInt::from(value))
    }

    pub fn new_integer_from_i64(value: i64) -> Self {
        Self::new_integer(BigInt::from(value))
    }

    /// Parse an integer written in `radix` (2 to 36).
    pub fn new_integer_from_str(text: &str, radix: u32) -> Result<Self> {
        Ok(Self::new_integer(parse_integer(text, radix)?))
    }

    pub fn new_bytes(bytes: impl Into<Buffer>) -> Self {
        Self::new(MetadatumValue::Bytes(bytes.into()))
    }

    pub fn new_bytes_from_hex(s: &str) -> Result<Self> {
        Ok(Self::new_bytes(Buffer::from_hex(s)?))
    }

    pub fn new_string(text: impl Into<String>) -> Self {
        Self::new(MetadatumValue::Text(text.into()))
    }

    pub fn kind(&self) -> MetadatumKind {
        self.inner.value.kind()
    }

    pub fn as_value(&self) -> &MetadatumValue {
        &self.inner.value
    }

    fn mismatch(&self, expected: MetadatumKind) -> CodecError {
        CodecError::TypeConversion {
            expected: expected.name(),
            actual: self.kind().name(),
        }
    }

    pub fn to_map(&self) -> Result<MetadatumMap> {
        match &self.inner.value {
            MetadatumValue::Map(map) => Ok(map.clone()),
            _ => Err(self.mismatch(MetadatumKind::Map)),
        }
    }

    pub fn to_list(&self) -> Result<MetadatumList> {
        match &self.inner.value {
            MetadatumValue::List(list) => Ok(list.clone()),
            _ => Err(self.mismatch(MetadatumKind::List)),
        }
    }

    pub fn to_integer(&self) -> Result<BigInt> {
        match &self.inner.value {
            MetadatumValue::Integer(n) => Ok(n.clone()),
            _ => Err(self.mismatch(MetadatumKind::Integer)),
        }
    }

    pub fn to_bytes(&self) -> Result<Buffer> {
        match &self.inner.value {
            MetadatumValue::Bytes(bytes) => Ok(bytes.clone()),
            _ => Err(self.mismatch(MetadatumKind::Bytes)),
        }
    }

    pub fn to_text(&self) -> Result<String> {
        match &self.inner.value {
            MetadatumValue::Text(text) => Ok(text.clone()),
            _ => Err(self.mismatch(MetadatumKind::Text)),
        }
    }

    pub fn ptr_eq(&self, other: &Metadatum) -> bool {
        Object::ptr_eq(&self.inner, &other.inner)
    }

    fn decode_value(reader: &mut CborReader) -> Result<Self> {
        let raw = reader.clone().read_encoded_value()?;

        let value = match reader.peek_state()? {
            CborReaderState::Tag => MetadatumValue::Integer(reader.read_bigint()?),
            CborReaderState::UnsignedInteger => {
                MetadatumValue::Integer(BigInt::from(reader.read_uint()?))
            }
            CborReaderState::NegativeInteger => {
                MetadatumValue::Integer(BigInt::from(reader.read_int()?))
            }
            CborReaderState::ByteString | CborReaderState::StartIndefiniteLengthByteString => {
                MetadatumValue::Bytes(Buffer::from_vec(reader.read_bytestring()?))
            }
            CborReaderState::TextString | CborReaderState::StartIndefiniteLengthTextString => {
                MetadatumValue::Text(reader.read_textstring()?)
            }
            CborReaderState::StartArray => {
                MetadatumValue::List(MetadatumList::from_cbor(reader)?)
            }
            CborReaderState::StartMap => MetadatumValue::Map(MetadatumMap::from_cbor(reader)?),
            other => {
                return Err(reader.fail(format!("unexpected {:?} while decoding metadatum", other)))
            }
        };

        Ok(Self::from_parts(value, Some(raw)))
    }
}

impl FromCbor for Metadatum {
    fn from_cbor(reader: &mut CborReader) -> Result<Self> {
        reader.enter_nested()?;
        let decoded = Self::decode_value(reader);
        reader.exit_nested();
        decoded
    }
}

impl ToCbor for Metadatum {
    fn to_cbor(&self, writer: &mut CborWriter) -> Result<()> {
        if let Some(raw) = self.inner.cache.borrow().as_ref() {
            writer.write_encoded(raw.as_slice());
            return Ok(());
        }

        match &self.inner.value {
            MetadatumValue::Map(map) => map.to_cbor(writer),
            MetadatumValue::List(list) => list.to_cbor(writer),
            MetadatumValue::Integer(n) => writer.write_bigint(n),
            MetadatumValue::Bytes(bytes) => {
                writer.write_bounded_bytestring(bytes.as_slice());
                Ok(())
            }
            MetadatumValue::Text(text) => {
                writer.write_bounded_textstring(text);
                Ok(())
            }
        }
    }
}

impl EncodedCache for Metadatum {
    fn clear_encoded_cache(&self) {
        self.inner.cache.replace(None);
        match &self.inner.value {
            MetadatumValue::Map(map) => map.clear_encoded_cache(),
            MetadatumValue::List(list) => list.clear_encoded_cache(),
            MetadatumValue::Integer(_) | MetadatumValue::Bytes(_) | MetadatumValue::Text(_) => {}
        }
    }

    fn encoded_cache(&self) -> Option<Buffer> {
        self.inner.cache.borrow().clone()
    }
}

impl Shared for Metadatum {
    fn refcount(&self) -> usize {
        self.inner.refcount()
    }

    fn set_last_error(&self, message: &str) {
        self.inner.set_last_error(message)
    }

    fn last_error(&self) -> String {
        self.inner.last_error()
    }
}

impl PartialEq for Metadatum {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.inner.value == other.inner.value
    }
}

impl fmt::Debug for Metadatum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.value {
            MetadatumValue::Map(map) => map.fmt(f),
            MetadatumValue::List(list) => list.fmt(f),
            MetadatumValue::Integer(n) => write!(f, "Integer({})", n),
            MetadatumValue::Bytes(bytes) => write!(f, "Bytes({})", bytes.to_hex()),
            MetadatumValue::Text(text) => write!(f, "Text({:?})", text),
        }
    }
}

impl From<BigInt> for Metadatum {
    fn from(value: BigInt) -> Self {
        Self::new_integer(value)
    }
}

impl From<u64> for Metadatum {
    fn from(value: u64) -> Self {
        Self::new_integer_from_u64(value)
    }
}

impl From<i64> for Metadatum {
    fn from(value: i64) -> Self {
        Self::new_integer_from_i64(value)
    }
}

impl From<&str> for Metadatum {
    fn from(text: &str) -> Self {
        Self::new_string(text)
    }
}

impl From<String> for Metadatum {
    fn from(text: String) -> Self {
        Self::new_string(text)
    }
}

impl From<Buffer> for Metadatum {
    fn from(bytes: Buffer) -> Self {
        Self::new_bytes(bytes)
    }
}

impl From<MetadatumList> for Metadatum {
    fn from(list: MetadatumList) -> Self {
        Self::new_list(list)
    }
}

impl From<MetadatumMap> for Metadatum {
    fn from(map: MetadatumMap) -> Self {
        Self::new_map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardano_sdk_core::DecodeLimits;

    fn decode(hex: &str) -> Metadatum {
        Metadatum::from_cbor_hex(hex).unwrap()
    }

    #[test]
    fn test_text_roundtrip() {
        let data = decode("6568656c6c6f");
        assert_eq!(data.to_text().unwrap(), "hello");
        assert_eq!(data.to_cbor_hex().unwrap(), "6568656c6c6f");
    }

    #[test]
    fn test_chunked_text_keeps_original_bytes() {
        // (_ "he", "llo")
        let hex = "7f626865636c6c6fff";
        let data = decode(hex);
        assert_eq!(data.to_text().unwrap(), "hello");
        assert_eq!(data.to_cbor_hex().unwrap(), hex);

        data.clear_encoded_cache();
        assert_eq!(data.to_cbor_hex().unwrap(), "6568656c6c6f");
    }

    #[test]
    fn test_long_text_is_chunked() {
        let text = "é".repeat(40);
        let data = Metadatum::new_string(text.clone());
        let bytes = data.to_cbor_bytes().unwrap();

        assert_eq!(bytes[0], 0x7f);
        assert_eq!(&bytes[1..3], &[0x78, 0x40]);
        assert_eq!(*bytes.last().unwrap(), 0xff);
        assert_eq!(Metadatum::from_cbor_bytes(&bytes).unwrap().to_text().unwrap(), text);
    }

    #[test]
    fn test_integers_and_bignums() {
        assert_eq!(decode("00").to_integer().unwrap(), BigInt::from(0));
        assert_eq!(decode("20").to_integer().unwrap(), BigInt::from(-1));
        assert_eq!(
            decode("c349010000000000000000").to_integer().unwrap(),
            -(BigInt::from(u64::MAX) + 2u32)
        );
    }

    #[test]
    fn test_chunked_bignums_decode() {
        // -(2^600) carries 2^600 - 1: seventy-five 0xff bytes split 64 + 11
        let value = -(BigInt::from(1) << 600usize);
        let bytes = Metadatum::new_integer(value.clone()).to_cbor_bytes().unwrap();
        assert_eq!(&bytes[..4], &[0xc3, 0x5f, 0x58, 0x40]);
        assert_eq!(bytes[4 + 64], 0x4b);
        assert_eq!(bytes.len(), 81);

        let decoded = Metadatum::from_cbor_bytes(&bytes).unwrap();
        assert_eq!(decoded.to_integer().unwrap(), value);
        assert_eq!(decoded.to_cbor_bytes().unwrap(), bytes);
        decoded.clear_encoded_cache();
        assert_eq!(decoded.to_cbor_bytes().unwrap(), bytes);

        let positive = Metadatum::from_cbor_bytes(
            &Metadatum::new_integer(BigInt::from(1) << 600usize)
                .to_cbor_bytes()
                .unwrap(),
        )
        .unwrap();
        assert_eq!(positive.to_integer().unwrap(), BigInt::from(1) << 600usize);
    }

    #[test]
    fn test_constructor_tags_rejected() {
        for hex in ["d87980", "d8669f0080ff", "d81e00"] {
            let err = Metadatum::from_cbor_hex(hex).unwrap_err();
            assert!(err.is_decoding(), "{} gave {:?}", hex, err);
        }
    }

    #[test]
    fn test_floats_and_simple_values_rejected() {
        for hex in ["f4", "f6", "fb3ff0000000000000"] {
            assert!(Metadatum::from_cbor_hex(hex).unwrap_err().is_decoding());
        }
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        assert!(Metadatum::from_cbor_hex("62c328").is_err());
    }

    #[test]
    fn test_kind_exclusivity() {
        let text = Metadatum::from("x");
        assert!(text.to_text().is_ok());
        assert!(text.to_bytes().is_err());
        assert!(text.to_integer().is_err());
        assert!(text.to_list().is_err());
        assert_eq!(
            text.to_map().unwrap_err(),
            CodecError::TypeConversion {
                expected: "Map",
                actual: "Text"
            }
        );
    }

    #[test]
    fn test_nesting_limit() {
        let mut bytes = vec![0x81; 20];
        bytes.push(0x60);
        let err = Metadatum::from_cbor_bytes_with(&bytes, DecodeLimits::with_max_depth(8))
            .unwrap_err();
        assert_eq!(err, CodecError::NestingTooDeep { limit: 8 });
    }

    #[test]
    fn test_equality_ignores_cache() {
        assert_eq!(decode("7f6161ff"), Metadatum::from("a"));
        assert_ne!(Metadatum::from("a"), Metadatum::new_bytes(b"a".to_vec()));
    }
}
