//! Plutus Data: the structured value passed to and from smart contracts.
//!
//! A [`PlutusData`] is one of five kinds: a constructor application, a map,
//! a list, an integer, or a byte string. Values decoded from CBOR remember
//! their exact original bytes and replay them when re-encoded.

use std::cell::RefCell;
use std::fmt;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use cardano_sdk_core::bigint::{parse_integer, NEGATIVE_BIGNUM_TAG, UNSIGNED_BIGNUM_TAG};
use cardano_sdk_core::{
    Buffer, CborReader, CborReaderState, CborWriter, CodecError, EncodedCache, FromCbor, Object,
    Result, Shared, ToCbor,
};

use crate::constr::ConstrPlutusData;
use crate::list::PlutusList;
use crate::map::PlutusMap;

/// Discriminant of a [`PlutusData`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlutusDataKind {
    Constr,
    Map,
    List,
    Integer,
    Bytes,
}

impl PlutusDataKind {
    pub fn name(self) -> &'static str {
        match self {
            PlutusDataKind::Constr => "Constr",
            PlutusDataKind::Map => "Map",
            PlutusDataKind::List => "List",
            PlutusDataKind::Integer => "Integer",
            PlutusDataKind::Bytes => "Bytes",
        }
    }
}

impl fmt::Display for PlutusDataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The payload of a [`PlutusData`] value.
#[derive(Debug, Clone, PartialEq)]
pub enum PlutusDataValue {
    Constr(ConstrPlutusData),
    Map(PlutusMap),
    List(PlutusList),
    Integer(BigInt),
    Bytes(Buffer),
}

impl PlutusDataValue {
    pub fn kind(&self) -> PlutusDataKind {
        match self {
            PlutusDataValue::Constr(_) => PlutusDataKind::Constr,
            PlutusDataValue::Map(_) => PlutusDataKind::Map,
            PlutusDataValue::List(_) => PlutusDataKind::List,
            PlutusDataValue::Integer(_) => PlutusDataKind::Integer,
            PlutusDataValue::Bytes(_) => PlutusDataKind::Bytes,
        }
    }
}

struct PlutusDataCell {
    value: PlutusDataValue,
    cache: RefCell<Option<Buffer>>,
}

/// A shared Plutus Data value.
///
/// Cloning takes another handle to the same value. The kind and payload are
/// fixed at construction; maps, lists and constructors inside it can be
/// mutated through their own handles.
#[derive(Clone)]
pub struct PlutusData {
    inner: Object<PlutusDataCell>,
}

impl PlutusData {
    fn from_parts(value: PlutusDataValue, cache: Option<Buffer>) -> Self {
        Self {
            inner: Object::new(PlutusDataCell {
                value,
                cache: RefCell::new(cache),
            }),
        }
    }

    /// Wrap a payload. Programmatic values carry no cached encoding.
    pub fn new(value: PlutusDataValue) -> Self {
        Self::from_parts(value, None)
    }

    pub fn new_constr(constr: ConstrPlutusData) -> Self {
        Self::new(PlutusDataValue::Constr(constr))
    }

    pub fn new_map(map: PlutusMap) -> Self {
        Self::new(PlutusDataValue::Map(map))
    }

    pub fn new_list(list: PlutusList) -> Self {
        Self::new(PlutusDataValue::List(list))
    }

    pub fn new_integer(value: BigInt) -> Self {
        Self::new(PlutusDataValue::Integer(value))
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
        Self::new(PlutusDataValue::Bytes(bytes.into()))
    }

    pub fn new_bytes_from_hex(s: &str) -> Result<Self> {
        Ok(Self::new_bytes(Buffer::from_hex(s)?))
    }

    pub fn kind(&self) -> PlutusDataKind {
        self.inner.value.kind()
    }

    /// Borrow the payload.
    pub fn as_value(&self) -> &PlutusDataValue {
        &self.inner.value
    }

    fn mismatch(&self, expected: PlutusDataKind) -> CodecError {
        CodecError::TypeConversion {
            expected: expected.name(),
            actual: self.kind().name(),
        }
    }

    pub fn to_constr(&self) -> Result<ConstrPlutusData> {
        match &self.inner.value {
            PlutusDataValue::Constr(constr) => Ok(constr.clone()),
            _ => Err(self.mismatch(PlutusDataKind::Constr)),
        }
    }

    pub fn to_map(&self) -> Result<PlutusMap> {
        match &self.inner.value {
            PlutusDataValue::Map(map) => Ok(map.clone()),
            _ => Err(self.mismatch(PlutusDataKind::Map)),
        }
    }

    pub fn to_list(&self) -> Result<PlutusList> {
        match &self.inner.value {
            PlutusDataValue::List(list) => Ok(list.clone()),
            _ => Err(self.mismatch(PlutusDataKind::List)),
        }
    }

    pub fn to_integer(&self) -> Result<BigInt> {
        match &self.inner.value {
            PlutusDataValue::Integer(n) => Ok(n.clone()),
            _ => Err(self.mismatch(PlutusDataKind::Integer)),
        }
    }

    pub fn to_bytes(&self) -> Result<Buffer> {
        match &self.inner.value {
            PlutusDataValue::Bytes(bytes) => Ok(bytes.clone()),
            _ => Err(self.mismatch(PlutusDataKind::Bytes)),
        }
    }

    /// Whether two handles point at the same value.
    pub fn ptr_eq(&self, other: &PlutusData) -> bool {
        Object::ptr_eq(&self.inner, &other.inner)
    }

    fn decode_value(reader: &mut CborReader) -> Result<Self> {
        let raw = reader.clone().read_encoded_value()?;

        let value = match reader.peek_state()? {
            CborReaderState::Tag => {
                let tag = reader.peek_tag()?;
                if tag == UNSIGNED_BIGNUM_TAG || tag == NEGATIVE_BIGNUM_TAG {
                    PlutusDataValue::Integer(reader.read_bigint()?)
                } else {
                    PlutusDataValue::Constr(ConstrPlutusData::from_cbor(reader)?)
                }
            }
            CborReaderState::UnsignedInteger => {
                PlutusDataValue::Integer(BigInt::from(reader.read_uint()?))
            }
            CborReaderState::NegativeInteger => {
                PlutusDataValue::Integer(BigInt::from(reader.read_int()?))
            }
            CborReaderState::ByteString | CborReaderState::StartIndefiniteLengthByteString => {
                PlutusDataValue::Bytes(Buffer::from_vec(reader.read_bytestring()?))
            }
            CborReaderState::StartArray => PlutusDataValue::List(PlutusList::from_cbor(reader)?),
            CborReaderState::StartMap => PlutusDataValue::Map(PlutusMap::from_cbor(reader)?),
            other => {
                return Err(reader.fail(format!(
                    "unexpected {:?} while decoding plutus data",
                    other
                )))
            }
        };

        Ok(Self::from_parts(value, Some(raw)))
    }
}

impl FromCbor for PlutusData {
    fn from_cbor(reader: &mut CborReader) -> Result<Self> {
        reader.enter_nested()?;
        let decoded = Self::decode_value(reader);
        reader.exit_nested();
        decoded
    }
}

impl ToCbor for PlutusData {
    fn to_cbor(&self, writer: &mut CborWriter) -> Result<()> {
        if let Some(raw) = self.inner.cache.borrow().as_ref() {
            writer.write_encoded(raw.as_slice());
            return Ok(());
        }

        match &self.inner.value {
            PlutusDataValue::Constr(constr) => constr.to_cbor(writer),
            PlutusDataValue::Map(map) => map.to_cbor(writer),
            PlutusDataValue::List(list) => list.to_cbor(writer),
            PlutusDataValue::Integer(n) => writer.write_bigint(n),
            PlutusDataValue::Bytes(bytes) => {
                writer.write_bounded_bytestring(bytes.as_slice());
                Ok(())
            }
        }
    }
}

impl EncodedCache for PlutusData {
    fn clear_encoded_cache(&self) {
        self.inner.cache.replace(None);
        match &self.inner.value {
            PlutusDataValue::Constr(constr) => constr.clear_encoded_cache(),
            PlutusDataValue::Map(map) => map.clear_encoded_cache(),
            PlutusDataValue::List(list) => list.clear_encoded_cache(),
            PlutusDataValue::Integer(_) | PlutusDataValue::Bytes(_) => {}
        }
    }

    fn encoded_cache(&self) -> Option<Buffer> {
        self.inner.cache.borrow().clone()
    }
}

impl Shared for PlutusData {
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

/// Equality compares kind and payload; cached encodings are ignored.
impl PartialEq for PlutusData {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.inner.value == other.inner.value
    }
}

impl fmt::Debug for PlutusData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.value {
            PlutusDataValue::Constr(constr) => constr.fmt(f),
            PlutusDataValue::Map(map) => map.fmt(f),
            PlutusDataValue::List(list) => list.fmt(f),
            PlutusDataValue::Integer(n) => write!(f, "Integer({})", n),
            PlutusDataValue::Bytes(bytes) => write!(f, "Bytes({})", bytes.to_hex()),
        }
    }
}

impl From<BigInt> for PlutusData {
    fn from(value: BigInt) -> Self {
        Self::new_integer(value)
    }
}

impl From<u64> for PlutusData {
    fn from(value: u64) -> Self {
        Self::new_integer_from_u64(value)
    }
}

impl From<i64> for PlutusData {
    fn from(value: i64) -> Self {
        Self::new_integer_from_i64(value)
    }
}

impl From<Buffer> for PlutusData {
    fn from(bytes: Buffer) -> Self {
        Self::new_bytes(bytes)
    }
}

impl From<PlutusList> for PlutusData {
    fn from(list: PlutusList) -> Self {
        Self::new_list(list)
    }
}

impl From<PlutusMap> for PlutusData {
    fn from(map: PlutusMap) -> Self {
        Self::new_map(map)
    }
}

impl From<ConstrPlutusData> for PlutusData {
    fn from(constr: ConstrPlutusData) -> Self {
        Self::new_constr(constr)
    }
}
