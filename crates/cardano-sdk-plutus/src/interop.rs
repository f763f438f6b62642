//! Conversion to and from [`ciborium::value::Value`].
//!
//! The converted tree carries the same items our writer would emit, but
//! ciborium decides the framing when serializing it: lengths are always
//! definite and long strings are not chunked.

use ciborium::value::{Integer, Value};
use num_bigint::BigInt;

use cardano_sdk_core::bigint::{
    bignum_parts, from_bignum, magnitude_bits, NEGATIVE_BIGNUM_TAG, UNSIGNED_BIGNUM_TAG,
};
use cardano_sdk_core::{CodecError, Result};

use crate::constr::{alternative_from_tag, tag_for_alternative, ConstrPlutusData, GENERAL_FORM_TAG};
use crate::list::PlutusList;
use crate::map::PlutusMap;
use crate::plutus_data::{PlutusData, PlutusDataValue};

fn unsupported(what: impl Into<String>) -> CodecError {
    CodecError::Decoding(what.into())
}

/// Same split as the writer: magnitudes up to 64 bits stay native, wider
/// ones become a bignum tag.
pub(crate) fn integer_to_value(n: &BigInt) -> Value {
    if magnitude_bits(n) <= 64 {
        if let Some(native) = i128::try_from(n).ok().and_then(|n| Integer::try_from(n).ok()) {
            return Value::Integer(native);
        }
    }
    let (tag, content) = bignum_parts(n);
    Value::Tag(tag, Box::new(Value::Bytes(content)))
}

pub(crate) fn bignum_from_value(tag: u64, content: &Value) -> Result<BigInt> {
    match content {
        Value::Bytes(bytes) => from_bignum(tag, bytes),
        _ => Err(unsupported(format!("tag {} must wrap a byte string", tag))),
    }
}

fn list_from_values(values: &[Value]) -> Result<PlutusList> {
    values.iter().map(PlutusData::try_from).collect()
}

fn fields_from_value(value: &Value) -> Result<PlutusList> {
    match value {
        Value::Array(values) => list_from_values(values),
        _ => Err(unsupported("constructor fields must be an array")),
    }
}

impl PlutusData {
    /// Convert to a ciborium value tree.
    pub fn to_cbor_value(&self) -> Value {
        match self.as_value() {
            PlutusDataValue::Constr(constr) => constr_to_value(constr),
            PlutusDataValue::Map(map) => Value::Map(
                map.to_vec()
                    .iter()
                    .map(|(k, v)| (k.to_cbor_value(), v.to_cbor_value()))
                    .collect(),
            ),
            PlutusDataValue::List(list) => {
                Value::Array(list.to_vec().iter().map(Self::to_cbor_value).collect())
            }
            PlutusDataValue::Integer(n) => integer_to_value(n),
            PlutusDataValue::Bytes(bytes) => Value::Bytes(bytes.to_vec()),
        }
    }
}

fn constr_to_value(constr: &ConstrPlutusData) -> Value {
    let fields = Value::Array(
        constr
            .fields()
            .to_vec()
            .iter()
            .map(PlutusData::to_cbor_value)
            .collect(),
    );
    match tag_for_alternative(constr.alternative()) {
        Some(tag) => Value::Tag(tag, Box::new(fields)),
        None => Value::Tag(
            GENERAL_FORM_TAG,
            Box::new(Value::Array(vec![
                Value::Integer(Integer::from(constr.alternative())),
                fields,
            ])),
        ),
    }
}

impl TryFrom<&Value> for PlutusData {
    type Error = CodecError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Integer(n) => Ok(Self::new_integer(BigInt::from(i128::from(*n)))),
            Value::Bytes(bytes) => Ok(Self::new_bytes(bytes.clone())),
            Value::Array(values) => Ok(Self::new_list(list_from_values(values)?)),
            Value::Map(entries) => {
                let map = PlutusMap::new();
                for (k, v) in entries {
                    map.insert(Self::try_from(k)?, Self::try_from(v)?);
                }
                Ok(Self::new_map(map))
            }
            Value::Tag(tag, inner) if *tag == UNSIGNED_BIGNUM_TAG || *tag == NEGATIVE_BIGNUM_TAG => {
                Ok(Self::new_integer(bignum_from_value(*tag, inner)?))
            }
            Value::Tag(tag, inner) => {
                if let Some(alternative) = alternative_from_tag(*tag) {
                    let fields = fields_from_value(inner)?;
                    return Ok(Self::new_constr(ConstrPlutusData::new(alternative, fields)));
                }
                if *tag != GENERAL_FORM_TAG {
                    return Err(unsupported(format!("unrecognized tag {} for plutus data", tag)));
                }
                match inner.as_ref() {
                    Value::Array(parts) if parts.len() == 2 => {
                        let alternative = match &parts[0] {
                            Value::Integer(n) => u64::try_from(*n).map_err(|_| {
                                unsupported("constructor alternative must be unsigned")
                            })?,
                            _ => return Err(unsupported("constructor alternative must be an integer")),
                        };
                        let fields = fields_from_value(&parts[1])?;
                        Ok(Self::new_constr(ConstrPlutusData::new(alternative, fields)))
                    }
                    _ => Err(unsupported("general constructor form needs [alternative, fields]")),
                }
            }
            other => Err(unsupported(format!("{:?} is not plutus data", other))),
        }
    }
}

impl TryFrom<Value> for PlutusData {
    type Error = CodecError;

    fn try_from(value: Value) -> Result<Self> {
        Self::try_from(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardano_sdk_core::{Buffer, EncodedCache, FromCbor, ToCbor};

    fn ciborium_decode(bytes: &[u8]) -> Value {
        ciborium::de::from_reader(bytes).unwrap()
    }

    fn ciborium_encode(value: &Value) -> Vec<u8> {
        let mut out = Vec::new();
        ciborium::ser::into_writer(value, &mut out).unwrap();
        out
    }

    #[test]
    fn test_ciborium_reads_our_encoding() {
        let data = PlutusData::from_cbor_hex("d8799f0a4201029f03ffa10405ff").unwrap();
        data.clear_encoded_cache();
        let ours = data.to_cbor_bytes().unwrap();

        assert_eq!(ciborium_decode(&ours), data.to_cbor_value());
    }

    #[test]
    fn test_we_read_ciborium_encoding() {
        let value = Value::Tag(
            1281,
            Box::new(Value::Array(vec![
                Value::Integer(Integer::from(-5)),
                Value::Map(vec![(Value::Bytes(vec![1]), Value::Array(vec![]))]),
            ])),
        );
        let bytes = ciborium_encode(&value);

        let decoded = PlutusData::from_cbor_bytes(&bytes).unwrap();
        assert_eq!(decoded, PlutusData::try_from(&value).unwrap());
        assert_eq!(decoded.to_constr().unwrap().alternative(), 8);
        assert_eq!(decoded.to_cbor_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_bignum_value() {
        let n = BigInt::from(u64::MAX) * 4u32;
        let value = PlutusData::new_integer(n.clone()).to_cbor_value();
        assert!(matches!(value, Value::Tag(2, _)));
        assert_eq!(PlutusData::try_from(&value).unwrap().to_integer().unwrap(), n);

        let small = PlutusData::from(-3i64).to_cbor_value();
        assert_eq!(small, Value::Integer(Integer::from(-3)));
    }

    #[test]
    fn test_integer_form_matches_writer() {
        let below = -(BigInt::from(1) << 64usize);
        let value = PlutusData::new_integer(below.clone()).to_cbor_value();
        assert!(matches!(value, Value::Tag(3, _)));
        assert_eq!(Buffer::from(ciborium_encode(&value)).to_hex(), "c348ffffffffffffffff");

        let edges = [
            below,
            BigInt::from(1) << 64usize,
            BigInt::from(u64::MAX),
            -BigInt::from(u64::MAX),
            BigInt::from(i64::MIN),
        ];
        for n in edges {
            let data = PlutusData::new_integer(n.clone());
            assert_eq!(
                ciborium_encode(&data.to_cbor_value()),
                data.to_cbor_bytes().unwrap(),
                "{}",
                n
            );
        }

        let top = PlutusData::new_integer(BigInt::from(u64::MAX)).to_cbor_value();
        assert_eq!(top, Value::Integer(Integer::from(u64::MAX)));
    }

    #[test]
    fn test_general_form_value() {
        let constr = PlutusData::new_constr(ConstrPlutusData::new(500, PlutusList::new()));
        let value = constr.to_cbor_value();
        assert_eq!(PlutusData::try_from(value).unwrap(), constr);
    }

    #[test]
    fn test_rejects_foreign_items() {
        assert!(PlutusData::try_from(&Value::Text("x".into())).is_err());
        assert!(PlutusData::try_from(&Value::Null).is_err());
        assert!(PlutusData::try_from(&Value::Tag(30, Box::new(Value::Null))).is_err());
    }
}
