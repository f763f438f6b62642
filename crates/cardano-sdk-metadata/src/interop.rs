//! Conversion to and from [`ciborium::value::Value`].

use ciborium::value::{Integer, Value};
use num_bigint::BigInt;

use cardano_sdk_core::bigint::{
    bignum_parts, from_bignum, magnitude_bits, NEGATIVE_BIGNUM_TAG, UNSIGNED_BIGNUM_TAG,
};
use cardano_sdk_core::{CodecError, Result};

use crate::list::MetadatumList;
use crate::map::MetadatumMap;
use crate::metadatum::{Metadatum, MetadatumValue};
use crate::transaction_metadata::TransactionMetadata;

fn unsupported(what: impl Into<String>) -> CodecError {
    CodecError::Decoding(what.into())
}

/// Same split as the writer: magnitudes up to 64 bits stay native, wider
/// ones become a bignum tag.
fn integer_to_value(n: &BigInt) -> Value {
    if magnitude_bits(n) <= 64 {
        if let Some(native) = i128::try_from(n).ok().and_then(|n| Integer::try_from(n).ok()) {
            return Value::Integer(native);
        }
    }
    let (tag, content) = bignum_parts(n);
    Value::Tag(tag, Box::new(Value::Bytes(content)))
}

impl Metadatum {
    pub fn to_cbor_value(&self) -> Value {
        match self.as_value() {
            MetadatumValue::Map(map) => Value::Map(
                map.to_vec()
                    .iter()
                    .map(|(k, v)| (k.to_cbor_value(), v.to_cbor_value()))
                    .collect(),
            ),
            MetadatumValue::List(list) => {
                Value::Array(list.to_vec().iter().map(Self::to_cbor_value).collect())
            }
            MetadatumValue::Integer(n) => integer_to_value(n),
            MetadatumValue::Bytes(bytes) => Value::Bytes(bytes.to_vec()),
            MetadatumValue::Text(text) => Value::Text(text.clone()),
        }
    }
}

impl TryFrom<&Value> for Metadatum {
    type Error = CodecError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Integer(n) => Ok(Self::new_integer(BigInt::from(i128::from(*n)))),
            Value::Bytes(bytes) => Ok(Self::new_bytes(bytes.clone())),
            Value::Text(text) => Ok(Self::new_string(text.clone())),
            Value::Array(values) => Ok(Self::new_list(
                values
                    .iter()
                    .map(Self::try_from)
                    .collect::<Result<MetadatumList>>()?,
            )),
            Value::Map(entries) => {
                let map = MetadatumMap::new();
                for (k, v) in entries {
                    map.insert(Self::try_from(k)?, Self::try_from(v)?);
                }
                Ok(Self::new_map(map))
            }
            Value::Tag(tag, inner) if *tag == UNSIGNED_BIGNUM_TAG || *tag == NEGATIVE_BIGNUM_TAG => {
                match inner.as_ref() {
                    Value::Bytes(content) => Ok(Self::new_integer(from_bignum(*tag, content)?)),
                    _ => Err(unsupported(format!("tag {} must wrap a byte string", tag))),
                }
            }
            Value::Tag(tag, _) => Err(unsupported(format!(
                "tag {} is not allowed in metadata",
                tag
            ))),
            other => Err(unsupported(format!("{:?} is not a metadatum", other))),
        }
    }
}

impl TryFrom<Value> for Metadatum {
    type Error = CodecError;

    fn try_from(value: Value) -> Result<Self> {
        Self::try_from(&value)
    }
}

impl TransactionMetadata {
    pub fn to_cbor_value(&self) -> Value {
        Value::Map(
            self.to_vec()
                .iter()
                .map(|(label, datum)| {
                    (Value::Integer(Integer::from(*label)), datum.to_cbor_value())
                })
                .collect(),
        )
    }
}

impl TryFrom<&Value> for TransactionMetadata {
    type Error = CodecError;

    fn try_from(value: &Value) -> Result<Self> {
        let Value::Map(entries) = value else {
            return Err(unsupported("transaction metadata must be a map"));
        };
        let metadata = TransactionMetadata::new();
        for (label, datum) in entries {
            let label = match label {
                Value::Integer(n) => u64::try_from(*n)
                    .map_err(|_| unsupported("metadata labels must be unsigned"))?,
                _ => return Err(unsupported("metadata labels must be integers")),
            };
            metadata.insert(label, Metadatum::try_from(datum)?);
        }
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardano_sdk_core::{Buffer, FromCbor, ToCbor};

    #[test]
    fn test_ciborium_agrees_on_definite_encoding() {
        let metadata =
            TransactionMetadata::from_cbor_hex("a11902d1a1646e616d6565546f6b656e").unwrap();

        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&metadata.to_cbor_value(), &mut bytes).unwrap();
        assert_eq!(bytes, metadata.to_cbor_bytes().unwrap());

        let value: Value = ciborium::de::from_reader(bytes.as_slice()).unwrap();
        assert_eq!(TransactionMetadata::try_from(&value).unwrap(), metadata);
    }

    #[test]
    fn test_bignum_and_text() {
        let n = -(BigInt::from(u64::MAX) * 3u32);
        let datum = Metadatum::new_integer(n.clone());
        let value = datum.to_cbor_value();
        assert!(matches!(value, Value::Tag(3, _)));
        assert_eq!(Metadatum::try_from(value).unwrap().to_integer().unwrap(), n);

        let text = Metadatum::from("ok").to_cbor_value();
        assert_eq!(text, Value::Text("ok".into()));
    }

    #[test]
    fn test_integer_form_matches_writer() {
        for (n, hex) in [
            (-(BigInt::from(1) << 64usize), "c348ffffffffffffffff"),
            (-BigInt::from(u64::MAX), "3bfffffffffffffffe"),
            (BigInt::from(1) << 64usize, "c249010000000000000000"),
        ] {
            let datum = Metadatum::new_integer(n);
            let mut bytes = Vec::new();
            ciborium::ser::into_writer(&datum.to_cbor_value(), &mut bytes).unwrap();
            assert_eq!(Buffer::from(bytes.as_slice()).to_hex(), hex);
            assert_eq!(bytes, datum.to_cbor_bytes().unwrap());
        }
    }

    #[test]
    fn test_rejects_tags_and_floats() {
        assert!(Metadatum::try_from(&Value::Tag(121, Box::new(Value::Array(vec![])))).is_err());
        assert!(Metadatum::try_from(&Value::Float(1.0)).is_err());
        assert!(TransactionMetadata::try_from(&Value::Array(vec![])).is_err());
    }
}
