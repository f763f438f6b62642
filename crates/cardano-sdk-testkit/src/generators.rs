//! Proptest generators for property-based testing.

use proptest::prelude::*;

use cardano_sdk_core::BigInt;
use cardano_sdk_metadata::{Metadatum, MetadatumList, MetadatumMap, TransactionMetadata};
use cardano_sdk_plutus::{ConstrPlutusData, PlutusData, PlutusList, PlutusMap};

/// Generate an integer: native-range values and bignums well past 64 bits,
/// including ones whose content spans more than one 64-byte chunk.
pub fn integer() -> impl Strategy<Value = BigInt> {
    prop_oneof![
        3 => any::<i64>().prop_map(BigInt::from),
        2 => any::<u64>().prop_map(BigInt::from),
        1 => prop::collection::vec(any::<u8>(), 9..90)
            .prop_map(|bytes| BigInt::from_signed_bytes_be(&bytes)),
    ]
}

/// Generate byte strings of up to `max_len` bytes.
pub fn bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate text, including multi-byte characters and strings long enough
/// to be chunked.
pub fn text() -> impl Strategy<Value = String> {
    "\\PC{0,90}"
}

/// Generate a constructor alternative covering all three tag ranges.
pub fn alternative() -> impl Strategy<Value = u64> {
    prop_oneof![0u64..7, 7u64..128, 128u64..=u64::MAX]
}

/// Generate a Plutus Data tree.
pub fn plutus_data() -> impl Strategy<Value = PlutusData> {
    let leaf = prop_oneof![
        integer().prop_map(PlutusData::new_integer),
        bytes(150).prop_map(PlutusData::new_bytes),
    ];

    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6)
                .prop_map(|items| PlutusData::new_list(PlutusList::from(items))),
            prop::collection::vec((inner.clone(), inner.clone()), 0..4)
                .prop_map(|entries| PlutusData::new_map(entries.into_iter().collect::<PlutusMap>())),
            (alternative(), prop::collection::vec(inner, 0..4)).prop_map(|(alt, fields)| {
                PlutusData::new_constr(ConstrPlutusData::new(alt, PlutusList::from(fields)))
            }),
        ]
    })
}

/// Generate a metadatum tree.
pub fn metadatum() -> impl Strategy<Value = Metadatum> {
    let leaf = prop_oneof![
        integer().prop_map(Metadatum::new_integer),
        bytes(100).prop_map(Metadatum::new_bytes),
        text().prop_map(Metadatum::new_string),
    ];

    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6)
                .prop_map(|items| Metadatum::new_list(MetadatumList::from(items))),
            prop::collection::vec((inner.clone(), inner), 0..4).prop_map(|entries| {
                let map = MetadatumMap::new();
                for (k, v) in entries {
                    map.insert(k, v);
                }
                Metadatum::new_map(map)
            }),
        ]
    })
}

/// Generate transaction metadata with a handful of labels.
pub fn transaction_metadata() -> impl Strategy<Value = TransactionMetadata> {
    prop::collection::vec((any::<u64>(), metadatum()), 0..4)
        .prop_map(|entries| entries.into_iter().collect::<TransactionMetadata>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardano_sdk_core::{CborReader, CborWriter, EncodedCache, FromCbor, ToCbor};

    proptest! {
        #[test]
        fn plutus_data_roundtrip(data in plutus_data()) {
            let bytes = data.to_cbor_bytes().unwrap();
            let decoded = PlutusData::from_cbor_bytes(&bytes).unwrap();

            prop_assert_eq!(&decoded, &data);
            prop_assert_eq!(decoded.to_cbor_bytes().unwrap(), bytes.clone());

            // Built values are already in the writer's form.
            decoded.clear_encoded_cache();
            prop_assert!(!decoded.has_encoded_cache());
            prop_assert_eq!(decoded.to_cbor_bytes().unwrap(), bytes);
        }

        #[test]
        fn plutus_data_json_roundtrip(data in plutus_data()) {
            let json = data.to_json_string();
            prop_assert_eq!(PlutusData::from_json_str(&json).unwrap(), data);
        }

        #[test]
        fn plutus_data_ciborium_roundtrip(data in plutus_data()) {
            prop_assert_eq!(PlutusData::try_from(data.to_cbor_value()).unwrap(), data);
        }

        #[test]
        fn metadatum_roundtrip(datum in metadatum()) {
            let bytes = datum.to_cbor_bytes().unwrap();
            let decoded = Metadatum::from_cbor_bytes(&bytes).unwrap();

            prop_assert_eq!(&decoded, &datum);
            decoded.clear_encoded_cache();
            prop_assert_eq!(decoded.to_cbor_bytes().unwrap(), bytes);
            prop_assert_eq!(Metadatum::from_json(&datum.to_json()).unwrap(), datum);
        }

        #[test]
        fn transaction_metadata_roundtrip(metadata in transaction_metadata()) {
            let bytes = metadata.to_cbor_bytes().unwrap();
            let decoded = TransactionMetadata::from_cbor_bytes(&bytes).unwrap();
            prop_assert_eq!(&decoded, &metadata);
            prop_assert_eq!(decoded.labels(), metadata.labels());
        }

        #[test]
        fn integer_encoding_form(n in integer()) {
            let mut writer = CborWriter::new();
            writer.write_bigint(&n).unwrap();
            let bytes = writer.encode();

            // Major type 6 (tag) only when the magnitude needs more than 64 bits.
            let tagged = bytes[0] >> 5 == 6;
            prop_assert_eq!(tagged, n.bits() > 64);

            let mut reader = CborReader::new(bytes);
            prop_assert_eq!(reader.read_bigint().unwrap(), n);
            prop_assert!(reader.is_finished());
        }
    }
}
