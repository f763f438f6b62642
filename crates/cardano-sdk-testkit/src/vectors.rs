//! Golden test vectors for encoding preservation.
//!
//! Each vector pairs an input encoding with the bytes the writer produces
//! once the encoded-form cache is cleared. Inputs that are already in the
//! writer's form have identical `cbor` and `normalized` fields.

use std::fmt::Debug;

use serde::Serialize;

use cardano_sdk_core::{EncodedCache, FromCbor, ToCbor};
use cardano_sdk_metadata::{Metadatum, TransactionMetadata};
use cardano_sdk_plutus::PlutusData;

/// Which value type a vector decodes as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorFamily {
    PlutusData,
    Metadatum,
    TransactionMetadata,
}

/// A golden test vector.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVector {
    pub name: &'static str,
    pub family: VectorFamily,
    /// Input bytes (hex). Decoding then encoding must reproduce them.
    pub cbor: String,
    /// Encoding after [`EncodedCache::clear_encoded_cache`] (hex).
    pub normalized: String,
}

impl GoldenVector {
    fn new(name: &'static str, family: VectorFamily, cbor: &str, normalized: &str) -> Self {
        Self {
            name,
            family,
            cbor: cbor.to_string(),
            normalized: normalized.to_string(),
        }
    }

    fn canonical(name: &'static str, family: VectorFamily, cbor: &str) -> Self {
        Self::new(name, family, cbor, cbor)
    }

    /// Whether the input is already in the writer's form.
    pub fn is_canonical(&self) -> bool {
        self.cbor == self.normalized
    }
}

/// Hex of the bytes `0, 1, 2, ...` wrapped at 256.
fn counting_hex(len: usize) -> String {
    let bytes: Vec<u8> = (0..len).map(|i| i as u8).collect();
    hex::encode(bytes)
}

/// A 130-byte string: definite on input, three chunks once normalized.
fn long_bytes_vector() -> GoldenVector {
    let payload: Vec<u8> = (0..130u8).collect();
    let cbor = format!("5882{}", hex::encode(&payload));
    let normalized = format!(
        "5f5840{}5840{}42{}ff",
        hex::encode(&payload[..64]),
        hex::encode(&payload[64..128]),
        hex::encode(&payload[128..]),
    );
    GoldenVector::new("plutus_bytes_130", VectorFamily::PlutusData, &cbor, &normalized)
}

fn long_text_vector() -> GoldenVector {
    let text = "a".repeat(70);
    let cbor = format!("7846{}", hex::encode(&text));
    let normalized = format!(
        "7f7840{}66{}ff",
        hex::encode(&text[..64]),
        hex::encode(&text[64..])
    );
    GoldenVector::new("metadatum_text_70", VectorFamily::Metadatum, &cbor, &normalized)
}

/// Get all golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    use VectorFamily::*;

    vec![
        // Plutus Data: integers
        GoldenVector::canonical("plutus_int_zero", PlutusData, "00"),
        GoldenVector::canonical("plutus_int_minus_one", PlutusData, "20"),
        GoldenVector::new("plutus_int_wide_head", PlutusData, "190001", "01"),
        GoldenVector::canonical("plutus_int_u64_max", PlutusData, "1bffffffffffffffff"),
        GoldenVector::new("plutus_bignum_small", PlutusData, "c24101", "01"),
        GoldenVector::new(
            "plutus_bignum_fits_u64",
            PlutusData,
            "c248ffffffffffffffff",
            "1bffffffffffffffff",
        ),
        GoldenVector::canonical("plutus_bignum_2_pow_64", PlutusData, "c249010000000000000000"),
        GoldenVector::canonical("plutus_neg_bignum_2_pow_64", PlutusData, "c348ffffffffffffffff"),
        GoldenVector::canonical("plutus_neg_bignum_wide", PlutusData, "c349010000000000000000"),
        // Plutus Data: byte strings
        GoldenVector::canonical("plutus_bytes_empty", PlutusData, "40"),
        GoldenVector::canonical(
            "plutus_bytes_64",
            PlutusData,
            &format!("5840{}", counting_hex(64)),
        ),
        long_bytes_vector(),
        GoldenVector::new("plutus_bytes_chunked_short", PlutusData, "5f4101420203ff", "43010203"),
        // Plutus Data: containers
        GoldenVector::canonical("plutus_list_empty", PlutusData, "80"),
        GoldenVector::new("plutus_list_definite", PlutusData, "83010203", "9f010203ff"),
        GoldenVector::canonical("plutus_list_indefinite", PlutusData, "9f010203ff"),
        GoldenVector::canonical("plutus_map", PlutusData, "a200010142aabb"),
        GoldenVector::new("plutus_map_indefinite", PlutusData, "bf001801ff", "a10001"),
        // Plutus Data: constructors
        GoldenVector::canonical("plutus_constr_0_empty", PlutusData, "d87980"),
        GoldenVector::canonical("plutus_constr_6", PlutusData, "d87f9f00ff"),
        GoldenVector::canonical("plutus_constr_7", PlutusData, "d9050080"),
        GoldenVector::canonical("plutus_constr_8", PlutusData, "d905019f01ff"),
        GoldenVector::canonical("plutus_constr_127", PlutusData, "d9057880"),
        GoldenVector::canonical("plutus_constr_general_128", PlutusData, "d86682188080"),
        GoldenVector::new(
            "plutus_constr_general_indefinite",
            PlutusData,
            "d8669f18c880ff",
            "d8668218c880",
        ),
        GoldenVector::new(
            "plutus_constr_nested_definite",
            PlutusData,
            "d87a82d8798041ff",
            "d87a9fd8798041ffff",
        ),
        // Metadatum
        GoldenVector::canonical("metadatum_text", Metadatum, "6568656c6c6f"),
        GoldenVector::new("metadatum_text_chunked", Metadatum, "7f626865636c6c6fff", "6568656c6c6f"),
        long_text_vector(),
        GoldenVector::new("metadatum_list_indefinite", Metadatum, "9f0102ff", "820102"),
        GoldenVector::canonical("metadatum_map", Metadatum, "a2616101616281430a0b0c"),
        GoldenVector::canonical("metadatum_bignum", Metadatum, "c249010000000000000000"),
        // Transaction metadata
        GoldenVector::canonical(
            "metadata_cip25_name",
            TransactionMetadata,
            "a11902d1a1646e616d6565546f6b656e",
        ),
        GoldenVector::new("metadata_indefinite", TransactionMetadata, "bf0a9f0102ffff", "a10a820102"),
        GoldenVector::canonical("metadata_empty", TransactionMetadata, "a0"),
    ]
}

/// Encoded inputs every decoder must reject, with the family they target.
pub fn rejection_vectors() -> Vec<(&'static str, VectorFamily, &'static str)> {
    use VectorFamily::*;

    vec![
        ("empty_input", PlutusData, ""),
        ("truncated_map", PlutusData, "a20001"),
        ("text_in_plutus", PlutusData, "6161"),
        ("float_in_plutus", PlutusData, "f93c00"),
        ("unknown_tag_in_plutus", PlutusData, "d9ffff80"),
        ("extended_tag_past_range", PlutusData, "d9057980"),
        ("general_constr_wrong_arity", PlutusData, "d866830080"),
        ("trailing_bytes", PlutusData, "0000"),
        ("constr_tag_in_metadatum", Metadatum, "d87980"),
        ("simple_value_in_metadatum", Metadatum, "f5"),
        ("invalid_utf8_text", Metadatum, "62c328"),
        ("negative_label", TransactionMetadata, "a12000"),
        ("text_label", TransactionMetadata, "a1616100"),
        ("duplicate_label", TransactionMetadata, "a201000100"),
    ]
}

fn check<T>(vector: &GoldenVector) -> Result<(), String>
where
    T: FromCbor + ToCbor + EncodedCache + PartialEq + Debug,
{
    let value = T::from_cbor_hex(&vector.cbor).map_err(|e| format!("decode failed: {}", e))?;

    let replayed = value.to_cbor_hex().map_err(|e| e.to_string())?;
    if replayed != vector.cbor {
        return Err(format!("replayed {} instead of input", replayed));
    }

    value.clear_encoded_cache();
    let normalized = value.to_cbor_hex().map_err(|e| e.to_string())?;
    if normalized != vector.normalized {
        return Err(format!(
            "normalized to {}, expected {}",
            normalized, vector.normalized
        ));
    }

    let reparsed = T::from_cbor_hex(&normalized).map_err(|e| format!("re-decode failed: {}", e))?;
    if reparsed != value {
        return Err(format!("{:?} changed after normalizing", value));
    }
    Ok(())
}

/// Check one vector: byte-exact replay, normalized re-encode, and value
/// equality across the two encodings.
pub fn verify_vector(vector: &GoldenVector) -> Result<(), String> {
    match vector.family {
        VectorFamily::PlutusData => check::<PlutusData>(vector),
        VectorFamily::Metadatum => check::<Metadatum>(vector),
        VectorFamily::TransactionMetadata => check::<TransactionMetadata>(vector),
    }
}

/// Decode `hex` as the given family, reporting only whether it succeeded.
pub fn decodes_as(family: VectorFamily, hex: &str) -> bool {
    match family {
        VectorFamily::PlutusData => PlutusData::from_cbor_hex(hex).is_ok(),
        VectorFamily::Metadatum => Metadatum::from_cbor_hex(hex).is_ok(),
        VectorFamily::TransactionMetadata => TransactionMetadata::from_cbor_hex(hex).is_ok(),
    }
}

/// Verify every golden vector.
///
/// Returns `(name, passed, detail)` for each vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| match verify_vector(v) {
            Ok(()) => (v.name.to_string(), true, v.normalized.clone()),
            Err(detail) => (v.name.to_string(), false, detail),
        })
        .collect()
}
