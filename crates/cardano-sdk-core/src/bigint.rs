//! Arbitrary-precision integer helpers.
//!
//! Values use [`num_bigint::BigInt`] directly. This module holds the pieces
//! the wire codec needs: magnitude size and the RFC 8949 bignum mapping
//! (tag 2 carries `n`, tag 3 carries `-1 - n`).

use num_bigint::{BigInt, BigUint, Sign};

use crate::error::{CodecError, Result};

/// Tag for a non-negative bignum.
pub const UNSIGNED_BIGNUM_TAG: u64 = 2;

/// Tag for a negative bignum.
pub const NEGATIVE_BIGNUM_TAG: u64 = 3;

/// Number of bits needed for the magnitude of `value`, ignoring sign.
pub fn magnitude_bits(value: &BigInt) -> u64 {
    value.bits()
}

/// Whether a value is strictly negative.
pub fn is_negative(value: &BigInt) -> bool {
    value.sign() == Sign::Minus
}

/// Split a value into its bignum tag and big-endian content bytes.
pub fn bignum_parts(value: &BigInt) -> (u64, Vec<u8>) {
    if is_negative(value) {
        let encoded = value.magnitude().clone() - 1u32;
        (NEGATIVE_BIGNUM_TAG, encoded.to_bytes_be())
    } else {
        (UNSIGNED_BIGNUM_TAG, value.magnitude().to_bytes_be())
    }
}

/// Rebuild a value from a bignum tag and its big-endian content bytes.
pub fn from_bignum(tag: u64, content: &[u8]) -> Result<BigInt> {
    let magnitude = BigUint::from_bytes_be(content);
    match tag {
        UNSIGNED_BIGNUM_TAG => Ok(BigInt::from(magnitude)),
        NEGATIVE_BIGNUM_TAG => Ok(BigInt::from_biguint(Sign::Minus, magnitude + 1u32)),
        other => Err(CodecError::Decoding(format!(
            "tag {} is not a bignum tag",
            other
        ))),
    }
}

/// Parse an integer written in the given radix (2 to 36).
pub fn parse_integer(text: &str, radix: u32) -> Result<BigInt> {
    if !(2..=36).contains(&radix) {
        return Err(CodecError::InvalidArgument(format!(
            "radix {} outside 2..=36",
            radix
        )));
    }
    BigInt::parse_bytes(text.as_bytes(), radix).ok_or_else(|| {
        CodecError::InvalidArgument(format!("{:?} is not a base-{} integer", text, radix))
    })
}
