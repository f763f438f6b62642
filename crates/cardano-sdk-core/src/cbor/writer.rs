//! Accumulating CBOR encoder.

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use super::{
    BREAK, INDEFINITE, MAJOR_ARRAY, MAJOR_BYTES, MAJOR_MAP, MAJOR_NEGATIVE, MAJOR_TAG,
    MAJOR_TEXT, MAJOR_UNSIGNED, MAX_CHUNK_LEN,
};
use crate::bigint::{bignum_parts, is_negative, magnitude_bits};
use crate::buffer::Buffer;
use crate::error::{CodecError, Result};

/// Accumulates CBOR items into an in-memory buffer.
#[derive(Debug, Default)]
pub struct CborWriter {
    buf: Vec<u8>,
    last_error: String,
}

impl CborWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write an item head with the smallest valid argument encoding.
    fn write_head(&mut self, major: u8, n: u64) {
        let mt = major << 5;
        if n < 24 {
            self.buf.push(mt | (n as u8));
        } else if n <= 0xff {
            self.buf.push(mt | 24);
            self.buf.push(n as u8);
        } else if n <= 0xffff {
            self.buf.push(mt | 25);
            self.buf.extend_from_slice(&(n as u16).to_be_bytes());
        } else if n <= 0xffff_ffff {
            self.buf.push(mt | 26);
            self.buf.extend_from_slice(&(n as u32).to_be_bytes());
        } else {
            self.buf.push(mt | 27);
            self.buf.extend_from_slice(&n.to_be_bytes());
        }
    }

    fn fail(&mut self, message: String) -> CodecError {
        self.last_error.clone_from(&message);
        CodecError::Encoding(message)
    }

    /// Write an unsigned integer (major type 0).
    pub fn write_uint(&mut self, n: u64) {
        self.write_head(MAJOR_UNSIGNED, n);
    }

    /// Write a signed integer using major type 0 or 1.
    ///
    /// The representable range is `-2^64 ..= 2^64 - 1`.
    pub fn write_signed_int(&mut self, n: i128) -> Result<()> {
        if n >= 0 {
            let value = u64::try_from(n)
                .map_err(|_| self.fail(format!("{} does not fit a CBOR integer", n)))?;
            self.write_head(MAJOR_UNSIGNED, value);
        } else {
            // CBOR encodes -1 as 0, -2 as 1, etc.
            let value = u64::try_from(-1 - n)
                .map_err(|_| self.fail(format!("{} does not fit a CBOR integer", n)))?;
            self.write_head(MAJOR_NEGATIVE, value);
        }
        Ok(())
    }

    /// Write an arbitrary-precision integer.
    ///
    /// Magnitudes of at most 64 bits become native integers. Larger values
    /// become a bignum tag followed by the big-endian content bytes, chunked
    /// like any other long byte string.
    pub fn write_bigint(&mut self, value: &BigInt) -> Result<()> {
        if magnitude_bits(value) <= 64 {
            if is_negative(value) {
                let n = value.to_i128().ok_or_else(|| {
                    self.fail(format!("{} does not fit a native integer", value))
                })?;
                return self.write_signed_int(n);
            }
            let n = value
                .to_u64()
                .ok_or_else(|| self.fail(format!("{} does not fit a native integer", value)))?;
            self.write_uint(n);
            return Ok(());
        }

        let (tag, content) = bignum_parts(value);
        self.write_tag(tag);
        self.write_bounded_bytestring(&content);
        Ok(())
    }

    /// Write a semantic tag (major type 6).
    pub fn write_tag(&mut self, tag: u64) {
        self.write_head(MAJOR_TAG, tag);
    }

    /// Write a definite-length byte string (major type 2).
    pub fn write_bytestring(&mut self, bytes: &[u8]) {
        self.write_head(MAJOR_BYTES, bytes.len() as u64);
        self.buf.extend_from_slice(bytes);
    }

    /// Write a definite-length text string (major type 3).
    pub fn write_textstring(&mut self, text: &str) {
        self.write_head(MAJOR_TEXT, text.len() as u64);
        self.buf.extend_from_slice(text.as_bytes());
    }

    /// Write a byte string, chunking it if longer than [`MAX_CHUNK_LEN`].
    pub fn write_bounded_bytestring(&mut self, bytes: &[u8]) {
        self.write_chunked(MAJOR_BYTES, bytes);
    }

    /// Write a text string, chunking its UTF-8 bytes if longer than
    /// [`MAX_CHUNK_LEN`].
    ///
    /// Chunks split at exact 64-byte boundaries, which may fall inside a
    /// multi-byte character. [`CborReader`](super::CborReader) validates
    /// UTF-8 over the joined chunks.
    pub fn write_bounded_textstring(&mut self, text: &str) {
        self.write_chunked(MAJOR_TEXT, text.as_bytes());
    }

    fn write_chunked(&mut self, major: u8, payload: &[u8]) {
        if payload.len() <= MAX_CHUNK_LEN {
            self.write_head(major, payload.len() as u64);
            self.buf.extend_from_slice(payload);
            return;
        }

        self.buf.push((major << 5) | INDEFINITE);
        for chunk in payload.chunks(MAX_CHUNK_LEN) {
            self.write_head(major, chunk.len() as u64);
            self.buf.extend_from_slice(chunk);
        }
        self.buf.push(BREAK);
    }

    /// Start an array. `None` starts an indefinite-length array.
    pub fn write_start_array(&mut self, len: Option<u64>) {
        match len {
            Some(n) => self.write_head(MAJOR_ARRAY, n),
            None => self.buf.push((MAJOR_ARRAY << 5) | INDEFINITE),
        }
    }

    /// Close an indefinite-length array.
    pub fn write_end_array(&mut self) {
        self.buf.push(BREAK);
    }

    /// Start a map. `None` starts an indefinite-length map.
    pub fn write_start_map(&mut self, len: Option<u64>) {
        match len {
            Some(n) => self.write_head(MAJOR_MAP, n),
            None => self.buf.push((MAJOR_MAP << 5) | INDEFINITE),
        }
    }

    /// Close an indefinite-length map.
    pub fn write_end_map(&mut self) {
        self.buf.push(BREAK);
    }

    /// Append already-encoded CBOR verbatim.
    pub fn write_encoded(&mut self, raw: &[u8]) {
        self.buf.extend_from_slice(raw);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Copy of the bytes written so far.
    pub fn encode(&self) -> Vec<u8> {
        self.buf.clone()
    }

    /// Hex of the bytes written so far.
    pub fn encode_hex(&self) -> String {
        hex::encode(&self.buf)
    }

    /// Copy the bytes written so far into `out`, returning the count.
    pub fn encode_into(&mut self, out: &mut [u8]) -> Result<usize> {
        let needed = self.buf.len();
        if out.len() < needed {
            self.last_error = format!(
                "output buffer holds {} bytes, {} needed",
                out.len(),
                needed
            );
            return Err(CodecError::InsufficientBuffer {
                needed,
                available: out.len(),
            });
        }
        out[..needed].copy_from_slice(&self.buf);
        Ok(needed)
    }

    /// Consume the writer, returning its bytes.
    pub fn into_buffer(self) -> Buffer {
        Buffer::from_vec(self.buf)
    }

    /// Discard everything written so far.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.last_error.clear();
    }

    pub fn set_last_error(&mut self, message: &str) {
        self.last_error = message.to_string();
    }

    pub fn last_error(&self) -> &str {
        &self.last_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut CborWriter)) -> Vec<u8> {
        let mut writer = CborWriter::new();
        f(&mut writer);
        writer.encode()
    }

    #[test]
    fn test_integer_encoding() {
        // Smallest encoding for each argument width
        assert_eq!(written(|w| w.write_uint(0)), vec![0x00]);
        assert_eq!(written(|w| w.write_uint(23)), vec![0x17]);
        assert_eq!(written(|w| w.write_uint(24)), vec![0x18, 24]);
        assert_eq!(written(|w| w.write_uint(255)), vec![0x18, 255]);
        assert_eq!(written(|w| w.write_uint(256)), vec![0x19, 0x01, 0x00]);
        assert_eq!(written(|w| w.write_uint(65535)), vec![0x19, 0xff, 0xff]);
        assert_eq!(
            written(|w| w.write_uint(65536)),
            vec![0x1a, 0x00, 0x01, 0x00, 0x00]
        );
        assert_eq!(
            written(|w| w.write_uint(u64::MAX)),
            vec![0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn test_signed_encoding() {
        assert_eq!(written(|w| w.write_signed_int(-1).unwrap()), vec![0x20]);
        assert_eq!(written(|w| w.write_signed_int(-500).unwrap()), vec![0x39, 0x01, 0xf3]);
        assert_eq!(written(|w| w.write_signed_int(10).unwrap()), vec![0x0a]);

        let min = -(1i128 << 64);
        assert_eq!(
            written(|w| w.write_signed_int(min).unwrap()),
            vec![0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );

        let mut writer = CborWriter::new();
        assert!(writer.write_signed_int(min - 1).is_err());
        assert!(writer.write_signed_int(1i128 << 64).is_err());
        assert!(!writer.last_error().is_empty());
    }

    #[test]
    fn test_bigint_native_range() {
        let out = written(|w| w.write_bigint(&BigInt::from(u64::MAX)).unwrap());
        assert_eq!(out[0], 0x1b);

        let out = written(|w| w.write_bigint(&-(BigInt::from(u64::MAX))).unwrap());
        assert_eq!(out, vec![0x3b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe]);
    }

    #[test]
    fn test_bigint_uses_bignum_tag() {
        let two_pow_64 = BigInt::from(u64::MAX) + 1;
        let out = written(|w| w.write_bigint(&two_pow_64).unwrap());
        assert_eq!(out, vec![0xc2, 0x49, 0x01, 0, 0, 0, 0, 0, 0, 0, 0]);

        let out = written(|w| w.write_bigint(&-two_pow_64.clone()).unwrap());
        // -2^64 has a 65-bit magnitude, carried as 2^64 - 1 under tag 3
        assert_eq!(out, vec![0xc3, 0x48, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_huge_bigint_is_chunked() {
        // 2^520 needs 66 content bytes
        let value = BigInt::from(1) << 520usize;
        let out = written(|w| w.write_bigint(&value).unwrap());
        assert_eq!(out[0], 0xc2);
        assert_eq!(out[1], 0x5f);
        assert_eq!(&out[2..4], &[0x58, 64]);
        assert_eq!(out[4], 0x01);
        assert_eq!(out[4 + 64], 0x42);
        assert_eq!(*out.last().unwrap(), BREAK);
        assert_eq!(out.len(), 2 + 2 + 64 + 1 + 2 + 1);
    }

    #[test]
    fn test_short_strings_are_definite() {
        let payload = vec![0xaa; 64];
        let out = written(|w| w.write_bounded_bytestring(&payload));
        assert_eq!(&out[..2], &[0x58, 64]);
        assert_eq!(out.len(), 66);

        assert_eq!(written(|w| w.write_bounded_textstring("hi")), vec![0x62, b'h', b'i']);
    }

    #[test]
    fn test_long_bytes_are_chunked() {
        let payload: Vec<u8> = (0..130u8).collect();
        let out = written(|w| w.write_bounded_bytestring(&payload));

        assert_eq!(out[0], 0x5f);
        assert_eq!(&out[1..3], &[0x58, 64]);
        assert_eq!(&out[3..67], &payload[..64]);
        assert_eq!(&out[67..69], &[0x58, 64]);
        assert_eq!(&out[69..133], &payload[64..128]);
        assert_eq!(out[133], 0x42);
        assert_eq!(&out[134..136], &payload[128..]);
        assert_eq!(out[136], BREAK);
        assert_eq!(out.len(), 137);
    }

    #[test]
    fn test_exact_multiple_has_no_empty_chunk() {
        let payload = vec![0x11; 128];
        let out = written(|w| w.write_bounded_bytestring(&payload));
        assert_eq!(out.len(), 1 + 2 * (2 + 64) + 1);
        assert_eq!(out[out.len() - 1], BREAK);
    }

    #[test]
    fn test_containers() {
        let out = written(|w| {
            w.write_start_array(None);
            w.write_uint(1);
            w.write_end_array();
            w.write_start_map(Some(0));
            w.write_start_array(Some(2));
        });
        assert_eq!(out, vec![0x9f, 0x01, 0xff, 0xa0, 0x82]);
    }

    #[test]
    fn test_encode_into() {
        let mut writer = CborWriter::new();
        writer.write_textstring("abc");

        let mut small = [0u8; 2];
        assert_eq!(
            writer.encode_into(&mut small),
            Err(CodecError::InsufficientBuffer {
                needed: 4,
                available: 2
            })
        );

        let mut out = [0u8; 8];
        assert_eq!(writer.encode_into(&mut out).unwrap(), 4);
        assert_eq!(&out[..4], &[0x63, b'a', b'b', b'c']);
        assert_eq!(writer.encode_hex(), "63616263");

        writer.reset();
        assert!(writer.is_empty());
    }
}
