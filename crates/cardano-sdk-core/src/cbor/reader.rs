//! Cursor-based CBOR decoder.

use bytes::Bytes;
use num_bigint::BigInt;

use super::{
    CborReaderState, BREAK, INDEFINITE, MAJOR_ARRAY, MAJOR_BYTES, MAJOR_MAP, MAJOR_NEGATIVE,
    MAJOR_SIMPLE, MAJOR_TAG, MAJOR_TEXT, MAJOR_UNSIGNED,
};
use crate::bigint::{from_bignum, NEGATIVE_BIGNUM_TAG, UNSIGNED_BIGNUM_TAG};
use crate::buffer::Buffer;
use crate::error::{CodecError, Result};
use crate::limits::DecodeLimits;

/// Reads CBOR items left to right from an owned byte sequence.
///
/// Cloning a reader clones its cursor; the input bytes are shared. A clone
/// can look ahead without moving the original.
#[derive(Debug, Clone)]
pub struct CborReader {
    data: Bytes,
    offset: usize,
    depth: usize,
    limits: DecodeLimits,
    last_error: String,
}

impl CborReader {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            offset: 0,
            depth: 0,
            limits: DecodeLimits::default(),
            last_error: String::new(),
        }
    }

    /// Create a reader over hex-encoded CBOR.
    pub fn from_hex(s: &str) -> Result<Self> {
        Ok(Self::new(hex::decode(s)?))
    }

    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    /// Byte offset of the cursor.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }

    /// Current structured-value nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// A preallocation size for `len` declared elements that cannot exceed
    /// the input actually available.
    pub fn bounded_capacity(&self, len: u64) -> usize {
        usize::try_from(len).map_or(self.remaining(), |n| n.min(self.remaining()))
    }

    pub fn set_last_error(&mut self, message: &str) {
        self.last_error = message.to_string();
    }

    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    /// Record a decoding failure and build the matching error.
    pub fn fail(&mut self, message: impl Into<String>) -> CodecError {
        let message = message.into();
        tracing::debug!(offset = self.offset, "cbor decode failed: {}", message);
        self.last_error.clone_from(&message);
        CodecError::Decoding(message)
    }

    fn unexpected(&mut self, expected: &str, found: CborReaderState) -> CodecError {
        self.fail(format!(
            "expected {} at offset {}, found {:?}",
            expected, self.offset, found
        ))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Nesting guard
    // ─────────────────────────────────────────────────────────────────────────

    /// Enter one level of structured-value nesting.
    ///
    /// Fails closed once [`DecodeLimits::max_depth`] levels are open.
    pub fn enter_nested(&mut self) -> Result<()> {
        if self.depth >= self.limits.max_depth {
            tracing::warn!(
                limit = self.limits.max_depth,
                offset = self.offset,
                "cbor input nested too deeply"
            );
            self.last_error = format!(
                "nesting exceeds {} levels at offset {}",
                self.limits.max_depth, self.offset
            );
            return Err(CodecError::NestingTooDeep {
                limit: self.limits.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave one level of nesting.
    pub fn exit_nested(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Heads
    // ─────────────────────────────────────────────────────────────────────────

    fn peek_byte(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    fn take(&mut self, len: u64) -> Result<Bytes> {
        let remaining = self.remaining();
        match usize::try_from(len) {
            Ok(n) if n <= remaining => {
                let start = self.offset;
                self.offset += n;
                Ok(self.data.slice(start..self.offset))
            }
            _ => Err(self.fail(format!(
                "unexpected end of input: need {} bytes, {} remaining",
                len, remaining
            ))),
        }
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.take(N as u64)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&bytes);
        Ok(out)
    }

    /// Read an item head. The argument is `None` for an indefinite length
    /// (or a break, for major type 7).
    fn read_head(&mut self) -> Result<(u8, Option<u64>)> {
        let [initial] = self.take_array::<1>()?;
        let major = initial >> 5;
        let info = initial & 0x1f;

        let argument = match info {
            0..=23 => Some(u64::from(info)),
            24 => Some(u64::from(self.take_array::<1>()?[0])),
            25 => Some(u64::from(u16::from_be_bytes(self.take_array()?))),
            26 => Some(u64::from(u32::from_be_bytes(self.take_array()?))),
            27 => Some(u64::from_be_bytes(self.take_array()?)),
            INDEFINITE => None,
            _ => {
                return Err(self.fail(format!(
                    "reserved additional info {} in initial byte 0x{:02x}",
                    info, initial
                )))
            }
        };

        if argument.is_none() && matches!(major, MAJOR_UNSIGNED | MAJOR_NEGATIVE | MAJOR_TAG) {
            return Err(self.fail(format!(
                "major type {} cannot have an indefinite length",
                major
            )));
        }
        Ok((major, argument))
    }

    /// Kind of the next item, without consuming it.
    pub fn peek_state(&mut self) -> Result<CborReaderState> {
        let Some(initial) = self.peek_byte() else {
            return Ok(CborReaderState::Finished);
        };
        let major = initial >> 5;
        let info = initial & 0x1f;

        if (28..=30).contains(&info) {
            return Err(self.fail(format!(
                "reserved additional info {} in initial byte 0x{:02x}",
                info, initial
            )));
        }

        let state = match (major, info) {
            (MAJOR_UNSIGNED, _) => CborReaderState::UnsignedInteger,
            (MAJOR_NEGATIVE, _) => CborReaderState::NegativeInteger,
            (MAJOR_BYTES, INDEFINITE) => CborReaderState::StartIndefiniteLengthByteString,
            (MAJOR_BYTES, _) => CborReaderState::ByteString,
            (MAJOR_TEXT, INDEFINITE) => CborReaderState::StartIndefiniteLengthTextString,
            (MAJOR_TEXT, _) => CborReaderState::TextString,
            (MAJOR_ARRAY, _) => CborReaderState::StartArray,
            (MAJOR_MAP, _) => CborReaderState::StartMap,
            (MAJOR_TAG, _) => CborReaderState::Tag,
            (_, 20 | 21) => CborReaderState::Boolean,
            (_, 22) => CborReaderState::Null,
            (_, 23) => CborReaderState::Undefined,
            (_, 25) => CborReaderState::HalfPrecisionFloat,
            (_, 26) => CborReaderState::SinglePrecisionFloat,
            (_, 27) => CborReaderState::DoublePrecisionFloat,
            (_, INDEFINITE) => CborReaderState::Break,
            _ => CborReaderState::SimpleValue,
        };
        Ok(state)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scalars
    // ─────────────────────────────────────────────────────────────────────────

    /// Read an unsigned integer (major type 0).
    pub fn read_uint(&mut self) -> Result<u64> {
        let state = self.peek_state()?;
        if state != CborReaderState::UnsignedInteger {
            return Err(self.unexpected("unsigned integer", state));
        }
        let (_, argument) = self.read_head()?;
        Ok(argument.unwrap_or_default())
    }

    /// Read an integer of either sign (major type 0 or 1).
    ///
    /// Covers the whole native CBOR range, `-2^64 ..= 2^64 - 1`.
    pub fn read_int(&mut self) -> Result<i128> {
        let state = self.peek_state()?;
        let negative = match state {
            CborReaderState::UnsignedInteger => false,
            CborReaderState::NegativeInteger => true,
            other => return Err(self.unexpected("integer", other)),
        };
        let (_, argument) = self.read_head()?;
        let n = i128::from(argument.unwrap_or_default());
        Ok(if negative { -1 - n } else { n })
    }

    /// Read a native integer or a bignum (tag 2 or 3).
    pub fn read_bigint(&mut self) -> Result<BigInt> {
        let state = self.peek_state()?;
        match state {
            CborReaderState::UnsignedInteger | CborReaderState::NegativeInteger => {
                Ok(BigInt::from(self.read_int()?))
            }
            CborReaderState::Tag => {
                let tag = self.read_tag()?;
                if tag != UNSIGNED_BIGNUM_TAG && tag != NEGATIVE_BIGNUM_TAG {
                    return Err(self.fail(format!("tag {} is not a bignum tag", tag)));
                }
                let content = self.read_bytestring()?;
                from_bignum(tag, &content)
            }
            other => Err(self.unexpected("integer or bignum", other)),
        }
    }

    /// Read a semantic tag (major type 6).
    pub fn read_tag(&mut self) -> Result<u64> {
        let state = self.peek_state()?;
        if state != CborReaderState::Tag {
            return Err(self.unexpected("tag", state));
        }
        let (_, argument) = self.read_head()?;
        Ok(argument.unwrap_or_default())
    }

    /// The next tag's value, without consuming it.
    pub fn peek_tag(&mut self) -> Result<u64> {
        let start = self.offset;
        let tag = self.read_tag();
        self.offset = start;
        tag
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Strings
    // ─────────────────────────────────────────────────────────────────────────

    /// Read a byte string, joining chunks of an indefinite-length one.
    pub fn read_bytestring(&mut self) -> Result<Vec<u8>> {
        let state = self.peek_state()?;
        if !state.is_byte_string() {
            return Err(self.unexpected("byte string", state));
        }
        self.read_string_payload(MAJOR_BYTES)
    }

    /// Read a text string, joining chunks of an indefinite-length one.
    ///
    /// UTF-8 is checked over the joined payload, so chunk boundaries may
    /// fall inside a character.
    pub fn read_textstring(&mut self) -> Result<String> {
        let state = self.peek_state()?;
        if !state.is_text_string() {
            return Err(self.unexpected("text string", state));
        }
        let payload = self.read_string_payload(MAJOR_TEXT)?;
        String::from_utf8(payload).map_err(|e| self.fail(format!("invalid UTF-8 text: {}", e)))
    }

    fn read_string_payload(&mut self, major: u8) -> Result<Vec<u8>> {
        let (_, argument) = self.read_head()?;
        if let Some(len) = argument {
            return Ok(self.take(len)?.to_vec());
        }

        let mut payload = Vec::new();
        loop {
            if self.peek_byte() == Some(BREAK) {
                self.offset += 1;
                return Ok(payload);
            }
            let (chunk_major, chunk_len) = self.read_head()?;
            if chunk_major != major {
                return Err(self.fail(format!(
                    "chunk of major type {} inside string of major type {}",
                    chunk_major, major
                )));
            }
            let Some(len) = chunk_len else {
                return Err(self.fail("nested indefinite-length string chunk"));
            };
            payload.extend_from_slice(&self.take(len)?);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Containers
    // ─────────────────────────────────────────────────────────────────────────

    /// Read an array head. Returns `None` for an indefinite-length array.
    pub fn read_start_array(&mut self) -> Result<Option<u64>> {
        let state = self.peek_state()?;
        if state != CborReaderState::StartArray {
            return Err(self.unexpected("array", state));
        }
        Ok(self.read_head()?.1)
    }

    /// Consume the break closing an indefinite-length array.
    pub fn read_end_array(&mut self) -> Result<()> {
        self.read_break("end of array")
    }

    /// Read a map head. Returns `None` for an indefinite-length map.
    pub fn read_start_map(&mut self) -> Result<Option<u64>> {
        let state = self.peek_state()?;
        if state != CborReaderState::StartMap {
            return Err(self.unexpected("map", state));
        }
        Ok(self.read_head()?.1)
    }

    /// Consume the break closing an indefinite-length map.
    pub fn read_end_map(&mut self) -> Result<()> {
        self.read_break("end of map")
    }

    fn read_break(&mut self, expected: &str) -> Result<()> {
        match self.peek_byte() {
            Some(BREAK) => {
                self.offset += 1;
                Ok(())
            }
            _ => {
                let state = self.peek_state()?;
                Err(self.unexpected(expected, state))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Raw capture
    // ─────────────────────────────────────────────────────────────────────────

    /// Consume the next complete item and return its exact encoded bytes.
    ///
    /// The returned buffer shares storage with the reader's input.
    pub fn read_encoded_value(&mut self) -> Result<Buffer> {
        let start = self.offset;
        self.skip_value()?;
        Ok(Buffer::from(self.data.slice(start..self.offset)))
    }

    /// Skip one complete item without recursing.
    ///
    /// `pending` holds, per open container, the number of items still
    /// expected, or `None` for an indefinite container awaiting its break.
    fn skip_value(&mut self) -> Result<()> {
        let mut pending: Vec<Option<u64>> = vec![Some(1)];

        while let Some(top) = pending.last().copied() {
            match top {
                Some(0) => {
                    pending.pop();
                    continue;
                }
                Some(n) => {
                    if let Some(slot) = pending.last_mut() {
                        *slot = Some(n - 1);
                    }
                }
                None => {
                    if self.peek_byte() == Some(BREAK) {
                        self.offset += 1;
                        pending.pop();
                        continue;
                    }
                }
            }

            let (major, argument) = self.read_head()?;
            match (major, argument) {
                (MAJOR_BYTES | MAJOR_TEXT, Some(len)) => {
                    self.take(len)?;
                }
                (MAJOR_BYTES | MAJOR_TEXT, None) => pending.push(None),
                (MAJOR_ARRAY, count) => pending.push(count),
                (MAJOR_MAP, Some(pairs)) => {
                    let items = pairs
                        .checked_mul(2)
                        .ok_or_else(|| self.fail(format!("map length {} overflows", pairs)))?;
                    pending.push(Some(items));
                }
                (MAJOR_MAP, None) => pending.push(None),
                (MAJOR_TAG, _) => pending.push(Some(1)),
                (MAJOR_SIMPLE, None) => {
                    return Err(self.fail("unexpected break outside indefinite-length item"))
                }
                _ => {}
            }
        }
        Ok(())
    }
}
