//! The Codec: one entry point for decoding and encoding SDK values.
//!
//! The value crates can be used directly. The codec adds configuration
//! (decode limits, whether to keep original encodings) and logging at the
//! boundary where untrusted bytes come in.

use serde::{Deserialize, Serialize};

use cardano_sdk_core::{CborReader, DecodeLimits, EncodedCache, FromCbor, ToCbor};
use cardano_sdk_metadata::{Metadatum, TransactionMetadata};
use cardano_sdk_plutus::PlutusData;

use crate::error::Result;

/// Configuration for the [`Codec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Limits applied to every decode.
    pub limits: DecodeLimits,
    /// Keep the exact bytes of decoded values so they re-encode verbatim.
    /// When false, decoded values re-encode in the writer's normal form.
    pub preserve_encoding: bool,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            limits: DecodeLimits::default(),
            preserve_encoding: true,
        }
    }
}

impl SdkConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Decodes and encodes Plutus Data and transaction metadata.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: SdkConfig,
}

impl Codec {
    /// Create a codec with the given configuration.
    pub fn new(config: SdkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Decoding
    // ─────────────────────────────────────────────────────────────────────────

    /// Decode any SDK value that must span all of `bytes`.
    pub fn decode<T: FromCbor + EncodedCache>(&self, bytes: &[u8]) -> Result<T> {
        let mut reader = CborReader::new(bytes.to_vec()).with_limits(self.config.limits);

        let value = match T::from_cbor(&mut reader) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    len = bytes.len(),
                    offset = reader.offset(),
                    reason = reader.last_error(),
                    "decode failed: {}",
                    e
                );
                return Err(e.into());
            }
        };

        if !reader.is_finished() {
            let e = reader.fail(format!("{} trailing bytes after value", reader.remaining()));
            tracing::warn!(len = bytes.len(), "decode failed: {}", e);
            return Err(e.into());
        }

        if !self.config.preserve_encoding {
            value.clear_encoded_cache();
        }

        tracing::debug!(len = bytes.len(), "decoded value");
        Ok(value)
    }

    /// Decode any SDK value from hex-encoded CBOR.
    pub fn decode_hex<T: FromCbor + EncodedCache>(&self, s: &str) -> Result<T> {
        let bytes = cardano_sdk_core::Buffer::from_hex(s)?;
        self.decode(bytes.as_slice())
    }

    pub fn decode_plutus_data(&self, bytes: &[u8]) -> Result<PlutusData> {
        self.decode(bytes)
    }

    pub fn decode_metadatum(&self, bytes: &[u8]) -> Result<Metadatum> {
        self.decode(bytes)
    }

    pub fn decode_metadata(&self, bytes: &[u8]) -> Result<TransactionMetadata> {
        self.decode(bytes)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Encoding
    // ─────────────────────────────────────────────────────────────────────────

    pub fn encode<T: ToCbor>(&self, value: &T) -> Result<Vec<u8>> {
        Ok(value.to_cbor_bytes()?)
    }

    pub fn encode_hex<T: ToCbor>(&self, value: &T) -> Result<String> {
        Ok(value.to_cbor_hex()?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // JSON
    // ─────────────────────────────────────────────────────────────────────────

    /// Build Plutus Data from detailed-schema JSON text.
    pub fn plutus_data_from_json(&self, s: &str) -> Result<PlutusData> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        Ok(PlutusData::from_json(&value)?)
    }

    /// Build transaction metadata from `{"<label>": <metadatum>}` JSON text.
    pub fn metadata_from_json(&self, s: &str) -> Result<TransactionMetadata> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        Ok(TransactionMetadata::from_json(&value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdkError;
    use cardano_sdk_core::CodecError;

    #[test]
    fn test_default_config() {
        let config = SdkConfig::default();
        assert!(config.preserve_encoding);
        assert_eq!(config.limits, DecodeLimits::default());
    }

    #[test]
    fn test_config_from_json() {
        let config = SdkConfig::from_json_str(r#"{"limits": {"max_depth": 16}}"#).unwrap();
        assert_eq!(config.limits.max_depth, 16);
        assert!(config.preserve_encoding);

        assert!(matches!(
            SdkConfig::from_json_str("{"),
            Err(SdkError::Json(_))
        ));
    }

    #[test]
    fn test_decode_respects_limits() {
        let codec = Codec::new(SdkConfig {
            limits: DecodeLimits::with_max_depth(2),
            ..SdkConfig::default()
        });
        assert!(codec.decode_plutus_data(&[0x81, 0x00]).is_ok());

        let err = codec.decode_plutus_data(&[0x81, 0x81, 0x00]).unwrap_err();
        assert!(matches!(
            err,
            SdkError::Codec(CodecError::NestingTooDeep { limit: 2 })
        ));
    }

    #[test]
    fn test_normalizing_codec() {
        let codec = Codec::new(SdkConfig {
            preserve_encoding: false,
            ..SdkConfig::default()
        });
        let data: PlutusData = codec.decode_hex("9f1801ff").unwrap();
        assert!(!data.has_encoded_cache());
        assert_eq!(codec.encode_hex(&data).unwrap(), "9f01ff");

        let preserving = Codec::default();
        let data: PlutusData = preserving.decode_hex("9f1801ff").unwrap();
        assert_eq!(preserving.encode_hex(&data).unwrap(), "9f1801ff");
    }

    #[test]
    fn test_trailing_bytes() {
        let err = Codec::default().decode_metadatum(&[0x01, 0x02]).unwrap_err();
        assert!(err.is_decoding());
    }

    #[test]
    fn test_json_entry_points() {
        let codec = Codec::default();
        let data = codec.plutus_data_from_json(r#"{"int": 5}"#).unwrap();
        assert_eq!(codec.encode_hex(&data).unwrap(), "05");

        assert!(matches!(
            codec.plutus_data_from_json("{"),
            Err(SdkError::Json(_))
        ));
        assert!(matches!(
            codec.metadata_from_json(r#"{"x": {"int": 1}}"#),
            Err(SdkError::Codec(CodecError::InvalidArgument(_)))
        ));
    }
}
