//! Test fixtures for common scenarios.

use cardano_sdk::{Codec, DecodeLimits, SdkConfig};
use cardano_sdk_metadata::{Metadatum, MetadatumMap, TransactionMetadata};
use cardano_sdk_plutus::{ConstrPlutusData, PlutusData, PlutusList, PlutusMap};

/// The CIP-25 NFT metadata label.
pub const NFT_METADATA_LABEL: u64 = 721;

/// A codec with preset configuration and panicking decode helpers.
pub struct TestFixture {
    pub codec: Codec,
}

impl TestFixture {
    /// Create a fixture with the default configuration.
    pub fn new() -> Self {
        Self {
            codec: Codec::default(),
        }
    }

    /// Create a fixture whose decodes stop at `max_depth` levels.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            codec: Codec::new(SdkConfig {
                limits: DecodeLimits::with_max_depth(max_depth),
                ..SdkConfig::default()
            }),
        }
    }

    /// Create a fixture that drops original encodings after decoding.
    pub fn normalizing() -> Self {
        Self {
            codec: Codec::new(SdkConfig {
                preserve_encoding: false,
                ..SdkConfig::default()
            }),
        }
    }

    pub fn plutus_data(&self, hex: &str) -> PlutusData {
        self.codec
            .decode_hex(hex)
            .unwrap_or_else(|e| panic!("plutus data {}: {}", hex, e))
    }

    pub fn metadatum(&self, hex: &str) -> Metadatum {
        self.codec
            .decode_hex(hex)
            .unwrap_or_else(|e| panic!("metadatum {}: {}", hex, e))
    }

    pub fn metadata(&self, hex: &str) -> TransactionMetadata {
        self.codec
            .decode_hex(hex)
            .unwrap_or_else(|e| panic!("metadata {}: {}", hex, e))
    }

    pub fn encode_hex(&self, value: &impl cardano_sdk::ToCbor) -> String {
        self.codec
            .encode_hex(value)
            .unwrap_or_else(|e| panic!("encode: {}", e))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Bytes `0, 1, 2, ...` wrapped at 256.
pub fn counting_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}

/// `depth` nested one-element arrays around a zero: `[[...[0]...]]`.
///
/// Decodes as `depth + 1` levels of Plutus Data or metadatum.
pub fn nested_arrays(depth: usize) -> Vec<u8> {
    let mut bytes = vec![0x81; depth];
    bytes.push(0x00);
    bytes
}

/// A datum shaped like a typical script output:
/// `Constr 0 [h'<28 bytes>', 42, Constr 1 [], {h'': 1000000}]`.
pub fn sample_datum() -> PlutusData {
    let value = PlutusMap::new();
    value.insert(
        PlutusData::new_bytes(Vec::new()),
        PlutusData::new_integer_from_u64(1_000_000),
    );

    let fields = PlutusList::from(vec![
        PlutusData::new_bytes(counting_bytes(28)),
        PlutusData::new_integer_from_u64(42),
        PlutusData::new_constr(ConstrPlutusData::new(1, PlutusList::new())),
        PlutusData::new_map(value),
    ]);
    PlutusData::new_constr(ConstrPlutusData::new(0, fields))
}

/// CIP-25 style NFT metadata for one asset.
pub fn sample_metadata() -> TransactionMetadata {
    let asset = MetadatumMap::new();
    asset.insert("name".into(), "Token".into());
    asset.insert("image".into(), format!("ipfs://{}", "Qm".repeat(40)).into());

    let assets = MetadatumMap::new();
    assets.insert("Token".into(), Metadatum::new_map(asset));

    let metadata = TransactionMetadata::new();
    metadata.insert(NFT_METADATA_LABEL, Metadatum::new_map(assets));
    metadata
}
