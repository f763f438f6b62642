//! # Cardano SDK
//!
//! Structured on-chain values for Cardano: Plutus Data and transaction
//! metadata, with CBOR encodings that round-trip byte for byte.
//!
//! ## Overview
//!
//! - **Plutus Data**: constructors, maps, lists, integers and byte strings
//!   passed to and from scripts
//! - **Metadata**: labelled metadatum trees attached to transactions
//! - **Encoded-form cache**: decoded values replay their original bytes, so
//!   hashes computed over them stay stable
//!
//! ## Usage
//!
//! ```rust
//! use cardano_sdk::{Codec, EncodedCache, PlutusData, SdkConfig};
//!
//! let codec = Codec::new(SdkConfig::default());
//!
//! // {0: 1, 1: h'aabb'}
//! let data = codec.decode_plutus_data(&[0xa2, 0x00, 0x01, 0x01, 0x42, 0xaa, 0xbb]).unwrap();
//! let map = data.to_map().unwrap();
//! assert_eq!(map.len(), 2);
//!
//! // Decoded values re-encode to their original bytes
//! assert_eq!(codec.encode_hex(&data).unwrap(), "a200010142aabb");
//!
//! // Edits below the root need the root's cache cleared
//! map.insert(PlutusData::from(2u64), PlutusData::from(3u64));
//! data.clear_encoded_cache();
//! assert_eq!(codec.encode_hex(&data).unwrap(), "a300010142aabb0203");
//! ```
//!
//! ## Re-exports
//!
//! - `cardano_sdk::core` - Object kernel, buffers, CBOR reader and writer
//! - `cardano_sdk::plutus` - Plutus Data
//! - `cardano_sdk::metadata` - Metadatum and transaction metadata

pub mod codec;
pub mod error;

// Re-export component crates
pub use cardano_sdk_core as core;
pub use cardano_sdk_metadata as metadata;
pub use cardano_sdk_plutus as plutus;

// Re-export main types for convenience
pub use codec::{Codec, SdkConfig};
pub use error::{Result, SdkError};

// Re-export commonly used types
pub use cardano_sdk_core::{
    acquire, get_last_error, refcount, release, set_last_error, BigInt, Buffer, CborReader,
    CborWriter, CodecError, DecodeLimits, EncodedCache, FromCbor, Shared, ToCbor,
};
pub use cardano_sdk_metadata::{
    Metadatum, MetadatumKind, MetadatumList, MetadatumMap, TransactionMetadata,
};
pub use cardano_sdk_plutus::{
    ConstrPlutusData, PlutusData, PlutusDataKind, PlutusList, PlutusMap,
};
