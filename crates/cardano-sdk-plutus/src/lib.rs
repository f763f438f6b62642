//! # Cardano SDK Plutus
//!
//! Plutus Data, the structured values exchanged with on-chain scripts.
//!
//! ## Key Types
//!
//! - [`PlutusData`] - A constructor, map, list, integer or byte string
//! - [`ConstrPlutusData`] - Constructor application (alternative + fields)
//! - [`PlutusList`] / [`PlutusMap`] - Shared containers
//!
//! All types are shared handles: cloning one takes another reference to the
//! same value. Values decoded from CBOR re-encode to exactly the bytes they
//! were read from until [`EncodedCache::clear_encoded_cache`] is called.
//!
//! ## Example
//!
//! ```
//! use cardano_sdk_plutus::{PlutusData, PlutusDataKind};
//! use cardano_sdk_core::{FromCbor, ToCbor};
//!
//! let data = PlutusData::from_cbor_hex("a200010142aabb").unwrap();
//! assert_eq!(data.kind(), PlutusDataKind::Map);
//! assert_eq!(data.to_cbor_hex().unwrap(), "a200010142aabb");
//! ```

pub mod constr;
mod interop;
mod json;
pub mod list;
pub mod map;
pub mod plutus_data;

pub use constr::ConstrPlutusData;
pub use list::PlutusList;
pub use map::PlutusMap;
pub use plutus_data::{PlutusData, PlutusDataKind, PlutusDataValue};

pub use cardano_sdk_core::EncodedCache;
