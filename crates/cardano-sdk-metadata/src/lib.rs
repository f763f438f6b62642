//! # Cardano SDK Metadata
//!
//! Transaction metadata: labelled [`Metadatum`] trees attached to
//! transactions as auxiliary data.
//!
//! ## Key Types
//!
//! - [`Metadatum`] - A map, list, integer, byte string or text string
//! - [`MetadatumList`] / [`MetadatumMap`] - Shared containers
//! - [`TransactionMetadata`] - Label to metadatum map
//!
//! Like Plutus Data, decoded values keep their original bytes and replay
//! them on encode until the cache is cleared.

mod interop;
mod json;
pub mod list;
pub mod map;
pub mod metadatum;
pub mod transaction_metadata;

pub use list::MetadatumList;
pub use map::MetadatumMap;
pub use metadatum::{Metadatum, MetadatumKind, MetadatumValue};
pub use transaction_metadata::TransactionMetadata;

pub use cardano_sdk_core::EncodedCache;
