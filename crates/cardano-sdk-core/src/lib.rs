//! # Cardano SDK Core
//!
//! Primitives every Cardano SDK object is built on.
//!
//! This crate contains no I/O and no networking. It is pure computation over
//! in-memory values.
//!
//! ## Key Types
//!
//! - [`Object`] - Shared, reference-counted object cell with a diagnostic slot
//! - [`Buffer`] - Owned byte sequence with hex import/export
//! - [`CborReader`] / [`CborWriter`] - The wire envelope codec
//! - [`CodecError`] - The error taxonomy shared by all SDK crates
//! - [`json`] - Helpers for the detailed-schema JSON renderers
//!
//! ## Codec Traits
//!
//! Serializable types implement [`ToCbor`] and [`FromCbor`]. Types that
//! remember their original encoding implement [`EncodedCache`].

pub mod bigint;
pub mod buffer;
pub mod cbor;
pub mod codec;
pub mod error;
pub mod json;
pub mod limits;
pub mod object;

pub use buffer::Buffer;
pub use cbor::{CborReader, CborReaderState, CborWriter, MAX_CHUNK_LEN};
pub use codec::{EncodedCache, FromCbor, ToCbor};
pub use error::{CodecError, Result};
pub use limits::DecodeLimits;
pub use object::{acquire, get_last_error, refcount, release, set_last_error, Object, Shared};

pub use num_bigint::BigInt;
