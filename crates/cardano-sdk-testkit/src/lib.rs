//! # Cardano SDK Testkit
//!
//! Testing utilities for the Cardano SDK.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Encodings paired with their expected normalized form
//! - **Generators**: Proptest strategies for Plutus Data and metadata trees
//! - **Fixtures**: Preconfigured codecs and sample values
//!
//! ## Golden Vectors
//!
//! Every vector must replay its input byte for byte, then re-encode to the
//! normalized bytes once its cache is cleared:
//!
//! ```rust
//! use cardano_sdk_testkit::vectors::{all_vectors, verify_vector};
//!
//! for vector in all_vectors() {
//!     assert!(verify_vector(&vector).is_ok(), "{}", vector.name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use cardano_sdk::{FromCbor, PlutusData, ToCbor};
//! use cardano_sdk_testkit::generators::plutus_data;
//!
//! proptest! {
//!     #[test]
//!     fn decode_inverts_encode(data in plutus_data()) {
//!         let bytes = data.to_cbor_bytes().unwrap();
//!         prop_assert_eq!(PlutusData::from_cbor_bytes(&bytes).unwrap(), data);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use cardano_sdk_testkit::fixtures::{sample_datum, TestFixture};
//!
//! let fixture = TestFixture::new();
//! let hex = fixture.encode_hex(&sample_datum());
//! assert_eq!(fixture.plutus_data(&hex), sample_datum());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::TestFixture;
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector, VectorFamily};
