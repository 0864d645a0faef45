//! # Shared Crypto - Warp Cryptographic Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `bls` | BLS12-381 (`min_pk`) | Validator signatures, aggregation |
//! | `hashing` | SHA-256, Keccak-256 | Message ids, ABI selectors, event ids |
//!
//! ## Security Properties
//!
//! - **BLS**: proof-of-possession ciphersuite, public keys are subgroup
//!   checked on parse so aggregation never sees a rogue point
//! - **SHA-256**: content addressing of warp messages

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bls;
pub mod errors;
pub mod hashing;

// Re-exports
pub use bls::{
    BlsKeyPair, BlsPublicKey, BlsSignature, BLS_PUBLIC_KEY_LEN, BLS_SECRET_KEY_LEN,
    BLS_SIGNATURE_LEN,
};
pub use errors::CryptoError;
pub use hashing::{keccak256, selector, sha256};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
