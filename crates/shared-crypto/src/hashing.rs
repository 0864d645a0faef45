//! # Hashing
//!
//! - SHA-256 content addressing for warp message ids
//! - Keccak-256 for ABI selectors and event identifiers

use sha2::{Digest, Sha256};
use sha3::Keccak256;

/// SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Keccak-256 digest of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// 4-byte function selector for a canonical ABI signature such as
/// `getBlockchainID()`.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = keccak256(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}
