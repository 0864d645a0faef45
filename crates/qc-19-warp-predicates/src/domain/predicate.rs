//! # Predicate Packing
//!
//! Predicates ride in a transaction's access list as storage keys of the
//! predicate contract's address:
//!
//! ```text
//! predicate ‖ 0xFF ‖ 0x00 .. (to a multiple of 32)
//! ```

use shared_types::Hash;

use super::errors::PredicateError;

/// Marks the end of predicate content.
pub const PREDICATE_END_BYTE: u8 = 0xFF;

/// Access-list storage key width.
pub const STORAGE_KEY_LEN: usize = 32;

/// Padded length for `len` bytes of content, delimiter included.
pub fn padded_len(len: usize) -> usize {
    len.div_ceil(STORAGE_KEY_LEN) * STORAGE_KEY_LEN
}

/// Append the end delimiter and zero-pad.
pub fn pack_predicate(predicate: &[u8]) -> Vec<u8> {
    let mut packed = Vec::with_capacity(padded_len(predicate.len() + 1));
    packed.extend_from_slice(predicate);
    packed.push(PREDICATE_END_BYTE);
    packed.resize(padded_len(predicate.len() + 1), 0);
    packed
}

/// Strip padding and delimiter.
///
/// Checked in order: all-zero input, padding length, delimiter.
pub fn unpack_predicate(packed: &[u8]) -> Result<Vec<u8>, PredicateError> {
    let trimmed_len = packed
        .iter()
        .rposition(|b| *b != 0)
        .map(|i| i + 1)
        .ok_or(PredicateError::InvalidAllZeroBytes)?;

    let expected = padded_len(trimmed_len);
    if expected != packed.len() {
        return Err(PredicateError::InvalidPadding {
            actual: packed.len(),
            expected,
        });
    }

    if packed[trimmed_len - 1] != PREDICATE_END_BYTE {
        return Err(PredicateError::InvalidEndDelimiter);
    }
    Ok(packed[..trimmed_len - 1].to_vec())
}

/// Split packed bytes into storage keys.
pub fn to_storage_keys(packed: &[u8]) -> Vec<Hash> {
    packed
        .chunks(STORAGE_KEY_LEN)
        .map(|chunk| {
            let mut key = [0u8; STORAGE_KEY_LEN];
            key[..chunk.len()].copy_from_slice(chunk);
            key
        })
        .collect()
}

/// Concatenate storage keys back into packed bytes.
pub fn from_storage_keys(keys: &[Hash]) -> Vec<u8> {
    keys.iter().flat_map(|k| k.iter().copied()).collect()
}
