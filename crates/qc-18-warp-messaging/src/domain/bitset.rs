//! # Bit Set
//!
//! Index set used for signer bits and for failed-predicate bits.
//!
//! The wire form is the big-endian, minimal-length byte string of the
//! integer `Σ 2^i` over the members `i`. Bit `i` is therefore bit `i % 8` of
//! the `i / 8`-th byte counted from the end. The empty set encodes as zero
//! bytes; a leading zero byte is non-canonical and rejected so that every set
//! has exactly one encoding.

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use super::errors::CodecError;

/// A set of small non-negative integers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<u8>", try_from = "Vec<u8>")]
pub struct BitSet {
    // Trailing zero bits are always trimmed, so derived equality is set
    // equality.
    bits: BitVec<u8, Lsb0>,
}

impl BitSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set containing `indices`.
    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        let mut set = Self::new();
        for index in indices {
            set.add(index);
        }
        set
    }

    /// Insert `index`.
    pub fn add(&mut self, index: usize) {
        if index >= self.bits.len() {
            self.bits.resize(index + 1, false);
        }
        self.bits.set(index, true);
    }

    /// Remove `index`.
    pub fn remove(&mut self, index: usize) {
        if index < self.bits.len() {
            self.bits.set(index, false);
            self.trim();
        }
    }

    /// Membership test.
    pub fn contains(&self, index: usize) -> bool {
        self.bits.get(index).map(|b| *b).unwrap_or(false)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Largest member.
    pub fn max_index(&self) -> Option<usize> {
        self.bits.last_one()
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Canonical encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut little_endian = vec![0u8; self.bits.len().div_ceil(8)];
        for index in self.bits.iter_ones() {
            little_endian[index / 8] |= 1 << (index % 8);
        }
        little_endian.reverse();
        little_endian
    }

    /// Decode the canonical encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.first() == Some(&0) {
            return Err(CodecError::NonCanonicalBitSet);
        }
        let mut little_endian = bytes.to_vec();
        little_endian.reverse();
        let mut set = Self {
            bits: BitVec::from_vec(little_endian),
        };
        set.trim();
        Ok(set)
    }

    fn trim(&mut self) {
        let len = self.bits.last_one().map_or(0, |i| i + 1);
        self.bits.truncate(len);
    }
}

impl From<BitSet> for Vec<u8> {
    fn from(set: BitSet) -> Self {
        set.to_bytes()
    }
}

impl TryFrom<Vec<u8>> for BitSet {
    type Error = CodecError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        BitSet::from_bytes(&bytes)
    }
}

impl FromIterator<usize> for BitSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self::from_indices(iter)
    }
}
