//! # Header Predicate Results
//!
//! Per-transaction, per-predicate-contract bit sets of failed predicate
//! slots, committed into the block header:
//!
//! ```text
//! version:u16 ‖ tx_count:u32 ‖ { tx_hash[32] ‖ entry_count:u32 ‖
//!     { address[20] ‖ len:u32 ‖ failed-bits } }
//! ```
//!
//! Transactions appear in block order; addresses ascend. Equal results
//! always encode to equal bytes.

use std::collections::BTreeMap;

use qc_18_warp_messaging::domain::{BitSet, CodecError, Packer, Unpacker};
use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash};

/// Encoding version of [`HeaderPredicateResults`].
pub const RESULTS_VERSION: u16 = 0;

/// Results of one transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxPredicateResults {
    /// Transaction hash.
    pub tx_hash: Hash,
    /// Failed slots per predicate contract.
    pub failed: BTreeMap<Address, BitSet>,
}

/// Predicate outcomes for every predicate-carrying transaction of a block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderPredicateResults {
    txs: Vec<TxPredicateResults>,
}

impl HeaderPredicateResults {
    /// No results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next transaction's results.
    pub fn push(&mut self, results: TxPredicateResults) {
        self.txs.push(results);
    }

    /// Transactions with results, in block order.
    pub fn transactions(&self) -> &[TxPredicateResults] {
        &self.txs
    }

    /// Number of transactions with results.
    pub fn len(&self) -> usize {
        self.txs.len()
    }

    /// Whether no transaction carries predicates.
    pub fn is_empty(&self) -> bool {
        self.txs.is_empty()
    }

    /// Failed slots of `tx_hash` for `address`. Unknown entries read as no
    /// failures.
    pub fn failed_slots(&self, tx_hash: &Hash, address: &Address) -> BitSet {
        self.txs
            .iter()
            .find(|t| &t.tx_hash == tx_hash)
            .and_then(|t| t.failed.get(address))
            .cloned()
            .unwrap_or_default()
    }

    /// Failed slots across all transactions and contracts.
    pub fn count_failed(&self) -> usize {
        self.txs
            .iter()
            .flat_map(|t| t.failed.values())
            .map(BitSet::len)
            .sum()
    }

    /// Canonical bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut p = Packer::default();
        p.pack_u16(RESULTS_VERSION);
        p.pack_u32(self.txs.len() as u32);
        for tx in &self.txs {
            p.pack_fixed(&tx.tx_hash);
            p.pack_u32(tx.failed.len() as u32);
            for (address, bits) in &tx.failed {
                p.pack_fixed(address);
                p.pack_bytes(&bits.to_bytes());
            }
        }
        p.finish()
    }

    /// Decode header bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut u = Unpacker::new(bytes);
        let version = u.unpack_u16()?;
        if version != RESULTS_VERSION {
            return Err(CodecError::UnsupportedVersion { found: version });
        }
        let tx_count = u.unpack_u32()?;
        let mut txs = Vec::new();
        for _ in 0..tx_count {
            let tx_hash = u.unpack_fixed::<32>()?;
            let entry_count = u.unpack_u32()?;
            let mut failed = BTreeMap::new();
            for _ in 0..entry_count {
                let address = u.unpack_fixed::<20>()?;
                let bits = BitSet::from_bytes(&u.unpack_bytes()?)?;
                failed.insert(address, bits);
            }
            txs.push(TxPredicateResults { tx_hash, failed });
        }
        u.finish()?;
        Ok(Self { txs })
    }
}
