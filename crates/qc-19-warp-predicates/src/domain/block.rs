//! # Blocks
//!
//! Header, body and lifecycle of a block carrying predicate transactions.
//!
//! ```text
//! Built ──► Verified ──► Accepted
//!   │          │ ▲
//!   │          └─┘ (re-verify with another context)
//!   └──────────┴──► Rejected
//! ```

use qc_18_warp_messaging::domain::Packer;
use serde::{Deserialize, Serialize};
use shared_crypto::sha256;
use shared_types::Hash;

use super::transaction::PredicateTransaction;

/// Context the proposer committed to when building a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposerContext {
    /// Primary-network height used for validator lookups.
    pub p_chain_height: u64,
}

impl ProposerContext {
    /// Context at `p_chain_height`.
    pub fn new(p_chain_height: u64) -> Self {
        Self { p_chain_height }
    }
}

/// Block header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Parent block.
    pub parent_hash: Hash,
    /// Height.
    pub number: u64,
    /// Unix seconds.
    pub timestamp: u64,
    /// SHA-256 over the transaction hashes.
    pub transactions_root: Hash,
    /// Encoded `HeaderPredicateResults`.
    pub predicate_results: Vec<u8>,
}

impl BlockHeader {
    /// Block hash.
    pub fn hash(&self) -> Hash {
        let mut p = Packer::with_capacity(120 + self.predicate_results.len());
        p.pack_fixed(&self.parent_hash);
        p.pack_u64(self.number);
        p.pack_u64(self.timestamp);
        p.pack_fixed(&self.transactions_root);
        p.pack_bytes(&self.predicate_results);
        sha256(&p.finish())
    }
}

/// Header plus ordered transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Header.
    pub header: BlockHeader,
    /// Transactions in execution order.
    pub transactions: Vec<PredicateTransaction>,
}

impl Block {
    /// Assemble a block, computing its transaction root.
    pub fn new(
        parent_hash: Hash,
        number: u64,
        timestamp: u64,
        transactions: Vec<PredicateTransaction>,
        predicate_results: Vec<u8>,
    ) -> Self {
        Self {
            header: BlockHeader {
                parent_hash,
                number,
                timestamp,
                transactions_root: transactions_root(&transactions),
                predicate_results,
            },
            transactions,
        }
    }

    /// Block hash.
    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    /// Whether the header's transaction root matches the body.
    pub fn has_valid_root(&self) -> bool {
        self.header.transactions_root == transactions_root(&self.transactions)
    }
}

/// Root over transaction hashes in order.
pub fn transactions_root(transactions: &[PredicateTransaction]) -> Hash {
    let mut p = Packer::with_capacity(32 * transactions.len());
    for tx in transactions {
        p.pack_fixed(&tx.hash());
    }
    sha256(&p.finish())
}

/// Consensus status of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockStatus {
    /// Assembled or received, not yet verified.
    Built,
    /// Verified at least once.
    Verified,
    /// Final.
    Accepted,
    /// Discarded.
    Rejected,
}

impl BlockStatus {
    /// Whether `self -> next` is allowed.
    pub fn can_transition_to(self, next: BlockStatus) -> bool {
        use BlockStatus::*;
        matches!(
            (self, next),
            (Built, Verified)
                | (Verified, Verified)
                | (Verified, Accepted)
                | (Built, Rejected)
                | (Verified, Rejected)
        )
    }

    /// Accepted or rejected.
    pub fn is_terminal(self) -> bool {
        matches!(self, BlockStatus::Accepted | BlockStatus::Rejected)
    }

    /// Metric label.
    pub fn label(self) -> &'static str {
        match self {
            BlockStatus::Built => "built",
            BlockStatus::Verified => "verified",
            BlockStatus::Accepted => "accepted",
            BlockStatus::Rejected => "rejected",
        }
    }
}
