//! Block-level errors. Any of these makes the block unacceptable.

use qc_18_warp_messaging::{CodecError, WarpError};
use shared_types::{Address, Hash};
use thiserror::Error;

use crate::domain::{BlockStatus, PredicateError};

/// Block processing errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BlockError {
    /// Recomputed predicate results differ from the committed header.
    #[error("Invalid header predicate results for block {block_hash:?}")]
    InvalidHeaderPredicateResults {
        /// Offending block
        block_hash: Hash,
    },

    /// A transaction can never execute.
    #[error("Invalid transaction {tx_hash:?}: {reason}")]
    InvalidTransaction {
        /// Offending transaction
        tx_hash: Hash,
        /// Why it cannot execute
        reason: TransactionError,
    },

    /// Body does not match the header's transaction root.
    #[error("Transactions root mismatch for block {block_hash:?}")]
    TransactionsRootMismatch {
        /// Hash of the imported block
        block_hash: Hash,
    },

    /// Block was never built or imported here.
    #[error("Unknown block {block_hash:?}")]
    UnknownBlock {
        /// Requested block
        block_hash: Hash,
    },

    /// Lifecycle violation.
    #[error("Invalid transition {from:?} -> {to:?}")]
    InvalidTransition {
        /// Current status
        from: BlockStatus,
        /// Requested status
        to: BlockStatus,
    },

    /// Configured predicate address has no verifier.
    #[error("No predicater registered for {address:?}")]
    UnregisteredPredicater {
        /// Configured predicate contract
        address: Address,
    },

    /// Header results bytes do not decode.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Warp backend failure.
    #[error(transparent)]
    Warp(#[from] WarpError),
}

/// Why a transaction is invalid.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransactionError {
    /// A predicate does not decode.
    #[error(transparent)]
    Predicate(#[from] PredicateError),

    /// Gas limit below intrinsic gas.
    #[error("intrinsic gas {required} exceeds gas limit {limit}")]
    IntrinsicGas {
        /// Base plus predicate gas
        required: u64,
        /// Transaction gas limit
        limit: u64,
    },
}

/// Result type for block operations
pub type Result<T> = std::result::Result<T, BlockError>;
