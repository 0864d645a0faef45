//! Predicate decoding and verification errors.

use qc_18_warp_messaging::{CodecError, WarpVerificationError};
use thiserror::Error;

/// A predicate could not be decoded or priced. A transaction carrying one is
/// invalid.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PredicateError {
    /// Every byte of the packed predicate is zero.
    #[error("Predicate is all zero bytes")]
    InvalidAllZeroBytes,

    /// Packed length is not the padded length of its content.
    #[error("Invalid predicate padding: length {actual}, expected {expected}")]
    InvalidPadding {
        /// Packed length
        actual: usize,
        /// Padded length of the trimmed content
        expected: usize,
    },

    /// Last non-zero byte is not the end delimiter.
    #[error("Invalid predicate end delimiter")]
    InvalidEndDelimiter,

    /// Predicate is not a signed warp message.
    #[error("Malformed predicate: {0}")]
    Malformed(#[from] CodecError),

    /// Gas computation overflowed.
    #[error("Predicate gas overflows u64")]
    GasOverflow,
}

/// Why a well-formed transaction's predicate did not verify. Recorded in the
/// header results; the transaction itself stays valid.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PredicateFailure {
    /// Block was built or verified without a proposer context.
    #[error("No proposer context")]
    MissingProposerContext,

    /// Predicate does not decode.
    #[error(transparent)]
    Malformed(#[from] PredicateError),

    /// Warp verification failed.
    #[error(transparent)]
    Rejected(#[from] WarpVerificationError),
}
