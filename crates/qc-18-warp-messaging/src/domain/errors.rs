//! # Domain Errors
//!
//! Three families, kept apart so callers can tell them apart:
//!
//! | Error | Meaning |
//! |-------|---------|
//! | `CodecError` | bytes are not a well-formed message (malformed message) |
//! | `RegistryError` | the validator view needed to establish quorum is unavailable |
//! | `VerificationError` | quorum was evaluated and failed |

use shared_types::{ChainId, NodeId, SubnetId};
use thiserror::Error;

/// Malformed-message errors raised while decoding canonical bytes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Input ended before a field could be read.
    #[error("Malformed message: need {needed} bytes at offset {offset}, only {available} left")]
    Truncated {
        /// Offset of the field being read
        offset: usize,
        /// Bytes the field needs
        needed: usize,
        /// Bytes left in the input
        available: usize,
    },

    /// Codec version is not supported.
    #[error("Malformed message: unsupported codec version {found}")]
    UnsupportedVersion {
        /// Version found on the wire
        found: u16,
    },

    /// Payload type tag is not known.
    #[error("Malformed message: unknown payload kind {tag:#04x}")]
    UnknownPayloadKind {
        /// Tag found on the wire
        tag: u8,
    },

    /// Signature type tag is not known.
    #[error("Malformed message: unknown signature kind {tag:#04x}")]
    UnknownSignatureKind {
        /// Tag found on the wire
        tag: u8,
    },

    /// Declared length exceeds the protocol limit.
    #[error("Malformed message: length {declared} exceeds limit {max}")]
    LengthTooLarge {
        /// Declared length
        declared: usize,
        /// Maximum accepted length
        max: usize,
    },

    /// Bytes remain after the structure was fully read.
    #[error("Malformed message: {remaining} trailing bytes")]
    TrailingBytes {
        /// Unread byte count
        remaining: usize,
    },

    /// Bit set has a leading zero byte.
    #[error("Malformed message: non-canonical bit set encoding")]
    NonCanonicalBitSet,
}

/// Errors from the validator registry. All of them mean "cannot establish
/// quorum", never "quorum failed".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Height is below what the registry can answer for.
    #[error("Registry unavailable at height {height} (minimum queryable height {minimum})")]
    RegistryUnavailable {
        /// Requested height
        height: u64,
        /// Lowest height the registry serves
        minimum: u64,
    },

    /// Chain is not known to the registry.
    #[error("Unknown chain {chain_id}")]
    UnknownChain {
        /// Requested chain
        chain_id: ChainId,
    },

    /// Subnet has no validator snapshot at or below the height.
    #[error("No validator set for subnet {subnet_id} at height {height}")]
    UnknownSubnet {
        /// Requested subnet
        subnet_id: SubnetId,
        /// Requested height
        height: u64,
    },

    /// The same node appears twice in one snapshot.
    #[error("Duplicate validator {node_id} in validator set")]
    DuplicateValidator {
        /// Repeated node id
        node_id: NodeId,
    },

    /// Total weight does not fit in 64 bits.
    #[error("Validator set total weight overflows u64")]
    WeightOverflow,
}

/// Quorum evaluation failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerificationError {
    /// A signer bit points past the end of the validator set.
    #[error("Signer index {index} out of range for {validator_count} validators")]
    SignerIndexOutOfRange {
        /// Highest set bit
        index: usize,
        /// Validator set size
        validator_count: usize,
    },

    /// Signed weight is below the threshold.
    #[error("Quorum not reached: signed weight {signed_weight} of {total_weight} below {numerator}/{denominator}")]
    QuorumNotReached {
        /// Weight of the claimed signers
        signed_weight: u64,
        /// Weight of the whole set
        total_weight: u64,
        /// Threshold numerator
        numerator: u64,
        /// Threshold denominator
        denominator: u64,
    },

    /// Aggregate signature does not verify, or does not parse.
    #[error("Invalid aggregate signature")]
    BadSignature,

    /// No signers claimed against an empty-weight set.
    #[error("Empty signer set")]
    EmptySignerSet,

    /// Signer weight sum overflowed.
    #[error("Signer weight overflows u64")]
    WeightOverflow,

    /// Threshold is not a fraction in (0, 1].
    #[error("Invalid quorum {numerator}/{denominator}")]
    InvalidQuorum {
        /// Threshold numerator
        numerator: u64,
        /// Threshold denominator
        denominator: u64,
    },
}
