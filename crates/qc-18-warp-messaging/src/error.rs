//! Error types for the warp backend, signer and aggregator.

use shared_types::{ChainId, Hash, MessageId, NodeId};
use thiserror::Error;

use crate::domain::{CodecError, RegistryError, VerificationError};

/// Warp subsystem errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WarpError {
    /// No signature is available for this message: unknown, or its block
    /// has not been accepted.
    #[error("Warp message not found: {message_id}")]
    NotFound {
        /// Requested message
        message_id: MessageId,
    },

    /// Block has not been accepted on this chain.
    #[error("Block not accepted: {block_hash:?}")]
    BlockNotAccepted {
        /// Requested block
        block_hash: Hash,
    },

    /// Message was emitted on another network.
    #[error("Wrong network: expected {expected}, got {actual}")]
    WrongNetwork {
        /// This chain's network
        expected: u32,
        /// The message's network
        actual: u32,
    },

    /// Message names another chain as its source.
    #[error("Wrong source chain: expected {expected}, got {actual}")]
    WrongSourceChain {
        /// This chain
        expected: ChainId,
        /// The message's source chain
        actual: ChainId,
    },

    /// The signing key belongs to another chain or network than the backend.
    #[error(
        "Signer for chain {signer_chain} on network {signer_network} cannot serve \
         chain {chain} on network {network}"
    )]
    SignerMismatch {
        /// Configured network
        network: u32,
        /// Configured chain
        chain: ChainId,
        /// Signer's network
        signer_network: u32,
        /// Signer's chain
        signer_chain: ChainId,
    },

    /// Signing key failure.
    #[error("Signing failed: {reason}")]
    Signing {
        /// Failure description
        reason: String,
    },

    /// A validator did not hand out its signature.
    #[error("Signature unavailable from {node_id}: {reason}")]
    SignatureUnavailable {
        /// Asked validator
        node_id: NodeId,
        /// Failure description
        reason: String,
    },

    /// Malformed bytes.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Validator view unavailable.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Quorum failed.
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

/// Result type for warp operations
pub type WarpResult<T> = Result<T, WarpError>;
