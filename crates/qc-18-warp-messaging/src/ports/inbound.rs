//! # Inbound Ports (Driving Ports / API)
//!
//! The warp backend as seen by block execution and the signature RPC.

use shared_crypto::BLS_SIGNATURE_LEN;
use shared_types::{Hash, MessageId};

use crate::domain::UnsignedMessage;
use crate::error::WarpResult;

/// Warp backend API.
///
/// Messages are recorded while a block executes and become signable only
/// once that block is accepted. Implementations must be thread-safe.
pub trait WarpBackendApi: Send + Sync {
    /// Record a message emitted by a block under execution.
    ///
    /// Returns the message id. Recording the same message again is a no-op.
    fn add_message(&self, block_hash: Hash, message: UnsignedMessage) -> WarpResult<MessageId>;

    /// Block was accepted: sign every message it emitted.
    fn accept_block(&self, block_hash: &Hash) -> WarpResult<()>;

    /// Block was rejected: forget messages that no other block emitted.
    fn reject_block(&self, block_hash: &Hash) -> WarpResult<()>;

    /// This node's signature over an accepted message.
    ///
    /// # Errors
    /// * `WarpError::NotFound` - unknown, or emitted by a block not yet accepted
    fn get_signature(&self, message_id: &MessageId) -> WarpResult<[u8; BLS_SIGNATURE_LEN]>;

    /// The unsigned message recorded under `message_id`.
    fn get_message(&self, message_id: &MessageId) -> WarpResult<UnsignedMessage>;

    /// Signature over a block-hash message for an accepted block.
    ///
    /// # Errors
    /// * `WarpError::BlockNotAccepted` - block unknown or not accepted
    fn get_block_signature(&self, block_hash: &Hash) -> WarpResult<[u8; BLS_SIGNATURE_LEN]>;

    /// Drop the acceptance record and cached block signature of a block that
    /// fell out of the retention window. Message signatures are kept.
    fn forget_block(&self, block_hash: &Hash);
}
