//! # Outbound Ports (Driven Ports / SPI)
//!
//! Dependencies the warp subsystem needs from the rest of the node.

use shared_crypto::{BlsPublicKey, BLS_SIGNATURE_LEN};
use shared_types::{ChainId, NodeId, SubnetId};

use crate::domain::{RegistryError, UnsignedMessage, ValidatorInfo};
use crate::error::WarpError;

/// Read-only view of validator sets as recorded on the primary network.
///
/// Answers must be a pure function of `(height, subnet)`: every node asking
/// the same question gets the same validators.
pub trait ValidatorRegistry: Send + Sync {
    /// Subnet that validates `chain_id`.
    ///
    /// # Errors
    /// * `RegistryError::UnknownChain` - chain not registered
    fn subnet_of(&self, chain_id: &ChainId) -> Result<SubnetId, RegistryError>;

    /// Validators of `subnet_id` at primary-network `height`, in any order.
    ///
    /// # Errors
    /// * `RegistryError::RegistryUnavailable` - height below what is retained
    /// * `RegistryError::UnknownSubnet` - no validators recorded
    fn validator_set(
        &self,
        height: u64,
        subnet_id: &SubnetId,
    ) -> Result<Vec<ValidatorInfo>, RegistryError>;
}

/// This node's warp signing key.
pub trait WarpSigner: Send + Sync {
    /// Sign the canonical bytes of `message`.
    ///
    /// # Errors
    /// * `WarpError::WrongNetwork` / `WarpError::WrongSourceChain` - the
    ///   message does not originate from this chain
    fn sign(&self, message: &UnsignedMessage) -> Result<[u8; BLS_SIGNATURE_LEN], WarpError>;

    /// Public key matching [`Self::sign`].
    fn public_key(&self) -> BlsPublicKey;

    /// Network whose messages this key signs.
    fn network_id(&self) -> u32;

    /// Chain whose messages this key signs.
    fn chain_id(&self) -> ChainId;
}

/// Fetches one validator's signature over a message.
///
/// Transport to remote validators lives behind this trait.
pub trait SignatureGetter: Send + Sync {
    /// Ask `node_id` for its signature over `message`.
    ///
    /// # Errors
    /// * `WarpError::SignatureUnavailable` - peer unreachable or refused
    fn get_signature(
        &self,
        node_id: &NodeId,
        message: &UnsignedMessage,
    ) -> Result<[u8; BLS_SIGNATURE_LEN], WarpError>;
}
