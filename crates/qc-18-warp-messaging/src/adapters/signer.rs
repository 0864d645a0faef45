//! Local BLS warp signer.

use shared_crypto::{BlsKeyPair, BlsPublicKey, BLS_SIGNATURE_LEN};
use shared_types::ChainId;

use crate::domain::UnsignedMessage;
use crate::error::WarpError;
use crate::ports::WarpSigner;

/// Signs messages originating from one chain with this node's BLS key.
pub struct LocalWarpSigner {
    key: BlsKeyPair,
    network_id: u32,
    chain_id: ChainId,
}

impl LocalWarpSigner {
    /// Signer for messages of `chain_id` on `network_id`.
    pub fn new(key: BlsKeyPair, network_id: u32, chain_id: ChainId) -> Self {
        Self {
            key,
            network_id,
            chain_id,
        }
    }
}

impl WarpSigner for LocalWarpSigner {
    fn sign(&self, message: &UnsignedMessage) -> Result<[u8; BLS_SIGNATURE_LEN], WarpError> {
        if message.network_id() != self.network_id {
            return Err(WarpError::WrongNetwork {
                expected: self.network_id,
                actual: message.network_id(),
            });
        }
        if message.source_chain_id() != self.chain_id {
            return Err(WarpError::WrongSourceChain {
                expected: self.chain_id,
                actual: message.source_chain_id(),
            });
        }
        Ok(self.key.sign(&message.to_bytes()).to_bytes())
    }

    fn public_key(&self) -> BlsPublicKey {
        self.key.public_key()
    }

    fn network_id(&self) -> u32 {
        self.network_id
    }

    fn chain_id(&self) -> ChainId {
        self.chain_id
    }
}
