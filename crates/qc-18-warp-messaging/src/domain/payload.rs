//! # Message Payloads
//!
//! The payload of an unsigned message is one of two kinds, discriminated by
//! a leading type tag:
//!
//! ```text
//! Addressed:  0x00 ‖ source_address[20] ‖ destination_chain_id[32] ‖ destination_address[20] ‖ len:u32 ‖ payload
//! BlockHash:  0x01 ‖ block_hash[32]
//! ```

use serde::{Deserialize, Serialize};
use shared_types::{Address, ChainId, Hash};

use super::codec::{check_size, Packer, Unpacker};
use super::errors::CodecError;

/// Type tag of [`AddressedPayload`].
pub const ADDRESSED_PAYLOAD_KIND: u8 = 0x00;

/// Type tag of [`BlockHashPayload`].
pub const BLOCK_HASH_PAYLOAD_KIND: u8 = 0x01;

/// A message from a contract on the source chain to a contract on a
/// destination chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressedPayload {
    /// Sender contract on the source chain.
    pub source_address: Address,
    /// Chain the message is meant for.
    pub destination_chain_id: ChainId,
    /// Receiving contract on the destination chain.
    pub destination_address: Address,
    /// Application bytes.
    pub payload: Vec<u8>,
}

impl AddressedPayload {
    /// Build a payload, rejecting application bytes over the size limit.
    pub fn new(
        source_address: Address,
        destination_chain_id: ChainId,
        destination_address: Address,
        payload: Vec<u8>,
    ) -> Result<Self, CodecError> {
        check_size(payload.len())?;
        Ok(Self {
            source_address,
            destination_chain_id,
            destination_address,
            payload,
        })
    }

    /// Canonical bytes, including the type tag.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut p = Packer::with_capacity(1 + 20 + 32 + 20 + 4 + self.payload.len());
        p.pack_u8(ADDRESSED_PAYLOAD_KIND);
        self.pack_body(&mut p);
        p.finish()
    }

    fn pack_body(&self, p: &mut Packer) {
        p.pack_fixed(&self.source_address);
        p.pack_fixed(self.destination_chain_id.as_bytes());
        p.pack_fixed(&self.destination_address);
        p.pack_bytes(&self.payload);
    }

    fn unpack_body(u: &mut Unpacker<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            source_address: u.unpack_fixed()?,
            destination_chain_id: ChainId(u.unpack_fixed()?),
            destination_address: u.unpack_fixed()?,
            payload: u.unpack_bytes()?,
        })
    }
}

/// Attestation that a block with this hash was accepted on the source chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHashPayload {
    /// Accepted block hash.
    pub block_hash: Hash,
}

impl BlockHashPayload {
    /// Canonical bytes, including the type tag.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut p = Packer::with_capacity(33);
        p.pack_u8(BLOCK_HASH_PAYLOAD_KIND);
        p.pack_fixed(&self.block_hash);
        p.finish()
    }
}

/// A decoded payload of either kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Contract-to-contract message.
    Addressed(AddressedPayload),
    /// Block hash attestation.
    BlockHash(BlockHashPayload),
}

impl Payload {
    /// Decode a payload, rejecting unknown tags and trailing bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut u = Unpacker::new(bytes);
        let payload = match u.unpack_u8()? {
            ADDRESSED_PAYLOAD_KIND => Payload::Addressed(AddressedPayload::unpack_body(&mut u)?),
            BLOCK_HASH_PAYLOAD_KIND => Payload::BlockHash(BlockHashPayload {
                block_hash: u.unpack_fixed()?,
            }),
            tag => return Err(CodecError::UnknownPayloadKind { tag }),
        };
        u.finish()?;
        Ok(payload)
    }

    /// Canonical bytes, including the type tag.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Payload::Addressed(p) => p.to_bytes(),
            Payload::BlockHash(p) => p.to_bytes(),
        }
    }
}

/// Encode an addressed payload.
pub fn new_addressed_payload(
    source_address: Address,
    destination_chain_id: ChainId,
    destination_address: Address,
    payload: &[u8],
) -> Result<Vec<u8>, CodecError> {
    AddressedPayload::new(
        source_address,
        destination_chain_id,
        destination_address,
        payload.to_vec(),
    )
    .map(|p| p.to_bytes())
}

/// Encode a block hash payload.
pub fn new_block_hash_payload(block_hash: Hash) -> Vec<u8> {
    BlockHashPayload { block_hash }.to_bytes()
}
