//! # Warp Messages
//!
//! ```text
//! UnsignedMessage: version:u16 ‖ network_id:u32 ‖ source_chain_id[32] ‖ len:u32 ‖ payload
//! SignedMessage:   UnsignedMessage ‖ BitSetSignature
//! ```
//!
//! A message id is the SHA-256 of the unsigned message bytes, so it depends
//! on nothing but those bytes.

use shared_crypto::sha256;
use shared_types::{ChainId, MessageId};

use super::codec::{check_size, Packer, Unpacker, CODEC_VERSION};
use super::errors::CodecError;
use super::payload::Payload;
use super::signature::BitSetSignature;

/// The payload-bearing message that validators sign. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedMessage {
    network_id: u32,
    source_chain_id: ChainId,
    payload: Vec<u8>,
}

impl UnsignedMessage {
    /// Build a message, rejecting payloads over the size limit.
    pub fn new(
        network_id: u32,
        source_chain_id: ChainId,
        payload: Vec<u8>,
    ) -> Result<Self, CodecError> {
        check_size(payload.len())?;
        Ok(Self {
            network_id,
            source_chain_id,
            payload,
        })
    }

    /// Network the message was emitted on.
    pub fn network_id(&self) -> u32 {
        self.network_id
    }

    /// Chain that emitted the message.
    pub fn source_chain_id(&self) -> ChainId {
        self.source_chain_id
    }

    /// Encoded payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Decode the payload.
    pub fn parsed_payload(&self) -> Result<Payload, CodecError> {
        Payload::parse(&self.payload)
    }

    /// Canonical bytes. This is what validators sign.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut p = Packer::with_capacity(2 + 4 + 32 + 4 + self.payload.len());
        self.pack(&mut p);
        p.finish()
    }

    /// Decode canonical bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut u = Unpacker::new(bytes);
        let message = Self::unpack(&mut u)?;
        u.finish()?;
        Ok(message)
    }

    /// Content hash of the canonical bytes.
    pub fn id(&self) -> MessageId {
        MessageId(sha256(&self.to_bytes()))
    }

    pub(crate) fn pack(&self, p: &mut Packer) {
        p.pack_u16(CODEC_VERSION);
        p.pack_u32(self.network_id);
        p.pack_fixed(self.source_chain_id.as_bytes());
        p.pack_bytes(&self.payload);
    }

    pub(crate) fn unpack(u: &mut Unpacker<'_>) -> Result<Self, CodecError> {
        let version = u.unpack_u16()?;
        if version != CODEC_VERSION {
            return Err(CodecError::UnsupportedVersion { found: version });
        }
        Ok(Self {
            network_id: u.unpack_u32()?,
            source_chain_id: ChainId(u.unpack_fixed()?),
            payload: u.unpack_bytes()?,
        })
    }
}

/// An unsigned message plus the aggregate attestation of its signers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedMessage {
    /// The attested message.
    pub unsigned: UnsignedMessage,
    /// Who signed and the aggregate signature.
    pub signature: BitSetSignature,
}

impl SignedMessage {
    /// Pair a message with its signature.
    pub fn new(unsigned: UnsignedMessage, signature: BitSetSignature) -> Self {
        Self {
            unsigned,
            signature,
        }
    }

    /// Id of the unsigned part.
    pub fn id(&self) -> MessageId {
        self.unsigned.id()
    }

    /// Single byte string, as carried in a transaction predicate.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut p = Packer::default();
        self.unsigned.pack(&mut p);
        self.signature.pack(&mut p);
        p.finish()
    }

    /// Decode a signed message. Well-formedness only: nothing about the
    /// signature is checked here.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut u = Unpacker::new(bytes);
        let unsigned = UnsignedMessage::unpack(&mut u)?;
        let signature = BitSetSignature::unpack(&mut u)?;
        u.finish()?;
        Ok(Self {
            unsigned,
            signature,
        })
    }
}
