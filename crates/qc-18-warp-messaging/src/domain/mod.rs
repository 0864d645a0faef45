//! # Domain Layer
//!
//! Pure warp types: codec, payloads, messages, bit sets, validator sets,
//! quorum arithmetic and the aggregate signature check.

pub mod bitset;
pub mod codec;
pub mod errors;
pub mod message;
pub mod payload;
pub mod quorum;
pub mod signature;
pub mod validator;

pub use bitset::BitSet;
pub use codec::{Packer, Unpacker, CODEC_VERSION, MAX_MESSAGE_SIZE};
pub use errors::{CodecError, RegistryError, VerificationError};
pub use message::{SignedMessage, UnsignedMessage};
pub use payload::{
    new_addressed_payload, new_block_hash_payload, AddressedPayload, BlockHashPayload, Payload,
    ADDRESSED_PAYLOAD_KIND, BLOCK_HASH_PAYLOAD_KIND,
};
pub use quorum::{
    QuorumThreshold, DEFAULT_QUORUM_NUMERATOR, MINIMUM_QUORUM_NUMERATOR, QUORUM_DENOMINATOR,
};
pub use signature::{BitSetSignature, BIT_SET_SIGNATURE_KIND};
pub use validator::{CanonicalValidatorSet, ValidatorInfo};
