//! # Bit Set Signature
//!
//! ```text
//! kind:u8=0x00 ‖ len:u32 ‖ signer-bits ‖ aggregate_signature[96]
//! ```
//!
//! Verification is pure: given the same message, signature, validator set
//! and threshold it always returns the same answer.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use shared_crypto::{BlsPublicKey, BlsSignature, BLS_SIGNATURE_LEN};

use super::bitset::BitSet;
use super::codec::{Packer, Unpacker};
use super::errors::{CodecError, VerificationError};
use super::message::UnsignedMessage;
use super::quorum::QuorumThreshold;
use super::validator::CanonicalValidatorSet;

/// Type tag of [`BitSetSignature`].
pub const BIT_SET_SIGNATURE_KIND: u8 = 0x00;

/// Signer bits over a canonical validator set plus their aggregate
/// signature. Bit `i` claims that validator `i` contributed.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitSetSignature {
    /// Indices of claimed signers.
    pub signers: BitSet,
    /// Compressed aggregate signature.
    #[serde_as(as = "Bytes")]
    pub signature: [u8; BLS_SIGNATURE_LEN],
}

impl BitSetSignature {
    /// Build from parts.
    pub fn new(signers: BitSet, signature: [u8; BLS_SIGNATURE_LEN]) -> Self {
        Self { signers, signature }
    }

    /// Number of claimed signers.
    pub fn num_signers(&self) -> usize {
        self.signers.len()
    }

    pub(crate) fn pack(&self, p: &mut Packer) {
        p.pack_u8(BIT_SET_SIGNATURE_KIND);
        p.pack_bytes(&self.signers.to_bytes());
        p.pack_fixed(&self.signature);
    }

    pub(crate) fn unpack(u: &mut Unpacker<'_>) -> Result<Self, CodecError> {
        let tag = u.unpack_u8()?;
        if tag != BIT_SET_SIGNATURE_KIND {
            return Err(CodecError::UnknownSignatureKind { tag });
        }
        let signers = BitSet::from_bytes(&u.unpack_bytes()?)?;
        let signature = u.unpack_fixed()?;
        Ok(Self { signers, signature })
    }

    /// Check that the claimed signers carry at least `quorum` of the set's
    /// weight and that their aggregate key verifies the signature over the
    /// message bytes.
    ///
    /// 1. every signer index is inside the set
    /// 2. signer weights are summed and their keys collected
    /// 3. signed weight meets the threshold
    /// 4. the aggregate signature verifies under the aggregate key
    pub fn verify(
        &self,
        message: &UnsignedMessage,
        validators: &CanonicalValidatorSet,
        quorum: QuorumThreshold,
    ) -> Result<(), VerificationError> {
        if let Some(index) = self.signers.max_index() {
            if index >= validators.len() {
                return Err(VerificationError::SignerIndexOutOfRange {
                    index,
                    validator_count: validators.len(),
                });
            }
        }

        let mut signed_weight: u64 = 0;
        let mut keys: Vec<&BlsPublicKey> = Vec::with_capacity(self.signers.len());
        for index in self.signers.iter() {
            let validator = &validators.validators()[index];
            signed_weight = signed_weight
                .checked_add(validator.weight)
                .ok_or(VerificationError::WeightOverflow)?;
            keys.push(&validator.public_key);
        }

        quorum.verify_weight(signed_weight, validators.total_weight())?;

        if keys.is_empty() {
            return Err(VerificationError::EmptySignerSet);
        }

        let aggregate_key =
            BlsPublicKey::aggregate(keys).map_err(|_| VerificationError::BadSignature)?;
        let signature = BlsSignature::from_bytes(&self.signature)
            .map_err(|_| VerificationError::BadSignature)?;

        if !aggregate_key.verify(&message.to_bytes(), &signature) {
            return Err(VerificationError::BadSignature);
        }
        Ok(())
    }
}
