//! # Signature Forgery
//!
//! Attempts to pass a warp message without a genuine quorum:
//!
//! | Attack | Expected |
//! |--------|----------|
//! | Flip a payload bit after signing | `BadSignature` |
//! | Claim a validator who did not sign | `BadSignature` |
//! | Sign with a key outside the set | `BadSignature` |
//! | Move a signature to another message | `BadSignature` |
//! | Minority signers | `QuorumNotReached` |
//! | Signer bit past the set | `SignerIndexOutOfRange` |
//! | Replay on another network | `WrongNetworkId` |
//! | Zero-padded signer bits | `NonCanonicalBitSet` |

#[cfg(test)]
mod tests {
    use qc_18_warp_messaging::domain::Packer;
    use qc_18_warp_messaging::{
        BitSet, BitSetSignature, CodecError, RegistryError, SignedMessage, UnsignedMessage,
        VerificationContext, VerificationError, WarpMessageVerifier, WarpVerificationError,
    };
    use shared_crypto::BlsKeyPair;
    use shared_types::SubnetId;

    use crate::fixtures::*;

    fn rejected(reason: VerificationError) -> Result<(), WarpVerificationError> {
        Err(WarpVerificationError::Verification(reason))
    }

    #[test]
    fn exploit_payload_bit_flip() {
        let testbed = WarpTestbed::two_validators();
        let signed = testbed.sign_all(&addressed_message(SENDER, [1; 20], b"pay 1"));

        let mut payload = signed.unsigned.payload().to_vec();
        *payload.last_mut().unwrap() ^= 0x01;
        let tampered = SignedMessage::new(
            UnsignedMessage::new(NETWORK_ID, SOURCE_CHAIN, payload).unwrap(),
            signed.signature.clone(),
        );

        assert_eq!(
            testbed.verifier().verify(&tampered, MINIMUM_HEIGHT),
            rejected(VerificationError::BadSignature)
        );
    }

    #[test]
    fn exploit_claim_absent_signer() {
        let testbed = WarpTestbed::new(&[40, 30, 30]);
        let message = block_hash_message([1; 32]);
        let honest = testbed.sign(&message, &[1, 2]);
        assert!(matches!(
            testbed.verifier().verify(&honest, MINIMUM_HEIGHT),
            Err(WarpVerificationError::Verification(
                VerificationError::QuorumNotReached { .. }
            ))
        ));

        // Add validator 0's bit without its signature to reach quorum.
        let mut signers = honest.signature.signers.clone();
        signers.add(0);
        let inflated = SignedMessage::new(
            message,
            BitSetSignature::new(signers, honest.signature.signature),
        );
        assert_eq!(
            testbed.verifier().verify(&inflated, MINIMUM_HEIGHT),
            rejected(VerificationError::BadSignature)
        );
    }

    #[test]
    fn exploit_outsider_key() {
        let testbed = WarpTestbed::two_validators();
        let message = block_hash_message([2; 32]);
        let outsider = BlsKeyPair::from_seed(&[0xEE; 32]).unwrap();
        let forged = SignedMessage::new(
            message.clone(),
            BitSetSignature::new(
                BitSet::from_indices([0, 1]),
                outsider.sign(&message.to_bytes()).to_bytes(),
            ),
        );
        assert_eq!(
            testbed.verifier().verify(&forged, MINIMUM_HEIGHT),
            rejected(VerificationError::BadSignature)
        );
    }

    #[test]
    fn exploit_signature_transplant() {
        let testbed = WarpTestbed::two_validators();
        let genuine = testbed.sign_all(&block_hash_message([3; 32]));
        let transplanted =
            SignedMessage::new(block_hash_message([4; 32]), genuine.signature.clone());
        assert_eq!(
            testbed.verifier().verify(&transplanted, MINIMUM_HEIGHT),
            rejected(VerificationError::BadSignature)
        );
    }

    #[test]
    fn exploit_minority_signers() {
        let testbed = WarpTestbed::new(&[66, 34]);
        let signed = testbed.sign(&block_hash_message([5; 32]), &[0]);
        assert_eq!(
            testbed.verifier().verify(&signed, MINIMUM_HEIGHT),
            rejected(VerificationError::QuorumNotReached {
                signed_weight: 66,
                total_weight: 100,
                numerator: 67,
                denominator: 100,
            })
        );
    }

    #[test]
    fn exploit_signer_index_out_of_range() {
        let testbed = WarpTestbed::two_validators();
        let mut signed = testbed.sign_all(&block_hash_message([6; 32]));
        signed.signature.signers.add(7);
        assert_eq!(
            testbed.verifier().verify(&signed, MINIMUM_HEIGHT),
            rejected(VerificationError::SignerIndexOutOfRange {
                index: 7,
                validator_count: 2,
            })
        );
    }

    #[test]
    fn exploit_cross_network_replay() {
        let testbed = WarpTestbed::two_validators();
        let signed = testbed.sign_all(&block_hash_message([7; 32]));
        let other_network = VerificationContext {
            network_id: NETWORK_ID + 1,
            ..testbed.context()
        };
        let verifier = WarpMessageVerifier::new(testbed.registry.clone(), other_network);
        assert_eq!(
            verifier.verify(&signed, MINIMUM_HEIGHT),
            Err(WarpVerificationError::WrongNetworkId {
                expected: NETWORK_ID + 1,
                actual: NETWORK_ID,
            })
        );
    }

    #[test]
    fn exploit_primary_network_signers_required() {
        let testbed = WarpTestbed::two_validators();
        let signed = testbed.sign_all(&block_hash_message([8; 32]));
        let strict = VerificationContext {
            require_primary_network_signers: true,
            ..testbed.context()
        };
        let verifier = WarpMessageVerifier::new(testbed.registry.clone(), strict);
        assert_eq!(
            verifier.verify(&signed, MINIMUM_HEIGHT),
            Err(WarpVerificationError::Registry(RegistryError::UnknownSubnet {
                subnet_id: SubnetId::PRIMARY_NETWORK,
                height: MINIMUM_HEIGHT,
            }))
        );
    }

    #[test]
    fn exploit_zero_padded_signer_bits() {
        let testbed = WarpTestbed::two_validators();
        let signed = testbed.sign_all(&block_hash_message([9; 32]));

        let mut p = Packer::default();
        p.pack_fixed(&signed.unsigned.to_bytes());
        p.pack_u8(0x00);
        p.pack_bytes(&[0x00, 0x03]);
        p.pack_fixed(&signed.signature.signature);
        let padded = p.finish();

        assert_eq!(
            SignedMessage::from_bytes(&padded),
            Err(CodecError::NonCanonicalBitSet)
        );
        // The canonical encoding of the same signers is accepted.
        assert_eq!(SignedMessage::from_bytes(&signed.to_bytes()), Ok(signed));
    }
}
