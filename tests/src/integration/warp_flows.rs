//! # Send, Sign and Aggregate Flows
//!
//! A message emitted by `sendWarpMessage` on the local chain becomes
//! signable when its block is accepted; signatures from a quorum of
//! validators aggregate into a message any chain on the network verifies.

#[cfg(test)]
mod tests {
    use qc_18_warp_messaging::contract::{pack_send_warp_message, WARP_CONTRACT_ADDRESS};
    use qc_18_warp_messaging::{
        canonical_validator_set, new_addressed_payload, new_block_hash_payload, Payload,
        QuorumThreshold, SignatureAggregator, UnsignedMessage, VerificationError,
        WarpBackendApi, WarpError, WarpVerificationError,
    };
    use qc_19_warp_predicates::{PredicateBlockApi, PredicateTransaction};
    use shared_crypto::{keccak256, BlsSignature};
    use shared_types::{ChainId, MessageId};

    use crate::fixtures::*;

    const DESTINATION_CHAIN: ChainId = ChainId([0xD0; 32]);
    const DESTINATION: [u8; 20] = [0xBE; 20];

    fn send_tx(payload: &[u8]) -> PredicateTransaction {
        PredicateTransaction {
            nonce: 0,
            from: SENDER,
            to: Some(WARP_CONTRACT_ADDRESS),
            value: 0,
            gas_limit: 1_000_000,
            gas_price: 1,
            data: pack_send_warp_message(DESTINATION_CHAIN, DESTINATION, payload),
            access_list: vec![],
        }
    }

    fn word(address: [u8; 20]) -> [u8; 32] {
        let mut w = [0u8; 32];
        w[12..].copy_from_slice(&address);
        w
    }

    // =========================================================================
    // SEND
    // =========================================================================

    #[test]
    fn test_send_warp_message_log() {
        let testbed = WarpTestbed::two_validators();
        let (backends, _) = testbed.backends();
        let service = testbed.block_service(backends[0].clone());
        let payload: Vec<u8> = (0..100).map(|_| rand::random::<u8>()).collect();

        let block = service
            .build_block_with_context([0; 32], 1, 1, vec![send_tx(&payload)], None)
            .unwrap();
        let receipts = service.receipts(&block.hash()).unwrap();
        assert_eq!(receipts.len(), 1);
        assert!(receipts[0].is_success());

        let log = &receipts[0].logs[0];
        assert_eq!(receipts[0].logs.len(), 1);
        assert_eq!(log.address, WARP_CONTRACT_ADDRESS);
        assert_eq!(
            log.topics,
            vec![
                keccak256(b"SendWarpMessage(bytes32,address,address,bytes)"),
                DESTINATION_CHAIN.0,
                word(DESTINATION),
                word(SENDER),
            ]
        );

        let unsigned = UnsignedMessage::from_bytes(&log.data).unwrap();
        assert_eq!(unsigned.network_id(), NETWORK_ID);
        assert_eq!(unsigned.source_chain_id(), LOCAL_CHAIN);
        match unsigned.parsed_payload().unwrap() {
            Payload::Addressed(p) => {
                assert_eq!(p.source_address, SENDER);
                assert_eq!(p.destination_chain_id, DESTINATION_CHAIN);
                assert_eq!(p.destination_address, DESTINATION);
                assert_eq!(p.payload, payload);
            }
            other => panic!("unexpected payload {other:?}"),
        }
        assert_eq!(receipts[0].output, unsigned.id().0.to_vec());
    }

    #[test]
    fn test_signature_gated_on_accept() {
        let testbed = WarpTestbed::two_validators();
        let (backends, _) = testbed.backends();
        let service = testbed.block_service(backends[0].clone());

        let block = service
            .build_block_with_context([0; 32], 1, 1, vec![send_tx(b"gated")], None)
            .unwrap();
        let hash = block.hash();
        let receipts = service.receipts(&hash).unwrap();
        let unsigned = UnsignedMessage::from_bytes(&receipts[0].logs[0].data).unwrap();
        let id = unsigned.id();

        assert_eq!(
            backends[0].get_signature(&id),
            Err(WarpError::NotFound { message_id: id })
        );
        assert!(matches!(
            backends[0].get_block_signature(&hash),
            Err(WarpError::BlockNotAccepted { .. })
        ));

        service.verify(&hash).unwrap();
        service.accept(&hash).unwrap();

        let raw = backends[0].get_signature(&id).unwrap();
        let signature = BlsSignature::from_bytes(&raw).unwrap();
        assert!(testbed.keys[0]
            .public_key()
            .verify(&unsigned.to_bytes(), &signature));
        assert!(backends[0].get_block_signature(&hash).is_ok());
    }

    #[test]
    fn test_rejected_block_never_signed() {
        let testbed = WarpTestbed::two_validators();
        let (backends, _) = testbed.backends();
        let service = testbed.block_service(backends[0].clone());

        let hash = service
            .build_block_with_context([0; 32], 1, 1, vec![send_tx(b"doomed")], None)
            .unwrap()
            .hash();
        let receipts = service.receipts(&hash).unwrap();
        let id = UnsignedMessage::from_bytes(&receipts[0].logs[0].data)
            .unwrap()
            .id();

        service.reject(&hash).unwrap();
        assert!(backends[0].get_signature(&id).is_err());
        assert!(backends[0].get_message(&id).is_err());
    }

    // =========================================================================
    // AGGREGATE
    // =========================================================================

    /// Every validator runs the same block; the aggregate of their signatures
    /// verifies against the registry.
    #[test]
    fn test_aggregate_and_verify() {
        let testbed = WarpTestbed::new(&[30, 30, 40]);
        let (backends, getter) = testbed.backends();
        let message = UnsignedMessage::new(
            NETWORK_ID,
            LOCAL_CHAIN,
            new_addressed_payload(
                SENDER,
                DESTINATION_CHAIN,
                DESTINATION,
                b"to everyone",
            )
            .unwrap(),
        )
        .unwrap();

        for backend in &backends {
            backend.add_message([7; 32], message.clone()).unwrap();
            backend.accept_block(&[7; 32]).unwrap();
        }

        let validators =
            canonical_validator_set(testbed.registry.as_ref(), MINIMUM_HEIGHT, &LOCAL_SUBNET)
                .unwrap();
        let aggregator = SignatureAggregator::new(getter);
        let signed = aggregator
            .aggregate(&message, &validators, QuorumThreshold::default())
            .unwrap();

        // 30 + 30 is short of 67%, so the third validator is needed.
        assert_eq!(signed.signature.num_signers(), 3);
        testbed.verifier().verify(&signed, MINIMUM_HEIGHT).unwrap();
    }

    #[test]
    fn test_aggregate_short_of_quorum() {
        let testbed = WarpTestbed::new(&[50, 30, 20]);
        let (backends, getter) = testbed.backends();
        let payload = new_block_hash_payload([3; 32]);
        let message = UnsignedMessage::new(NETWORK_ID, LOCAL_CHAIN, payload).unwrap();
        // Only the first validator saw the block.
        backends[0].add_message([7; 32], message.clone()).unwrap();
        backends[0].accept_block(&[7; 32]).unwrap();

        let validators =
            canonical_validator_set(testbed.registry.as_ref(), MINIMUM_HEIGHT, &LOCAL_SUBNET)
                .unwrap();
        let result = SignatureAggregator::new(getter).aggregate(
            &message,
            &validators,
            QuorumThreshold::default(),
        );
        assert!(matches!(
            result,
            Err(WarpError::Verification(VerificationError::QuorumNotReached { .. }))
        ));
    }

    #[test]
    fn test_signed_message_verifies_only_at_known_heights() {
        let testbed = WarpTestbed::two_validators();
        let signed = testbed.sign_all(&block_hash_message([1; 32]));
        let verifier = testbed.verifier();

        assert_eq!(verifier.verify(&signed, MINIMUM_HEIGHT), Ok(()));
        assert_eq!(verifier.verify(&signed, MINIMUM_HEIGHT + 100), Ok(()));
        assert!(matches!(
            verifier.verify(&signed, MINIMUM_HEIGHT - 1),
            Err(WarpVerificationError::Registry(_))
        ));
    }

    #[test]
    fn test_same_message_same_id_everywhere() {
        let a = addressed_message(SENDER, DESTINATION, b"same");
        let b = addressed_message(SENDER, DESTINATION, b"same");
        assert_eq!(a.id(), b.id());
        assert_eq!(a.id(), MessageId(shared_crypto::sha256(&a.to_bytes())));
    }
}
