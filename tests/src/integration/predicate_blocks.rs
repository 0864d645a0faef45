//! # Predicate Block Flows
//!
//! A signed warp message rides in a transaction's access list. The builder
//! verifies it against the validator set at the proposer's primary-network
//! height and commits the outcome into the header; the receiving contract
//! reads the outcome through the warp getters.
//!
//! Validator sets exist from height 10, so a block built at height 9 marks
//! every warp predicate invalid while the transaction itself still executes.

#[cfg(test)]
mod tests {
    use qc_18_warp_messaging::contract::WARP_CONTRACT_ADDRESS;
    use qc_18_warp_messaging::{SignedMessage, UnsignedMessage};
    use qc_19_warp_predicates::domain::to_storage_keys;
    use qc_19_warp_predicates::{
        new_predicate_tx, pack_predicate, pack_validate_get_blockchain_id,
        pack_validate_invalid_warp_block_hash, pack_validate_invalid_warp_message,
        pack_validate_warp_block_hash, pack_validate_warp_message, AccessTuple, Block,
        BlockError, BlockStatus, HeaderPredicateResults, PredicateBlockApi,
        PredicateBlockService, PredicateTransaction, ProposerContext, ReceiptStatus,
    };
    use shared_types::{ChainId, Hash};

    use crate::fixtures::*;

    const ORIGIN_SENDER: [u8; 20] = [0x37; 20];
    const DESTINATION: [u8; 20] = [0x09; 20];
    const PAYLOAD: &[u8] = &[1, 2, 3];

    /// Stand-in for deploying the receiving contract.
    fn create_tx() -> PredicateTransaction {
        PredicateTransaction {
            nonce: 0,
            from: SENDER,
            to: None,
            value: 0,
            gas_limit: 7_000_000,
            gas_price: 1,
            data: vec![0x60, 0x80],
            access_list: vec![],
        }
    }

    fn receive_tx(nonce: u64, signed: &SignedMessage, data: Vec<u8>) -> PredicateTransaction {
        new_predicate_tx(
            nonce,
            SENDER,
            Some(RECEIVER_ADDRESS),
            1_000_000,
            1,
            data,
            vec![],
            WARP_CONTRACT_ADDRESS,
            &signed.to_bytes(),
        )
    }

    fn valid_message() -> UnsignedMessage {
        addressed_message(ORIGIN_SENDER, DESTINATION, PAYLOAD)
    }

    fn validate_call() -> Vec<u8> {
        pack_validate_warp_message(
            0,
            SOURCE_CHAIN,
            ORIGIN_SENDER,
            LOCAL_CHAIN,
            DESTINATION,
            PAYLOAD,
        )
    }

    /// Build at `height`, verify under the same context and accept. Every
    /// receipt must succeed.
    fn run_block(
        testbed: &WarpTestbed,
        signed: &SignedMessage,
        data: Vec<u8>,
        height: u64,
    ) -> (PredicateBlockService, Hash) {
        let (backends, _) = testbed.backends();
        let service = testbed.block_service(backends[0].clone());
        let context = ProposerContext::new(height);

        let block = service
            .build_block_with_context(
                [0; 32],
                1,
                2,
                vec![create_tx(), receive_tx(1, signed, data)],
                Some(&context),
            )
            .unwrap();
        let hash = block.hash();
        assert_eq!(block.transactions.len(), 2);

        assert!(service.should_verify_with_context(&hash).unwrap());
        service.verify_with_context(&hash, &context).unwrap();
        assert_eq!(service.status(&hash).unwrap(), BlockStatus::Verified);
        service.accept(&hash).unwrap();

        let receipts = service.receipts(&hash).unwrap();
        assert_eq!(receipts.len(), 2);
        for (i, receipt) in receipts.iter().enumerate() {
            assert_eq!(receipt.status, ReceiptStatus::Success, "index: {i}");
            assert!(receipt.output.is_empty());
        }
        (service, hash)
    }

    // =========================================================================
    // RECEIVING CONTRACT
    // =========================================================================

    #[test]
    fn test_validate_warp_message() {
        let testbed = WarpTestbed::two_validators();
        let signed = testbed.sign_all(&valid_message());
        let (service, hash) = run_block(&testbed, &signed, validate_call(), MINIMUM_HEIGHT);
        assert_eq!(service.predicate_results(&hash).unwrap().count_failed(), 0);
    }

    #[test]
    fn test_validate_invalid_warp_message() {
        let testbed = WarpTestbed::two_validators();
        let signed = testbed.sign_all(&valid_message());
        let (service, hash) = run_block(
            &testbed,
            &signed,
            pack_validate_invalid_warp_message(0),
            MINIMUM_HEIGHT - 1,
        );
        assert_eq!(service.predicate_results(&hash).unwrap().count_failed(), 1);
    }

    #[test]
    fn test_validate_warp_block_hash() {
        let testbed = WarpTestbed::two_validators();
        let block_hash = rand::random::<[u8; 32]>();
        let signed = testbed.sign_all(&block_hash_message(block_hash));
        run_block(
            &testbed,
            &signed,
            pack_validate_warp_block_hash(0, SOURCE_CHAIN, block_hash),
            MINIMUM_HEIGHT,
        );
    }

    #[test]
    fn test_validate_invalid_warp_block_hash() {
        let testbed = WarpTestbed::two_validators();
        let signed = testbed.sign_all(&block_hash_message(rand::random()));
        run_block(
            &testbed,
            &signed,
            pack_validate_invalid_warp_block_hash(0),
            MINIMUM_HEIGHT - 1,
        );
    }

    #[test]
    fn test_validate_get_blockchain_id() {
        let testbed = WarpTestbed::two_validators();
        let signed = testbed.sign_all(&valid_message());
        run_block(
            &testbed,
            &signed,
            pack_validate_get_blockchain_id(LOCAL_CHAIN),
            MINIMUM_HEIGHT,
        );
    }

    #[test]
    fn test_wrong_destination_reverts() {
        let testbed = WarpTestbed::two_validators();
        let (backends, _) = testbed.backends();
        let service = testbed.block_service(backends[0].clone());
        let signed = testbed.sign_all(&valid_message());
        let call = pack_validate_warp_message(
            0,
            SOURCE_CHAIN,
            ORIGIN_SENDER,
            LOCAL_CHAIN,
            [0xFF; 20],
            PAYLOAD,
        );
        let context = ProposerContext::new(MINIMUM_HEIGHT);

        let block = service
            .build_block_with_context(
                [0; 32],
                1,
                2,
                vec![receive_tx(0, &signed, call)],
                Some(&context),
            )
            .unwrap();
        let hash = block.hash();
        service.verify_with_context(&hash, &context).unwrap();

        let receipts = service.receipts(&hash).unwrap();
        assert_eq!(
            receipts[0].status,
            ReceiptStatus::Reverted {
                reason: "Execution reverted: invalid destination address".into()
            }
        );
        assert_eq!(receipts[0].gas_used, 1_000_000);
    }

    #[test]
    fn test_receive_gas() {
        let testbed = WarpTestbed::two_validators();
        let signed = testbed.sign_all(&valid_message());
        let packed = pack_predicate(&signed.to_bytes()).len() as u64;
        let (service, hash) = run_block(&testbed, &signed, validate_call(), MINIMUM_HEIGHT);

        let intrinsic = 21_000 + 200_000 + 100 * packed + 500 * 2;
        let getter = 2 + 100 * packed;
        assert_eq!(
            service.receipts(&hash).unwrap()[1].gas_used,
            intrinsic + getter
        );
    }

    #[test]
    fn test_predicate_indices() {
        let testbed = WarpTestbed::two_validators();
        let foreign = UnsignedMessage::new(
            NETWORK_ID + 1,
            SOURCE_CHAIN,
            valid_message().payload().to_vec(),
        )
        .unwrap();
        let bad = testbed.sign_all(&foreign);
        let good = testbed.sign_all(&valid_message());

        let with_both = |nonce, data| {
            new_predicate_tx(
                nonce,
                SENDER,
                Some(RECEIVER_ADDRESS),
                1_000_000,
                1,
                data,
                vec![AccessTuple {
                    address: WARP_CONTRACT_ADDRESS,
                    storage_keys: to_storage_keys(&pack_predicate(&bad.to_bytes())),
                }],
                WARP_CONTRACT_ADDRESS,
                &good.to_bytes(),
            )
        };
        let check_good = pack_validate_warp_message(
            1,
            SOURCE_CHAIN,
            ORIGIN_SENDER,
            LOCAL_CHAIN,
            DESTINATION,
            PAYLOAD,
        );
        let txs = vec![
            with_both(0, check_good),
            with_both(1, pack_validate_invalid_warp_message(0)),
        ];

        let (backends, _) = testbed.backends();
        let service = testbed.block_service(backends[0].clone());
        let context = ProposerContext::new(MINIMUM_HEIGHT);
        let hash = service
            .build_block_with_context([0; 32], 1, 2, txs.clone(), Some(&context))
            .unwrap()
            .hash();

        let results = service.predicate_results(&hash).unwrap();
        for tx in &txs {
            let failed = results.failed_slots(&tx.hash(), &WARP_CONTRACT_ADDRESS);
            assert!(failed.contains(0));
            assert!(!failed.contains(1));
        }
        for receipt in service.receipts(&hash).unwrap() {
            assert!(receipt.is_success());
        }
    }

    // =========================================================================
    // CONTEXT RE-VERIFICATION
    // =========================================================================

    #[test]
    fn test_receive_warp_message() {
        let testbed = WarpTestbed::two_validators();
        let (backends, _) = testbed.backends();
        let service = testbed.block_service(backends[0].clone());
        let signed = testbed.sign_all(&valid_message());

        let build_context = ProposerContext::new(MINIMUM_HEIGHT);
        let block = service
            .build_block_with_context(
                [0; 32],
                1,
                2,
                vec![receive_tx(0, &signed, validate_call())],
                Some(&build_context),
            )
            .unwrap();
        let hash = block.hash();

        service
            .verify_with_context(&hash, &ProposerContext::new(MINIMUM_HEIGHT + 1))
            .unwrap();
        assert_eq!(
            service.verify_with_context(&hash, &ProposerContext::new(MINIMUM_HEIGHT - 1)),
            Err(BlockError::InvalidHeaderPredicateResults { block_hash: hash })
        );
        assert_eq!(
            service.verify(&hash),
            Err(BlockError::InvalidHeaderPredicateResults { block_hash: hash })
        );
        service.verify_with_context(&hash, &build_context).unwrap();
        service.accept(&hash).unwrap();
        assert!(service.receipts(&hash).unwrap()[0].is_success());
    }

    #[test]
    fn test_peer_reverifies_imported_block() {
        let testbed = WarpTestbed::two_validators();
        let (backends, _) = testbed.backends();
        let builder = testbed.block_service(backends[0].clone());
        let peer = testbed.block_service(backends[1].clone());
        let signed = testbed.sign_all(&valid_message());
        let context = ProposerContext::new(MINIMUM_HEIGHT);

        let block = builder
            .build_block_with_context(
                [0; 32],
                1,
                2,
                vec![receive_tx(0, &signed, validate_call())],
                Some(&context),
            )
            .unwrap();

        let hash = peer.import_block(block).unwrap();
        assert_eq!(peer.status(&hash).unwrap(), BlockStatus::Built);
        assert!(peer.receipts(&hash).unwrap().is_empty());

        peer.verify_with_context(&hash, &context).unwrap();
        peer.accept(&hash).unwrap();
        assert_eq!(peer.receipts(&hash), builder.receipts(&hash));
    }

    #[test]
    fn test_forged_header_results_rejected() {
        let testbed = WarpTestbed::two_validators();
        let (backends, _) = testbed.backends();
        let builder = testbed.block_service(backends[0].clone());
        let peer = testbed.block_service(backends[1].clone());
        let signed = testbed.sign_all(&valid_message());
        let context = ProposerContext::new(MINIMUM_HEIGHT - 1);

        let honest = builder
            .build_block_with_context(
                [0; 32],
                1,
                2,
                vec![receive_tx(0, &signed, validate_call())],
                Some(&context),
            )
            .unwrap();

        // Claim the failed predicate verified.
        let forged = Block::new(
            [0; 32],
            1,
            2,
            honest.transactions.clone(),
            HeaderPredicateResults::new().to_bytes(),
        );
        let hash = peer.import_block(forged).unwrap();
        assert_eq!(
            peer.verify_with_context(&hash, &context),
            Err(BlockError::InvalidHeaderPredicateResults { block_hash: hash })
        );
        assert!(matches!(
            peer.accept(&hash),
            Err(BlockError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_verify_after_reject_fails() {
        let testbed = WarpTestbed::two_validators();
        let (backends, _) = testbed.backends();
        let service = testbed.block_service(backends[0].clone());
        let context = ProposerContext::new(MINIMUM_HEIGHT);
        let hash = service
            .build_block_with_context([0; 32], 1, 2, vec![create_tx()], Some(&context))
            .unwrap()
            .hash();

        assert!(!service.should_verify_with_context(&hash).unwrap());
        service.reject(&hash).unwrap();
        assert_eq!(
            service.verify(&hash),
            Err(BlockError::InvalidTransition {
                from: BlockStatus::Rejected,
                to: BlockStatus::Verified
            })
        );
    }

    #[test]
    fn test_other_chain_id_rejected_by_receiver() {
        let testbed = WarpTestbed::two_validators();
        let signed = testbed.sign_all(&valid_message());
        let (backends, _) = testbed.backends();
        let service = testbed.block_service(backends[0].clone());
        let hash = service
            .build_block_with_context(
                [0; 32],
                1,
                2,
                vec![receive_tx(
                    0,
                    &signed,
                    pack_validate_get_blockchain_id(ChainId([9; 32])),
                )],
                Some(&ProposerContext::new(MINIMUM_HEIGHT)),
            )
            .unwrap()
            .hash();
        assert!(!service.receipts(&hash).unwrap()[0].is_success());
    }
}
