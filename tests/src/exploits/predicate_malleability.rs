//! # Predicate Malleability
//!
//! Attempts to smuggle alternative encodings of a predicate past the
//! builder, or to change which slot a verified message occupies:
//!
//! - extra zero padding, a missing delimiter or all-zero keys make the
//!   transaction invalid; the builder leaves it out
//! - a predicate verified in one transaction does not vouch for the same
//!   message in another transaction at a failing height

#[cfg(test)]
mod tests {
    use qc_18_warp_messaging::contract::WARP_CONTRACT_ADDRESS;
    use qc_19_warp_predicates::domain::{to_storage_keys, unpack_predicate};
    use qc_19_warp_predicates::{
        new_predicate_tx, pack_predicate, pack_validate_invalid_warp_message, AccessTuple,
        PredicateBlockApi, PredicateError, PredicateTransaction, ProposerContext,
    };

    use crate::fixtures::*;

    fn tx_with_keys(keys: Vec<[u8; 32]>) -> PredicateTransaction {
        PredicateTransaction {
            nonce: 0,
            from: SENDER,
            to: Some(RECEIVER_ADDRESS),
            value: 0,
            gas_limit: 1_000_000,
            gas_price: 1,
            data: pack_validate_invalid_warp_message(0),
            access_list: vec![AccessTuple {
                address: WARP_CONTRACT_ADDRESS,
                storage_keys: keys,
            }],
        }
    }

    fn signed_bytes(testbed: &WarpTestbed) -> Vec<u8> {
        testbed
            .sign_all(&addressed_message(SENDER, RECEIVER_ADDRESS, b"malleable"))
            .to_bytes()
    }

    #[test]
    fn exploit_extra_padding_word() {
        let testbed = WarpTestbed::two_validators();
        let mut packed = pack_predicate(&signed_bytes(&testbed));
        packed.extend_from_slice(&[0u8; 32]);
        assert!(matches!(
            unpack_predicate(&packed),
            Err(PredicateError::InvalidPadding { .. })
        ));

        let (backends, _) = testbed.backends();
        let service = testbed.block_service(backends[0].clone());
        let block = service
            .build_block_with_context(
                [0; 32],
                1,
                2,
                vec![tx_with_keys(to_storage_keys(&packed))],
                Some(&ProposerContext::new(MINIMUM_HEIGHT)),
            )
            .unwrap();
        assert!(block.transactions.is_empty());
    }

    #[test]
    fn exploit_missing_delimiter() {
        let testbed = WarpTestbed::two_validators();
        let mut packed = pack_predicate(&signed_bytes(&testbed));
        let delimiter = packed.iter().rposition(|b| *b != 0).unwrap();
        packed[delimiter] = 0xFE;
        assert_eq!(
            unpack_predicate(&packed),
            Err(PredicateError::InvalidEndDelimiter)
        );
    }

    #[test]
    fn exploit_all_zero_predicate() {
        let testbed = WarpTestbed::two_validators();
        let (backends, _) = testbed.backends();
        let service = testbed.block_service(backends[0].clone());
        let block = service
            .build_block_with_context(
                [0; 32],
                1,
                2,
                vec![tx_with_keys(vec![[0; 32]; 4])],
                Some(&ProposerContext::new(MINIMUM_HEIGHT)),
            )
            .unwrap();
        assert!(block.transactions.is_empty());
    }

    #[test]
    fn exploit_result_reuse_across_heights() {
        let testbed = WarpTestbed::two_validators();
        let bytes = signed_bytes(&testbed);
        let tx = new_predicate_tx(
            0,
            SENDER,
            Some(RECEIVER_ADDRESS),
            1_000_000,
            1,
            pack_validate_invalid_warp_message(0),
            vec![],
            WARP_CONTRACT_ADDRESS,
            &bytes,
        );

        let (backends, _) = testbed.backends();
        let service = testbed.block_service(backends[0].clone());
        let valid_at = ProposerContext::new(MINIMUM_HEIGHT);
        let failing_at = ProposerContext::new(MINIMUM_HEIGHT - 1);

        let verified = service
            .build_block_with_context([0; 32], 1, 2, vec![tx.clone()], Some(&valid_at))
            .unwrap();
        let unverified = service
            .build_block_with_context([1; 32], 1, 2, vec![tx], Some(&failing_at))
            .unwrap();

        assert_ne!(
            verified.header.predicate_results,
            unverified.header.predicate_results
        );
        // validateInvalidWarpMessage reverts where the predicate verified.
        assert!(!service.receipts(&verified.hash()).unwrap()[0].is_success());
        assert!(service.receipts(&unverified.hash()).unwrap()[0].is_success());
    }
}
