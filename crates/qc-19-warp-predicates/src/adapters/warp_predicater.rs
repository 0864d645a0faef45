//! Warp predicate verification.
//!
//! A warp predicate is a packed [`SignedMessage`]; it verifies when the
//! message carries a quorum of signatures from the validators recorded at
//! the proposer's primary-network height.

use qc_18_warp_messaging::contract::{
    GAS_COST_PER_SIGNATURE_VERIFICATION, GAS_COST_PER_WARP_MESSAGE_BYTE, GAS_COST_PER_WARP_SIGNER,
};
use qc_18_warp_messaging::{SignedMessage, WarpMessageVerifier};
use tracing::trace;

use crate::domain::{unpack_predicate, PredicateError, PredicateFailure, ProposerContext};
use crate::ports::Predicater;

/// [`Predicater`] for the warp contract.
pub struct WarpPredicater {
    verifier: WarpMessageVerifier,
}

impl WarpPredicater {
    /// Predicater verifying through `verifier`.
    pub fn new(verifier: WarpMessageVerifier) -> Self {
        Self { verifier }
    }

    fn decode(packed: &[u8]) -> Result<SignedMessage, PredicateError> {
        let bytes = unpack_predicate(packed)?;
        Ok(SignedMessage::from_bytes(&bytes)?)
    }
}

impl Predicater for WarpPredicater {
    fn predicate_gas(&self, packed: &[u8]) -> Result<u64, PredicateError> {
        let message = Self::decode(packed)?;
        let signers = message.signature.num_signers() as u64;

        let bytes_gas = GAS_COST_PER_WARP_MESSAGE_BYTE.checked_mul(packed.len() as u64);
        let signer_gas = GAS_COST_PER_WARP_SIGNER.checked_mul(signers);
        bytes_gas
            .zip(signer_gas)
            .and_then(|(b, s)| {
                GAS_COST_PER_SIGNATURE_VERIFICATION
                    .checked_add(b)?
                    .checked_add(s)
            })
            .ok_or(PredicateError::GasOverflow)
    }

    fn verify_predicate(
        &self,
        context: Option<&ProposerContext>,
        packed: &[u8],
    ) -> Result<(), PredicateFailure> {
        let context = context.ok_or(PredicateFailure::MissingProposerContext)?;
        let message = Self::decode(packed)?;
        self.verifier.verify(&message, context.p_chain_height)?;
        trace!(
            "[qc-19] Warp predicate {} verified at height {}",
            message.id(),
            context.p_chain_height
        );
        Ok(())
    }
}
