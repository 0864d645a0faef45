//! # Signature Aggregation
//!
//! Collects individual validator signatures over an unsigned message until
//! the collected weight reaches the quorum, then aggregates them into a
//! [`SignedMessage`].
//!
//! Signatures that fail individual verification are skipped; a bad peer
//! cannot poison the aggregate.

use std::sync::Arc;

use quantum_telemetry::{metric_inc, WARP_SIGNATURE_REQUESTS};
use shared_crypto::BlsSignature;
use tracing::{debug, warn};

use crate::domain::{
    BitSet, BitSetSignature, CanonicalValidatorSet, QuorumThreshold, SignedMessage,
    UnsignedMessage, VerificationError,
};
use crate::error::{WarpError, WarpResult};
use crate::ports::SignatureGetter;

/// Builds signed messages from per-validator signatures.
pub struct SignatureAggregator {
    getter: Arc<dyn SignatureGetter>,
}

impl SignatureAggregator {
    /// Create an aggregator fetching through `getter`.
    pub fn new(getter: Arc<dyn SignatureGetter>) -> Self {
        Self { getter }
    }

    /// Gather signatures from `validators` until `quorum` is met.
    ///
    /// Validators are asked in canonical order. Returns
    /// `VerificationError::QuorumNotReached` if every validator has been
    /// asked and the valid weight is still short.
    pub fn aggregate(
        &self,
        message: &UnsignedMessage,
        validators: &CanonicalValidatorSet,
        quorum: QuorumThreshold,
    ) -> WarpResult<SignedMessage> {
        let bytes = message.to_bytes();
        let total_weight = validators.total_weight();

        let mut signers = BitSet::new();
        let mut signatures: Vec<BlsSignature> = Vec::new();
        let mut signed_weight: u64 = 0;

        for (index, validator) in validators.validators().iter().enumerate() {
            if !signatures.is_empty() && quorum.is_reached(signed_weight, total_weight) {
                break;
            }

            let raw = match self.getter.get_signature(&validator.node_id, message) {
                Ok(raw) => raw,
                Err(e) => {
                    debug!(
                        "[qc-18] No signature from {} for {}: {}",
                        validator.node_id,
                        message.id(),
                        e
                    );
                    metric_inc!(WARP_SIGNATURE_REQUESTS, &["peer", "unavailable"]);
                    continue;
                }
            };

            let signature = match BlsSignature::from_bytes(&raw) {
                Ok(sig) if validator.public_key.verify(&bytes, &sig) => sig,
                _ => {
                    warn!(
                        "[qc-18] Invalid signature from {} for {}",
                        validator.node_id,
                        message.id()
                    );
                    metric_inc!(WARP_SIGNATURE_REQUESTS, &["peer", "invalid"]);
                    continue;
                }
            };

            metric_inc!(WARP_SIGNATURE_REQUESTS, &["peer", "ok"]);
            signers.add(index);
            signatures.push(signature);
            signed_weight = signed_weight
                .checked_add(validator.weight)
                .ok_or(VerificationError::WeightOverflow)?;
        }

        quorum.verify_weight(signed_weight, total_weight)?;
        if signatures.is_empty() {
            return Err(WarpError::Verification(VerificationError::EmptySignerSet));
        }

        let aggregate = BlsSignature::aggregate(signatures.iter())
            .map_err(|_| VerificationError::BadSignature)?;

        debug!(
            "[qc-18] Aggregated {} signatures ({} of {} weight) for {}",
            signers.len(),
            signed_weight,
            total_weight,
            message.id()
        );

        Ok(SignedMessage::new(
            message.clone(),
            BitSetSignature::new(signers, aggregate.to_bytes()),
        ))
    }
}
