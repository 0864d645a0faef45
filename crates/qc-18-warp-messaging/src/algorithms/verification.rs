//! # Warp Message Verification
//!
//! Resolves the validator set that must have signed a message and checks
//! the aggregate signature against it.
//!
//! 1. message network id must match ours
//! 2. source chain is mapped to its subnet; a primary-network source is
//!    checked against our own subnet unless primary signers are required
//! 3. validator set at the proposer's primary-network height is
//!    canonicalized
//! 4. quorum and BLS check on the bit-set signature

use std::sync::Arc;

use quantum_telemetry::{metric_inc, time_histogram, WARP_VERIFICATIONS, WARP_VERIFICATION_DURATION};
use shared_types::SubnetId;
use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, WarpConfig};
use crate::domain::{
    CanonicalValidatorSet, QuorumThreshold, RegistryError, SignedMessage, VerificationError,
};
use crate::ports::ValidatorRegistry;

/// Why an incoming warp message was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WarpVerificationError {
    /// Message was signed for another network.
    #[error("Wrong network id: expected {expected}, got {actual}")]
    WrongNetworkId {
        /// Local network id
        expected: u32,
        /// Message network id
        actual: u32,
    },

    /// Validator set could not be resolved.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Signature did not attest the message.
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

impl WarpVerificationError {
    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::WrongNetworkId { .. } => "wrong_network",
            Self::Registry(_) => "registry",
            Self::Verification(VerificationError::QuorumNotReached { .. }) => "quorum",
            Self::Verification(_) => "signature",
        }
    }
}

/// Local parameters every verification needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerificationContext {
    /// Local network id.
    pub network_id: u32,
    /// Subnet validating this chain.
    pub local_subnet_id: SubnetId,
    /// Required fraction of weight.
    pub quorum: QuorumThreshold,
    /// Check primary-network messages against the primary network itself.
    pub require_primary_network_signers: bool,
}

impl VerificationContext {
    /// Context derived from chain configuration.
    pub fn from_config(config: &WarpConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            network_id: config.network_id,
            local_subnet_id: config.subnet_id,
            quorum: config.quorum()?,
            require_primary_network_signers: config.require_primary_network_signers,
        })
    }

    /// Subnet whose validators must have signed a message from `source`.
    pub fn signing_subnet(&self, source: SubnetId) -> SubnetId {
        if source == SubnetId::PRIMARY_NETWORK && !self.require_primary_network_signers {
            self.local_subnet_id
        } else {
            source
        }
    }
}

/// Canonical validator set of `subnet_id` at `height`.
pub fn canonical_validator_set<R: ValidatorRegistry + ?Sized>(
    registry: &R,
    height: u64,
    subnet_id: &SubnetId,
) -> Result<CanonicalValidatorSet, RegistryError> {
    CanonicalValidatorSet::new(registry.validator_set(height, subnet_id)?)
}

/// Verify `message` against the validators recorded at primary-network
/// `height`.
pub fn verify_warp_message<R: ValidatorRegistry + ?Sized>(
    message: &SignedMessage,
    context: &VerificationContext,
    registry: &R,
    height: u64,
) -> Result<(), WarpVerificationError> {
    let _timer = time_histogram!(WARP_VERIFICATION_DURATION);

    let result = verify_inner(message, context, registry, height);
    match &result {
        Ok(()) => metric_inc!(WARP_VERIFICATIONS, &["valid"]),
        Err(e) => {
            debug!(
                "[qc-18] Warp message {} rejected at height {}: {}",
                message.id(),
                height,
                e
            );
            metric_inc!(WARP_VERIFICATIONS, &[e.label()])
        }
    }
    result
}

fn verify_inner<R: ValidatorRegistry + ?Sized>(
    message: &SignedMessage,
    context: &VerificationContext,
    registry: &R,
    height: u64,
) -> Result<(), WarpVerificationError> {
    let unsigned = &message.unsigned;
    if unsigned.network_id() != context.network_id {
        return Err(WarpVerificationError::WrongNetworkId {
            expected: context.network_id,
            actual: unsigned.network_id(),
        });
    }

    let source_subnet = registry.subnet_of(&unsigned.source_chain_id())?;
    let subnet = context.signing_subnet(source_subnet);
    let validators = canonical_validator_set(registry, height, &subnet)?;

    message
        .signature
        .verify(unsigned, &validators, context.quorum)?;
    Ok(())
}

/// Verifier bound to one registry and context.
#[derive(Clone)]
pub struct WarpMessageVerifier {
    registry: Arc<dyn ValidatorRegistry>,
    context: VerificationContext,
}

impl WarpMessageVerifier {
    /// Create a verifier.
    pub fn new(registry: Arc<dyn ValidatorRegistry>, context: VerificationContext) -> Self {
        Self { registry, context }
    }

    /// Verification parameters.
    pub fn context(&self) -> &VerificationContext {
        &self.context
    }

    /// Underlying registry.
    pub fn registry(&self) -> &Arc<dyn ValidatorRegistry> {
        &self.registry
    }

    /// Verify `message` at primary-network `height`.
    pub fn verify(&self, message: &SignedMessage, height: u64) -> Result<(), WarpVerificationError> {
        verify_warp_message(message, &self.context, self.registry.as_ref(), height)
    }
}
