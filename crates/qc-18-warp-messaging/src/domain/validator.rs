//! # Validator Sets
//!
//! A [`CanonicalValidatorSet`] is the registry answer for one
//! `(height, subnet)` sorted by node id. Signer bit `i` refers to entry `i`,
//! so the ordering must be identical on every node.

use shared_crypto::BlsPublicKey;
use shared_types::NodeId;

use super::errors::RegistryError;

/// One validator as reported by the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorInfo {
    /// Validator identity.
    pub node_id: NodeId,
    /// BLS public key.
    pub public_key: BlsPublicKey,
    /// Stake weight.
    pub weight: u64,
}

/// Validators ordered by node id, with their total weight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalValidatorSet {
    validators: Vec<ValidatorInfo>,
    total_weight: u64,
}

impl CanonicalValidatorSet {
    /// Sort by node id and sum weights. Duplicate node ids and weight
    /// overflow are rejected.
    pub fn new(mut validators: Vec<ValidatorInfo>) -> Result<Self, RegistryError> {
        validators.sort_by(|a, b| a.node_id.cmp(&b.node_id));

        if let Some(pair) = validators.windows(2).find(|w| w[0].node_id == w[1].node_id) {
            return Err(RegistryError::DuplicateValidator {
                node_id: pair[0].node_id,
            });
        }

        let total_weight = validators
            .iter()
            .try_fold(0u64, |acc, v| acc.checked_add(v.weight))
            .ok_or(RegistryError::WeightOverflow)?;

        Ok(Self {
            validators,
            total_weight,
        })
    }

    /// Validators in canonical order.
    pub fn validators(&self) -> &[ValidatorInfo] {
        &self.validators
    }

    /// Number of validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Canonical index of `node_id`.
    pub fn index_of(&self, node_id: &NodeId) -> Option<usize> {
        self.validators
            .binary_search_by(|v| v.node_id.cmp(node_id))
            .ok()
    }
}
