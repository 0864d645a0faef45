//! # Validator Registry Adapters
//!
//! - [`InMemoryValidatorRegistry`]: snapshots keyed by height, for tests
//!   and single-node deployments
//! - [`CachingValidatorRegistry`]: memoizes validator sets of an inner
//!   registry

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use shared_types::{ChainId, SubnetId};
use tracing::trace;

use crate::domain::{RegistryError, ValidatorInfo};
use crate::ports::ValidatorRegistry;

#[derive(Default)]
struct RegistryState {
    chains: HashMap<ChainId, SubnetId>,
    snapshots: HashMap<SubnetId, BTreeMap<u64, Vec<ValidatorInfo>>>,
}

/// Validator snapshots held in memory.
///
/// A query at height `h` answers with the latest snapshot recorded at or
/// below `h`. Heights below `minimum_height` are no longer retained.
pub struct InMemoryValidatorRegistry {
    minimum_height: u64,
    state: RwLock<RegistryState>,
}

impl InMemoryValidatorRegistry {
    /// Empty registry serving heights from `minimum_height` up.
    pub fn new(minimum_height: u64) -> Self {
        Self {
            minimum_height,
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Builder form of [`Self::register_chain`].
    pub fn with_chain(self, chain_id: ChainId, subnet_id: SubnetId) -> Self {
        self.register_chain(chain_id, subnet_id);
        self
    }

    /// Builder form of [`Self::set_validators`].
    pub fn with_validators(
        self,
        subnet_id: SubnetId,
        height: u64,
        validators: Vec<ValidatorInfo>,
    ) -> Self {
        self.set_validators(subnet_id, height, validators);
        self
    }

    /// Record which subnet validates `chain_id`.
    pub fn register_chain(&self, chain_id: ChainId, subnet_id: SubnetId) {
        self.state.write().chains.insert(chain_id, subnet_id);
    }

    /// Record the validators of `subnet_id` from `height` on.
    pub fn set_validators(&self, subnet_id: SubnetId, height: u64, validators: Vec<ValidatorInfo>) {
        self.state
            .write()
            .snapshots
            .entry(subnet_id)
            .or_default()
            .insert(height, validators);
    }

    /// Lowest height this registry answers for.
    pub fn minimum_height(&self) -> u64 {
        self.minimum_height
    }
}

impl ValidatorRegistry for InMemoryValidatorRegistry {
    fn subnet_of(&self, chain_id: &ChainId) -> Result<SubnetId, RegistryError> {
        self.state
            .read()
            .chains
            .get(chain_id)
            .copied()
            .ok_or(RegistryError::UnknownChain {
                chain_id: *chain_id,
            })
    }

    fn validator_set(
        &self,
        height: u64,
        subnet_id: &SubnetId,
    ) -> Result<Vec<ValidatorInfo>, RegistryError> {
        if height < self.minimum_height {
            return Err(RegistryError::RegistryUnavailable {
                height,
                minimum: self.minimum_height,
            });
        }

        let state = self.state.read();
        state
            .snapshots
            .get(subnet_id)
            .and_then(|by_height| by_height.range(..=height).next_back())
            .map(|(_, validators)| validators.clone())
            .ok_or(RegistryError::UnknownSubnet {
                subnet_id: *subnet_id,
                height,
            })
    }
}

/// Default number of cached `(height, subnet)` answers.
pub const DEFAULT_VALIDATOR_CACHE_SIZE: usize = 64;

/// Caches successful validator-set answers of an inner registry.
///
/// Errors are never cached. When full, the entry with the lowest height is
/// evicted first.
pub struct CachingValidatorRegistry<R> {
    inner: R,
    capacity: usize,
    cache: RwLock<BTreeMap<(u64, SubnetId), Vec<ValidatorInfo>>>,
}

impl<R: ValidatorRegistry> CachingValidatorRegistry<R> {
    /// Wrap `inner` with the default capacity.
    pub fn new(inner: R) -> Self {
        Self::with_capacity(inner, DEFAULT_VALIDATOR_CACHE_SIZE)
    }

    /// Wrap `inner` keeping at most `capacity` answers.
    pub fn with_capacity(inner: R, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(1),
            cache: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of cached answers.
    pub fn cached(&self) -> usize {
        self.cache.read().len()
    }

    /// Wrapped registry.
    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: ValidatorRegistry> ValidatorRegistry for CachingValidatorRegistry<R> {
    fn subnet_of(&self, chain_id: &ChainId) -> Result<SubnetId, RegistryError> {
        self.inner.subnet_of(chain_id)
    }

    fn validator_set(
        &self,
        height: u64,
        subnet_id: &SubnetId,
    ) -> Result<Vec<ValidatorInfo>, RegistryError> {
        let key = (height, *subnet_id);
        if let Some(hit) = self.cache.read().get(&key) {
            trace!("[qc-18] Validator cache hit at height {}", height);
            return Ok(hit.clone());
        }

        let validators = self.inner.validator_set(height, subnet_id)?;

        let mut cache = self.cache.write();
        while cache.len() >= self.capacity {
            if cache.pop_first().is_none() {
                break;
            }
        }
        cache.insert(key, validators.clone());
        Ok(validators)
    }
}
