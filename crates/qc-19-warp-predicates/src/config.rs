//! Predicate subsystem configuration.

use qc_18_warp_messaging::WARP_CONTRACT_ADDRESS;
use serde::Deserialize;
use shared_types::Address;

/// Which contracts carry predicates.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PredicateConfig {
    /// Predicate contract addresses. Each needs a registered predicater.
    pub predicate_addresses: Vec<Address>,
}

impl Default for PredicateConfig {
    fn default() -> Self {
        Self {
            predicate_addresses: vec![WARP_CONTRACT_ADDRESS],
        }
    }
}

impl PredicateConfig {
    /// Addresses sorted ascending with duplicates removed.
    pub fn sorted_addresses(&self) -> Vec<Address> {
        let mut addresses = self.predicate_addresses.clone();
        addresses.sort_unstable();
        addresses.dedup();
        addresses
    }
}
