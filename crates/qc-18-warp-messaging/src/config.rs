//! Warp configuration.

use serde::Deserialize;
use shared_types::{ChainId, SubnetId};
use thiserror::Error;

use crate::domain::{
    QuorumThreshold, DEFAULT_QUORUM_NUMERATOR, MINIMUM_QUORUM_NUMERATOR, QUORUM_DENOMINATOR,
};

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Quorum numerator outside the allowed range.
    #[error("Quorum numerator {numerator} outside [{minimum}, {maximum}]")]
    QuorumNumeratorOutOfRange {
        /// Configured value
        numerator: u64,
        /// Lowest allowed value
        minimum: u64,
        /// Highest allowed value
        maximum: u64,
    },
}

/// Identity of the local chain and warp protocol parameters.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WarpConfig {
    /// Network id stamped into every outgoing message and required of every
    /// incoming one.
    pub network_id: u32,
    /// This chain.
    pub chain_id: ChainId,
    /// Subnet validating this chain.
    pub subnet_id: SubnetId,
    /// Quorum numerator over [`QUORUM_DENOMINATOR`]; zero selects the
    /// default.
    pub quorum_numerator: u64,
    /// Verify primary-network messages against the primary network's own
    /// validators instead of this subnet's.
    pub require_primary_network_signers: bool,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            network_id: 1,
            chain_id: ChainId::zero(),
            subnet_id: SubnetId::PRIMARY_NETWORK,
            quorum_numerator: 0,
            require_primary_network_signers: false,
        }
    }
}

impl WarpConfig {
    /// Configuration for a chain with default protocol parameters.
    pub fn for_chain(network_id: u32, chain_id: ChainId, subnet_id: SubnetId) -> Self {
        Self {
            network_id,
            chain_id,
            subnet_id,
            ..Self::default()
        }
    }

    /// Override the quorum numerator.
    pub fn with_quorum_numerator(mut self, numerator: u64) -> Self {
        self.quorum_numerator = numerator;
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.quorum_numerator;
        if n != 0 && !(MINIMUM_QUORUM_NUMERATOR..=QUORUM_DENOMINATOR).contains(&n) {
            return Err(ConfigError::QuorumNumeratorOutOfRange {
                numerator: n,
                minimum: MINIMUM_QUORUM_NUMERATOR,
                maximum: QUORUM_DENOMINATOR,
            });
        }
        Ok(())
    }

    /// Effective quorum threshold.
    pub fn quorum(&self) -> Result<QuorumThreshold, ConfigError> {
        self.validate()?;
        let numerator = match self.quorum_numerator {
            0 => DEFAULT_QUORUM_NUMERATOR,
            n => n,
        };
        QuorumThreshold::new(numerator, QUORUM_DENOMINATOR).map_err(|_| {
            ConfigError::QuorumNumeratorOutOfRange {
                numerator,
                minimum: MINIMUM_QUORUM_NUMERATOR,
                maximum: QUORUM_DENOMINATOR,
            }
        })
    }
}
