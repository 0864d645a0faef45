//! # Quorum Threshold
//!
//! A message is attested when `signed_weight / total_weight >= numerator /
//! denominator`. The comparison is done by cross-multiplying in `u128`, which
//! cannot overflow for `u64` operands.

use serde::{Deserialize, Serialize};

use super::errors::VerificationError;

/// Default numerator of the warp quorum.
pub const DEFAULT_QUORUM_NUMERATOR: u64 = 67;

/// Lowest numerator a chain may configure.
pub const MINIMUM_QUORUM_NUMERATOR: u64 = 33;

/// Denominator of the warp quorum.
pub const QUORUM_DENOMINATOR: u64 = 100;

/// Fraction of total weight that must sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuorum")]
pub struct QuorumThreshold {
    numerator: u64,
    denominator: u64,
}

#[derive(Deserialize)]
struct RawQuorum {
    numerator: u64,
    denominator: u64,
}

impl TryFrom<RawQuorum> for QuorumThreshold {
    type Error = VerificationError;

    fn try_from(raw: RawQuorum) -> Result<Self, Self::Error> {
        QuorumThreshold::new(raw.numerator, raw.denominator)
    }
}

impl QuorumThreshold {
    /// Threshold `numerator / denominator`, which must lie in (0, 1].
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, VerificationError> {
        if numerator == 0 || denominator == 0 || numerator > denominator {
            return Err(VerificationError::InvalidQuorum {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Threshold numerator.
    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    /// Threshold denominator.
    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    /// Whether `signed_weight` out of `total_weight` meets the threshold.
    pub fn is_reached(&self, signed_weight: u64, total_weight: u64) -> bool {
        u128::from(signed_weight) * u128::from(self.denominator)
            >= u128::from(total_weight) * u128::from(self.numerator)
    }

    /// [`Self::is_reached`] as a typed result.
    pub fn verify_weight(
        &self,
        signed_weight: u64,
        total_weight: u64,
    ) -> Result<(), VerificationError> {
        if self.is_reached(signed_weight, total_weight) {
            Ok(())
        } else {
            Err(VerificationError::QuorumNotReached {
                signed_weight,
                total_weight,
                numerator: self.numerator,
                denominator: self.denominator,
            })
        }
    }

    /// Whether this threshold is no stricter than `other`.
    pub fn at_most(&self, other: &QuorumThreshold) -> bool {
        u128::from(self.numerator) * u128::from(other.denominator)
            <= u128::from(other.numerator) * u128::from(self.denominator)
    }
}

impl Default for QuorumThreshold {
    fn default() -> Self {
        Self {
            numerator: DEFAULT_QUORUM_NUMERATOR,
            denominator: QUORUM_DENOMINATOR,
        }
    }
}
