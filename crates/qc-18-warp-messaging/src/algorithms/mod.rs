//! # Algorithms
//!
//! Verification of incoming signed messages and aggregation of outgoing
//! ones.

pub mod aggregation;
pub mod verification;

pub use aggregation::SignatureAggregator;
pub use verification::{
    canonical_validator_set, verify_warp_message, VerificationContext, WarpMessageVerifier,
    WarpVerificationError,
};
