//! # Adapters
//!
//! Concrete implementations of the outbound ports.

pub mod getter;
pub mod registry;
pub mod signer;

pub use getter::BackendSignatureGetter;
pub use registry::{
    CachingValidatorRegistry, InMemoryValidatorRegistry, DEFAULT_VALIDATOR_CACHE_SIZE,
};
pub use signer::LocalWarpSigner;
