//! # Quantum Chain - Warp Messaging (Subsystem 18)
//!
//! **Bounded Context:** Cross-Chain Message Authentication
//!
//! ## Purpose
//!
//! Lets a chain prove to another chain that its validators attested a
//! message:
//! - Canonical codec for unsigned and signed warp messages and payloads
//! - Weighted BLS quorum verification against a registry snapshot
//! - Backend that signs locally emitted messages once their block is
//!   accepted
//! - Aggregation of individual validator signatures
//! - The warp precompile exposed to EVM code
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Adapters (Outer)                                   │
//! │  - InMemory / Caching validator registry            │
//! │  - LocalWarpSigner, BackendSignatureGetter          │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports (Middle)                                     │
//! │  - Inbound: WarpBackendApi                          │
//! │  - Outbound: ValidatorRegistry, WarpSigner,         │
//! │              SignatureGetter                        │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (Inner - Pure Logic)                        │
//! │  - Codec, payloads, BitSet, BitSetSignature         │
//! │  - CanonicalValidatorSet, QuorumThreshold           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Critical Invariants
//!
//! 1. **Content Addressing**: message id = SHA-256(canonical bytes)
//! 2. **Canonical Order**: signer bit `i` is the `i`-th validator by node id
//! 3. **Acceptance Gating**: no signature before the emitting block is accepted
//! 4. **Distinct Failures**: registry errors never read as quorum failures
//!
//! ## Module Structure
//!
//! - [`domain`]: Message formats and quorum arithmetic
//! - [`algorithms`]: Message verification and signature aggregation
//! - [`ports`]: Hexagonal interfaces
//! - [`adapters`]: Registry, signer and signature getter implementations
//! - [`service`]: The warp backend
//! - [`contract`]: Warp precompile

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod config;
pub mod contract;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{
    BackendSignatureGetter, CachingValidatorRegistry, InMemoryValidatorRegistry, LocalWarpSigner,
};
pub use algorithms::{
    canonical_validator_set, verify_warp_message, SignatureAggregator, VerificationContext,
    WarpMessageVerifier, WarpVerificationError,
};
pub use config::{ConfigError, WarpConfig};
pub use contract::{ContractError, WarpContract, WARP_CONTRACT_ADDRESS};
pub use domain::{
    new_addressed_payload, new_block_hash_payload, AddressedPayload, BitSet, BitSetSignature,
    BlockHashPayload, CanonicalValidatorSet, CodecError, Payload, QuorumThreshold,
    RegistryError, SignedMessage, UnsignedMessage, ValidatorInfo, VerificationError,
    MAX_MESSAGE_SIZE,
};
pub use error::{WarpError, WarpResult};
pub use ports::{SignatureGetter, ValidatorRegistry, WarpBackendApi, WarpSigner};
pub use service::WarpBackend;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
