//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API the block executor and RPC layer call
//! - **Outbound (Driven)**: validator registry, signing key, peer signatures

pub mod inbound;
pub mod outbound;

pub use inbound::WarpBackendApi;
pub use outbound::{SignatureGetter, ValidatorRegistry, WarpSigner};
