//! # Ports Layer
//!
//! - **Inbound (Driving)**: block lifecycle driven by consensus
//! - **Outbound (Driven)**: predicate verifiers and contract handlers

pub mod inbound;
pub mod outbound;

pub use inbound::PredicateBlockApi;
pub use outbound::{ContractHandler, Predicater};
