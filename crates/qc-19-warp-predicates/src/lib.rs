//! # Quantum Chain - Warp Predicates (Subsystem 19)
//!
//! **Bounded Context:** Predicate-Verified Block Execution
//!
//! ## Purpose
//!
//! Carries signed warp messages into transactions and makes their
//! verification a deterministic part of block validity:
//! - Predicate packing into access-list storage keys
//! - Intrinsic gas for predicate-carrying transactions
//! - Per-block predicate results committed into the header
//! - Re-verification under the proposer's context
//! - Execution against the warp contract with verified messages exposed
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Service                                            │
//! │  - PredicateBlockService (build / verify / accept)  │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Adapters (Outer)                                   │
//! │  - WarpPredicater, BlockExecutor                    │
//! │  - WarpMessageReceiver                              │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports (Middle)                                     │
//! │  - Inbound: PredicateBlockApi                       │
//! │  - Outbound: Predicater, ContractHandler            │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (Inner - Pure Logic)                        │
//! │  - Predicate packing, transactions, blocks          │
//! │  - HeaderPredicateResults                           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Critical Invariants
//!
//! 1. **Deterministic Results**: same transactions, context and validator
//!    state produce byte-identical header results
//! 2. **Header Binding**: a block whose recomputed results differ from its
//!    header is invalid
//! 3. **Soft Failure**: a failed predicate marks its slot invalid; it never
//!    invalidates the transaction
//! 4. **Hard Failure**: an undecodable predicate or unpaid intrinsic gas
//!    invalidates the transaction
//!
//! ## Module Structure
//!
//! - [`domain`]: Predicates, transactions, results, blocks
//! - [`algorithms`]: Result computation and intrinsic gas
//! - [`ports`]: Hexagonal interfaces
//! - [`adapters`]: Warp predicater, executor, receiver contract
//! - [`service`]: Block lifecycle

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{
    pack_validate_get_blockchain_id, pack_validate_invalid_warp_block_hash,
    pack_validate_invalid_warp_message, pack_validate_warp_block_hash,
    pack_validate_warp_message, BlockExecutor, ExecutionOutcome, WarpMessageReceiver,
    WarpPredicater,
};
pub use algorithms::{compute_predicate_results, intrinsic_gas, PredicaterSet};
pub use config::PredicateConfig;
pub use domain::{
    new_predicate_tx, pack_predicate, unpack_predicate, AccessTuple, Block, BlockHeader,
    BlockStatus, HeaderPredicateResults, PredicateError, PredicateFailure, PredicateTransaction,
    ProposerContext, Receipt, ReceiptStatus, TxPredicateResults, TX_BASE_GAS,
};
pub use error::{BlockError, Result, TransactionError};
pub use ports::{ContractHandler, PredicateBlockApi, Predicater};
pub use service::PredicateBlockService;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
