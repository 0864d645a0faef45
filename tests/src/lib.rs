//! # Quantum-Chain Warp Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Validator sets, registries, chains
//! ├── benchmarks/       # Verification and predicate performance
//! ├── exploits/         # Forgery, replay and malleability attempts
//! └── integration/      # Send, sign, aggregate, receive flows
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p qc-tests
//!
//! # By category
//! cargo test -p qc-tests integration::
//! cargo test -p qc-tests exploits::
//!
//! # Benchmarks
//! cargo bench -p qc-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod benchmarks;
pub mod exploits;
pub mod fixtures;
pub mod integration;
