//! # Quantum-Chain Warp Benchmarks
//!
//! Performance benchmarks for warp verification and predicate blocks.

pub mod qc_19_predicate_results;
