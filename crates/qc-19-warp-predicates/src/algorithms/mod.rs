//! # Algorithms
//!
//! Predicate result computation and intrinsic gas.

pub mod results;

pub use results::{compute_predicate_results, intrinsic_gas, PredicaterSet};
