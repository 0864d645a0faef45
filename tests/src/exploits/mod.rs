//! # Exploit Simulations
//!
//! Attacks on warp message authentication and on the predicate binding of
//! block validity. Each test states the attack and asserts it fails the
//! way the protocol requires.

pub mod predicate_malleability;
pub mod signature_forgery;
