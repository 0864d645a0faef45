//! # Integration Tests
//!
//! Warp messaging (qc-18) and predicate blocks (qc-19) working together:
//!
//! 1. **Send**: `sendWarpMessage` in a block, signatures gated on acceptance
//! 2. **Aggregate**: validator signatures collected into a signed message
//! 3. **Receive**: signed message carried as a predicate, verified at build
//!    and re-verified under the proposer's context

pub mod predicate_blocks;
pub mod warp_flows;
