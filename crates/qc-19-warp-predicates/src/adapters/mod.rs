//! # Adapters Layer
//!
//! - [`WarpPredicater`]: warp predicate verification
//! - [`BlockExecutor`]: transaction execution against the warp contract
//! - [`WarpMessageReceiver`]: contract consuming verified warp messages

pub mod executor;
pub mod receiver;
pub mod warp_predicater;

pub use executor::{BlockExecutor, ExecutionOutcome};
pub use receiver::{
    pack_validate_get_blockchain_id, pack_validate_invalid_warp_block_hash,
    pack_validate_invalid_warp_message, pack_validate_warp_block_hash,
    pack_validate_warp_message, WarpMessageReceiver,
};
pub use warp_predicater::WarpPredicater;
