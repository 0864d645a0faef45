//! # Warp Contract
//!
//! Stateful precompile at [`WARP_CONTRACT_ADDRESS`] through which EVM code
//! sends warp messages and reads verified predicates.
//!
//! | Function | Gas |
//! |----------|-----|
//! | `sendWarpMessage(bytes32,address,bytes)` | 41 500 + 8 per payload byte |
//! | `getVerifiedWarpMessage(uint32)` | 2 + 100 per predicate byte |
//! | `getVerifiedWarpBlockHash(uint32)` | 2 + 100 per predicate byte |
//! | `getBlockchainID()` | 2 |
//!
//! A transaction carrying a warp predicate pays 200 000 + 100 per packed
//! predicate byte + 500 per signer as intrinsic gas.

pub mod abi;
pub mod warp;

use shared_types::{Address, Hash};
use thiserror::Error;

pub use warp::{
    pack_get_blockchain_id, pack_get_verified_warp_block_hash, pack_get_verified_warp_message,
    pack_send_warp_message, unpack_verified_block_hash_output, unpack_verified_message_output,
    CallContext, GasMeter, PredicateSlot, PredicateView, VerifiedWarpBlockHash,
    VerifiedWarpMessage, WarpBlockHash, WarpContract, WarpMessage, WARP_CONTRACT_ADDRESS,
};

/// Base cost of `sendWarpMessage`.
pub const SEND_WARP_MESSAGE_BASE_COST: u64 = 41_500;

/// Cost per payload byte of `sendWarpMessage`.
pub const SEND_WARP_MESSAGE_GAS_PER_BYTE: u64 = 8;

/// Base cost of the verified-predicate getters.
pub const GET_VERIFIED_WARP_MESSAGE_BASE_COST: u64 = 2;

/// Cost per predicate byte read by the getters.
pub const GAS_COST_PER_WARP_MESSAGE_BYTE: u64 = 100;

/// Cost of `getBlockchainID`.
pub const GET_BLOCKCHAIN_ID_GAS_COST: u64 = 2;

/// Intrinsic cost of verifying one warp predicate.
pub const GAS_COST_PER_SIGNATURE_VERIFICATION: u64 = 200_000;

/// Intrinsic cost per signer of a warp predicate.
pub const GAS_COST_PER_WARP_SIGNER: u64 = 500;

/// Contract call failures. Every variant reverts the call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractError {
    /// Gas limit below the cost.
    #[error("Out of gas: required {required}, available {available}")]
    OutOfGas {
        /// Cumulative cost
        required: u64,
        /// Call gas limit
        available: u64,
    },

    /// Selector matches no function.
    #[error("Unknown selector 0x{}", hex_selector(.0))]
    UnknownSelector([u8; 4]),

    /// Call data does not decode.
    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    /// Verified message carries a payload of the other kind.
    #[error("Warp payload is not {expected}")]
    WrongPayloadKind {
        /// Payload the getter serves
        expected: &'static str,
    },

    /// A contract check failed.
    #[error("Execution reverted: {0}")]
    Reverted(&'static str),

    /// State-changing function called in a static context.
    #[error("Write protection: sendWarpMessage in read-only call")]
    WriteProtection,
}

fn hex_selector(selector: &[u8; 4]) -> String {
    selector.iter().map(|b| format!("{b:02x}")).collect()
}

/// Event emitted by a contract call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Log {
    /// Emitting contract.
    pub address: Address,
    /// Indexed topics.
    pub topics: Vec<Hash>,
    /// Unindexed data.
    pub data: Vec<u8>,
}

/// Result of a successful contract call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrecompileOutput {
    /// Gas used by the call.
    pub gas_used: u64,
    /// ABI-encoded return data.
    pub output: Vec<u8>,
    /// Emitted events.
    pub logs: Vec<Log>,
}
