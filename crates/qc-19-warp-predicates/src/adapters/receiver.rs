//! # Warp Message Receiver
//!
//! Contract that consumes verified warp messages through the warp
//! contract's getters and reverts unless they match the expected values.
//!
//! ```text
//! validateWarpMessage(uint32,bytes32,address,bytes32,address,bytes)
//! validateInvalidWarpMessage(uint32)
//! validateWarpBlockHash(uint32,bytes32,bytes32)
//! validateInvalidWarpBlockHash(uint32)
//! validateGetBlockchainID(bytes32)
//! ```

use std::sync::Arc;

use qc_18_warp_messaging::contract::abi::{
    encode_bytes_tail, word_address, word_u64, AbiReader, WORD,
};
use qc_18_warp_messaging::contract::{
    CallContext, ContractError, GasMeter, PrecompileOutput, WarpContract,
};
use shared_crypto::selector;
use shared_types::{Address, ChainId, Hash};

use crate::ports::ContractHandler;

const VALIDATE_WARP_MESSAGE: &str =
    "validateWarpMessage(uint32,bytes32,address,bytes32,address,bytes)";
const VALIDATE_INVALID_WARP_MESSAGE: &str = "validateInvalidWarpMessage(uint32)";
const VALIDATE_WARP_BLOCK_HASH: &str = "validateWarpBlockHash(uint32,bytes32,bytes32)";
const VALIDATE_INVALID_WARP_BLOCK_HASH: &str = "validateInvalidWarpBlockHash(uint32)";
const VALIDATE_GET_BLOCKCHAIN_ID: &str = "validateGetBlockchainID(bytes32)";

/// Receiving contract built on the warp getters.
pub struct WarpMessageReceiver {
    warp: Arc<WarpContract>,
}

impl WarpMessageReceiver {
    /// Receiver reading through `warp`.
    pub fn new(warp: Arc<WarpContract>) -> Self {
        Self { warp }
    }

    fn validate_warp_message(
        &self,
        ctx: &CallContext<'_>,
        gas: &mut GasMeter,
        args: &AbiReader<'_>,
    ) -> Result<(), ContractError> {
        let index = args.uint32(0)?;
        let result = self.warp.get_verified_warp_message(ctx, gas, index)?;
        let message = &result.message;
        require(result.valid, "warp message not valid")?;
        require(
            message.source_chain_id == ChainId(args.bytes32(1)?),
            "invalid source chain id",
        )?;
        require(
            message.origin_sender_address == args.address(2)?,
            "invalid origin sender address",
        )?;
        require(
            message.destination_chain_id == ChainId(args.bytes32(3)?),
            "invalid destination chain id",
        )?;
        require(
            message.destination_address == args.address(4)?,
            "invalid destination address",
        )?;
        require(message.payload == args.bytes(5)?, "invalid payload")
    }

    fn validate_invalid_warp_message(
        &self,
        ctx: &CallContext<'_>,
        gas: &mut GasMeter,
        args: &AbiReader<'_>,
    ) -> Result<(), ContractError> {
        let result = self
            .warp
            .get_verified_warp_message(ctx, gas, args.uint32(0)?)?;
        require(!result.valid, "warp message should be invalid")
    }

    fn validate_warp_block_hash(
        &self,
        ctx: &CallContext<'_>,
        gas: &mut GasMeter,
        args: &AbiReader<'_>,
    ) -> Result<(), ContractError> {
        let result = self
            .warp
            .get_verified_warp_block_hash(ctx, gas, args.uint32(0)?)?;
        require(result.valid, "warp block hash not valid")?;
        require(
            result.block_hash.source_chain_id == ChainId(args.bytes32(1)?),
            "invalid source chain id",
        )?;
        require(
            result.block_hash.block_hash == args.bytes32(2)?,
            "invalid block hash",
        )
    }

    fn validate_invalid_warp_block_hash(
        &self,
        ctx: &CallContext<'_>,
        gas: &mut GasMeter,
        args: &AbiReader<'_>,
    ) -> Result<(), ContractError> {
        let result = self
            .warp
            .get_verified_warp_block_hash(ctx, gas, args.uint32(0)?)?;
        require(!result.valid, "warp block hash should be invalid")
    }

    fn validate_get_blockchain_id(
        &self,
        gas: &mut GasMeter,
        args: &AbiReader<'_>,
    ) -> Result<(), ContractError> {
        let chain_id = self.warp.get_blockchain_id(gas)?;
        require(
            chain_id == ChainId(args.bytes32(0)?),
            "invalid blockchain id",
        )
    }
}

fn require(condition: bool, reason: &'static str) -> Result<(), ContractError> {
    if condition {
        Ok(())
    } else {
        Err(ContractError::Reverted(reason))
    }
}

impl ContractHandler for WarpMessageReceiver {
    fn call(
        &self,
        ctx: &CallContext<'_>,
        input: &[u8],
        gas_limit: u64,
    ) -> Result<PrecompileOutput, ContractError> {
        if input.len() < 4 {
            return Err(ContractError::InvalidInput("missing selector"));
        }
        let mut sel = [0u8; 4];
        sel.copy_from_slice(&input[..4]);
        let args = AbiReader::new(&input[4..]);
        let mut gas = GasMeter::new(gas_limit);

        if sel == selector(VALIDATE_WARP_MESSAGE) {
            self.validate_warp_message(ctx, &mut gas, &args)?;
        } else if sel == selector(VALIDATE_INVALID_WARP_MESSAGE) {
            self.validate_invalid_warp_message(ctx, &mut gas, &args)?;
        } else if sel == selector(VALIDATE_WARP_BLOCK_HASH) {
            self.validate_warp_block_hash(ctx, &mut gas, &args)?;
        } else if sel == selector(VALIDATE_INVALID_WARP_BLOCK_HASH) {
            self.validate_invalid_warp_block_hash(ctx, &mut gas, &args)?;
        } else if sel == selector(VALIDATE_GET_BLOCKCHAIN_ID) {
            self.validate_get_blockchain_id(&mut gas, &args)?;
        } else {
            return Err(ContractError::UnknownSelector(sel));
        }

        Ok(PrecompileOutput {
            gas_used: gas.used(),
            output: Vec::new(),
            logs: Vec::new(),
        })
    }
}

/// Call data for `validateWarpMessage`.
pub fn pack_validate_warp_message(
    index: u32,
    source_chain_id: ChainId,
    origin_sender_address: Address,
    destination_chain_id: ChainId,
    destination_address: Address,
    payload: &[u8],
) -> Vec<u8> {
    let mut out = selector(VALIDATE_WARP_MESSAGE).to_vec();
    out.extend_from_slice(&word_u64(u64::from(index)));
    out.extend_from_slice(&source_chain_id.0);
    out.extend_from_slice(&word_address(&origin_sender_address));
    out.extend_from_slice(&destination_chain_id.0);
    out.extend_from_slice(&word_address(&destination_address));
    out.extend_from_slice(&word_u64(6 * WORD as u64));
    out.extend_from_slice(&encode_bytes_tail(payload));
    out
}

/// Call data for `validateInvalidWarpMessage`.
pub fn pack_validate_invalid_warp_message(index: u32) -> Vec<u8> {
    let mut out = selector(VALIDATE_INVALID_WARP_MESSAGE).to_vec();
    out.extend_from_slice(&word_u64(u64::from(index)));
    out
}

/// Call data for `validateWarpBlockHash`.
pub fn pack_validate_warp_block_hash(
    index: u32,
    source_chain_id: ChainId,
    block_hash: Hash,
) -> Vec<u8> {
    let mut out = selector(VALIDATE_WARP_BLOCK_HASH).to_vec();
    out.extend_from_slice(&word_u64(u64::from(index)));
    out.extend_from_slice(&source_chain_id.0);
    out.extend_from_slice(&block_hash);
    out
}

/// Call data for `validateInvalidWarpBlockHash`.
pub fn pack_validate_invalid_warp_block_hash(index: u32) -> Vec<u8> {
    let mut out = selector(VALIDATE_INVALID_WARP_BLOCK_HASH).to_vec();
    out.extend_from_slice(&word_u64(u64::from(index)));
    out
}

/// Call data for `validateGetBlockchainID`.
pub fn pack_validate_get_blockchain_id(chain_id: ChainId) -> Vec<u8> {
    let mut out = selector(VALIDATE_GET_BLOCKCHAIN_ID).to_vec();
    out.extend_from_slice(&chain_id.0);
    out
}
