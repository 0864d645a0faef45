//! Warp precompile: call dispatch, typed functions and ABI packing.

use shared_crypto::{keccak256, selector};
use shared_types::{Address, ChainId, Hash, MessageId};
use tracing::debug;

use super::abi::{encode_bytes_tail, word_address, word_bool, word_u64, AbiReader, WORD};
use super::{
    ContractError, Log, PrecompileOutput, GAS_COST_PER_WARP_MESSAGE_BYTE,
    GET_BLOCKCHAIN_ID_GAS_COST, GET_VERIFIED_WARP_MESSAGE_BASE_COST,
    SEND_WARP_MESSAGE_BASE_COST, SEND_WARP_MESSAGE_GAS_PER_BYTE,
};
use crate::domain::{new_addressed_payload, Payload, SignedMessage, UnsignedMessage};

/// Address of the warp precompile.
pub const WARP_CONTRACT_ADDRESS: Address = [
    0x02, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x05,
];

const SEND_WARP_MESSAGE: &str = "sendWarpMessage(bytes32,address,bytes)";
const GET_VERIFIED_WARP_MESSAGE: &str = "getVerifiedWarpMessage(uint32)";
const GET_VERIFIED_WARP_BLOCK_HASH: &str = "getVerifiedWarpBlockHash(uint32)";
const GET_BLOCKCHAIN_ID: &str = "getBlockchainID()";
const SEND_WARP_MESSAGE_EVENT: &str = "SendWarpMessage(bytes32,address,address,bytes)";

/// One predicate slot of the executing transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PredicateSlot<'a> {
    /// Predicate bytes with access-list packing removed.
    pub predicate: &'a [u8],
    /// Length as carried in the access list; gas is charged on it.
    pub packed_len: usize,
    /// Whether the predicate verified at block build or verification.
    pub valid: bool,
}

/// Warp predicates of the executing transaction, with their verification
/// outcome from the block's predicate results.
pub trait PredicateView {
    /// Slot `index`, or `None` if the transaction carries fewer predicates.
    fn predicate_slot(&self, index: u32) -> Option<PredicateSlot<'_>>;
}

/// Caller-side context of a contract call.
#[derive(Clone, Copy)]
pub struct CallContext<'a> {
    /// Immediate caller.
    pub caller: Address,
    /// Static call: state changes revert.
    pub read_only: bool,
    /// Predicates of the enclosing transaction.
    pub predicates: &'a dyn PredicateView,
}

/// Running gas charge against a limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GasMeter {
    limit: u64,
    used: u64,
}

impl GasMeter {
    /// Meter with `limit` gas available.
    pub fn new(limit: u64) -> Self {
        Self { limit, used: 0 }
    }

    /// Charge `amount`, failing once the limit is exceeded.
    pub fn charge(&mut self, amount: u64) -> Result<(), ContractError> {
        let required = self.used.saturating_add(amount);
        if required > self.limit {
            return Err(ContractError::OutOfGas {
                required,
                available: self.limit,
            });
        }
        self.used = required;
        Ok(())
    }

    /// Gas used so far.
    pub fn used(&self) -> u64 {
        self.used
    }

    /// Gas left.
    pub fn remaining(&self) -> u64 {
        self.limit - self.used
    }
}

/// Verified addressed message as returned to EVM code.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WarpMessage {
    /// Chain that emitted the message.
    pub source_chain_id: ChainId,
    /// Contract that called `sendWarpMessage`.
    pub origin_sender_address: Address,
    /// Intended destination chain.
    pub destination_chain_id: ChainId,
    /// Intended recipient.
    pub destination_address: Address,
    /// Application payload.
    pub payload: Vec<u8>,
}

/// Verified block hash as returned to EVM code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WarpBlockHash {
    /// Chain that produced the block.
    pub source_chain_id: ChainId,
    /// Attested block hash.
    pub block_hash: Hash,
}

/// `getVerifiedWarpMessage` result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerifiedWarpMessage {
    /// Message, empty when invalid.
    pub message: WarpMessage,
    /// Whether the predicate verified.
    pub valid: bool,
}

/// `getVerifiedWarpBlockHash` result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerifiedWarpBlockHash {
    /// Block hash, empty when invalid.
    pub block_hash: WarpBlockHash,
    /// Whether the predicate verified.
    pub valid: bool,
}

/// The warp precompile for one chain.
pub struct WarpContract {
    network_id: u32,
    chain_id: ChainId,
    send_selector: [u8; 4],
    get_message_selector: [u8; 4],
    get_block_hash_selector: [u8; 4],
    get_blockchain_id_selector: [u8; 4],
    event_id: Hash,
}

impl WarpContract {
    /// Contract stamping `network_id` and `chain_id` on sent messages.
    pub fn new(network_id: u32, chain_id: ChainId) -> Self {
        Self {
            network_id,
            chain_id,
            send_selector: selector(SEND_WARP_MESSAGE),
            get_message_selector: selector(GET_VERIFIED_WARP_MESSAGE),
            get_block_hash_selector: selector(GET_VERIFIED_WARP_BLOCK_HASH),
            get_blockchain_id_selector: selector(GET_BLOCKCHAIN_ID),
            event_id: keccak256(SEND_WARP_MESSAGE_EVENT.as_bytes()),
        }
    }

    /// Topic 0 of `SendWarpMessage` logs.
    pub fn event_id(&self) -> Hash {
        self.event_id
    }

    /// Local chain id.
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Execute ABI-encoded `input`.
    pub fn execute(
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
        let mut logs = Vec::new();

        let output = if sel == self.send_selector {
            let destination_chain_id = ChainId(args.bytes32(0)?);
            let destination_address = args.address(1)?;
            let payload = args.bytes(2)?;
            let (id, log) = self.send_warp_message(
                ctx,
                &mut gas,
                destination_chain_id,
                destination_address,
                payload,
            )?;
            logs.push(log);
            id.0.to_vec()
        } else if sel == self.get_message_selector {
            let index = args.uint32(0)?;
            let result = self.get_verified_warp_message(ctx, &mut gas, index)?;
            encode_verified_message(&result)
        } else if sel == self.get_block_hash_selector {
            let index = args.uint32(0)?;
            let result = self.get_verified_warp_block_hash(ctx, &mut gas, index)?;
            encode_verified_block_hash(&result)
        } else if sel == self.get_blockchain_id_selector {
            self.get_blockchain_id(&mut gas)?.0.to_vec()
        } else {
            return Err(ContractError::UnknownSelector(sel));
        };

        Ok(PrecompileOutput {
            gas_used: gas.used(),
            output,
            logs,
        })
    }

    /// Build an addressed message from the caller and emit it as a
    /// `SendWarpMessage` log carrying the unsigned message bytes.
    pub fn send_warp_message(
        &self,
        ctx: &CallContext<'_>,
        gas: &mut GasMeter,
        destination_chain_id: ChainId,
        destination_address: Address,
        payload: Vec<u8>,
    ) -> Result<(MessageId, Log), ContractError> {
        let per_byte = SEND_WARP_MESSAGE_GAS_PER_BYTE.saturating_mul(payload.len() as u64);
        gas.charge(SEND_WARP_MESSAGE_BASE_COST.saturating_add(per_byte))?;
        if ctx.read_only {
            return Err(ContractError::WriteProtection);
        }

        let addressed =
            new_addressed_payload(ctx.caller, destination_chain_id, destination_address, &payload)
                .map_err(|_| ContractError::InvalidInput("payload too large"))?;
        let message = UnsignedMessage::new(self.network_id, self.chain_id, addressed)
            .map_err(|_| ContractError::InvalidInput("payload too large"))?;
        let id = message.id();

        debug!(
            "[qc-18] sendWarpMessage {} from {:?} to {}",
            id, ctx.caller, destination_chain_id
        );

        let log = Log {
            address: WARP_CONTRACT_ADDRESS,
            topics: vec![
                self.event_id,
                destination_chain_id.0,
                word_address(&destination_address),
                word_address(&ctx.caller),
            ],
            data: message.to_bytes(),
        };
        Ok((id, log))
    }

    /// Verified addressed message at predicate slot `index`.
    pub fn get_verified_warp_message(
        &self,
        ctx: &CallContext<'_>,
        gas: &mut GasMeter,
        index: u32,
    ) -> Result<VerifiedWarpMessage, ContractError> {
        let Some(signed) = self.verified_predicate(ctx, gas, index)? else {
            return Ok(VerifiedWarpMessage::default());
        };
        match signed.unsigned.parsed_payload() {
            Ok(Payload::Addressed(p)) => Ok(VerifiedWarpMessage {
                message: WarpMessage {
                    source_chain_id: signed.unsigned.source_chain_id(),
                    origin_sender_address: p.source_address,
                    destination_chain_id: p.destination_chain_id,
                    destination_address: p.destination_address,
                    payload: p.payload,
                },
                valid: true,
            }),
            _ => Err(ContractError::WrongPayloadKind {
                expected: "AddressedPayload",
            }),
        }
    }

    /// Verified block hash at predicate slot `index`.
    pub fn get_verified_warp_block_hash(
        &self,
        ctx: &CallContext<'_>,
        gas: &mut GasMeter,
        index: u32,
    ) -> Result<VerifiedWarpBlockHash, ContractError> {
        let Some(signed) = self.verified_predicate(ctx, gas, index)? else {
            return Ok(VerifiedWarpBlockHash::default());
        };
        match signed.unsigned.parsed_payload() {
            Ok(Payload::BlockHash(p)) => Ok(VerifiedWarpBlockHash {
                block_hash: WarpBlockHash {
                    source_chain_id: signed.unsigned.source_chain_id(),
                    block_hash: p.block_hash,
                },
                valid: true,
            }),
            _ => Err(ContractError::WrongPayloadKind {
                expected: "BlockHashPayload",
            }),
        }
    }

    /// This chain's id.
    pub fn get_blockchain_id(&self, gas: &mut GasMeter) -> Result<ChainId, ContractError> {
        gas.charge(GET_BLOCKCHAIN_ID_GAS_COST)?;
        Ok(self.chain_id)
    }

    fn verified_predicate(
        &self,
        ctx: &CallContext<'_>,
        gas: &mut GasMeter,
        index: u32,
    ) -> Result<Option<SignedMessage>, ContractError> {
        gas.charge(GET_VERIFIED_WARP_MESSAGE_BASE_COST)?;
        let Some(slot) = ctx.predicates.predicate_slot(index) else {
            return Ok(None);
        };
        gas.charge(GAS_COST_PER_WARP_MESSAGE_BYTE.saturating_mul(slot.packed_len as u64))?;
        if !slot.valid {
            return Ok(None);
        }
        SignedMessage::from_bytes(slot.predicate)
            .map(Some)
            .map_err(|_| ContractError::InvalidInput("malformed predicate"))
    }
}

fn encode_verified_message(result: &VerifiedWarpMessage) -> Vec<u8> {
    let m = &result.message;
    let mut out = Vec::with_capacity(9 * WORD + m.payload.len());
    out.extend_from_slice(&word_u64(2 * WORD as u64));
    out.extend_from_slice(&word_bool(result.valid));
    out.extend_from_slice(&m.source_chain_id.0);
    out.extend_from_slice(&word_address(&m.origin_sender_address));
    out.extend_from_slice(&m.destination_chain_id.0);
    out.extend_from_slice(&word_address(&m.destination_address));
    out.extend_from_slice(&word_u64(5 * WORD as u64));
    out.extend_from_slice(&encode_bytes_tail(&m.payload));
    out
}

fn encode_verified_block_hash(result: &VerifiedWarpBlockHash) -> Vec<u8> {
    let mut out = Vec::with_capacity(3 * WORD);
    out.extend_from_slice(&result.block_hash.source_chain_id.0);
    out.extend_from_slice(&result.block_hash.block_hash);
    out.extend_from_slice(&word_bool(result.valid));
    out
}

/// Decode `getVerifiedWarpMessage` return data.
pub fn unpack_verified_message_output(data: &[u8]) -> Result<VerifiedWarpMessage, ContractError> {
    let root = AbiReader::new(data);
    let valid = root.boolean(1)?;
    let tuple = root.tuple(0)?;
    Ok(VerifiedWarpMessage {
        message: WarpMessage {
            source_chain_id: ChainId(tuple.bytes32(0)?),
            origin_sender_address: tuple.address(1)?,
            destination_chain_id: ChainId(tuple.bytes32(2)?),
            destination_address: tuple.address(3)?,
            payload: tuple.bytes(4)?,
        },
        valid,
    })
}

/// Decode `getVerifiedWarpBlockHash` return data.
pub fn unpack_verified_block_hash_output(
    data: &[u8],
) -> Result<VerifiedWarpBlockHash, ContractError> {
    let reader = AbiReader::new(data);
    Ok(VerifiedWarpBlockHash {
        block_hash: WarpBlockHash {
            source_chain_id: ChainId(reader.bytes32(0)?),
            block_hash: reader.bytes32(1)?,
        },
        valid: reader.boolean(2)?,
    })
}

/// Call data for `sendWarpMessage`.
pub fn pack_send_warp_message(
    destination_chain_id: ChainId,
    destination_address: Address,
    payload: &[u8],
) -> Vec<u8> {
    let mut out = selector(SEND_WARP_MESSAGE).to_vec();
    out.extend_from_slice(&destination_chain_id.0);
    out.extend_from_slice(&word_address(&destination_address));
    out.extend_from_slice(&word_u64(3 * WORD as u64));
    out.extend_from_slice(&encode_bytes_tail(payload));
    out
}

/// Call data for `getVerifiedWarpMessage`.
pub fn pack_get_verified_warp_message(index: u32) -> Vec<u8> {
    let mut out = selector(GET_VERIFIED_WARP_MESSAGE).to_vec();
    out.extend_from_slice(&word_u64(u64::from(index)));
    out
}

/// Call data for `getVerifiedWarpBlockHash`.
pub fn pack_get_verified_warp_block_hash(index: u32) -> Vec<u8> {
    let mut out = selector(GET_VERIFIED_WARP_BLOCK_HASH).to_vec();
    out.extend_from_slice(&word_u64(u64::from(index)));
    out
}

/// Call data for `getBlockchainID`.
pub fn pack_get_blockchain_id() -> Vec<u8> {
    selector(GET_BLOCKCHAIN_ID).to_vec()
}
