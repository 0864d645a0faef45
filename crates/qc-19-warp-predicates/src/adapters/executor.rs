//! # Block Executor
//!
//! Runs a block's transactions against the warp contract and registered
//! contract handlers, exposing each transaction's warp predicates to the
//! contract under the validity recorded in the block header.
//!
//! A call that fails reverts: the receipt keeps no logs and charges the full
//! gas limit. A transaction whose intrinsic gas cannot be paid makes the
//! whole block invalid.

use std::collections::BTreeMap;
use std::sync::Arc;

use qc_18_warp_messaging::contract::{
    CallContext, ContractError, PrecompileOutput, PredicateSlot, PredicateView, WarpContract,
    WARP_CONTRACT_ADDRESS,
};
use qc_18_warp_messaging::{BitSet, UnsignedMessage};
use shared_types::Address;
use tracing::{trace, warn};

use crate::algorithms::{intrinsic_gas, PredicaterSet};
use crate::domain::{
    unpack_predicate, Block, HeaderPredicateResults, PredicateTransaction, Receipt,
    ReceiptStatus,
};
use crate::error::{BlockError, Result, TransactionError};
use crate::ports::ContractHandler;

/// Warp predicate slots of one transaction.
struct TxPredicates {
    slots: Vec<(Vec<u8>, usize, bool)>,
}

impl TxPredicates {
    fn new(tx: &PredicateTransaction, failed: &BitSet) -> Self {
        let slots = tx
            .predicates_for(&WARP_CONTRACT_ADDRESS)
            .into_iter()
            .enumerate()
            .map(|(index, packed)| match unpack_predicate(&packed) {
                Ok(bytes) => (bytes, packed.len(), !failed.contains(index)),
                Err(_) => (Vec::new(), packed.len(), false),
            })
            .collect();
        Self { slots }
    }
}

impl PredicateView for TxPredicates {
    fn predicate_slot(&self, index: u32) -> Option<PredicateSlot<'_>> {
        self.slots
            .get(index as usize)
            .map(|(bytes, packed_len, valid)| PredicateSlot {
                predicate: bytes,
                packed_len: *packed_len,
                valid: *valid,
            })
    }
}

/// Receipts of an executed block plus the warp messages it emitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// One receipt per transaction, in order.
    pub receipts: Vec<Receipt>,
    /// Unsigned messages from successful `sendWarpMessage` calls.
    pub warp_messages: Vec<UnsignedMessage>,
}

/// Executes predicate transactions.
pub struct BlockExecutor {
    warp: Arc<WarpContract>,
    handlers: BTreeMap<Address, Arc<dyn ContractHandler>>,
}

impl BlockExecutor {
    /// Executor routing warp-address calls to `warp`.
    pub fn new(warp: Arc<WarpContract>) -> Self {
        Self {
            warp,
            handlers: BTreeMap::new(),
        }
    }

    /// Route calls to `address` to `handler`.
    pub fn with_handler(mut self, address: Address, handler: Arc<dyn ContractHandler>) -> Self {
        self.handlers.insert(address, handler);
        self
    }

    /// The warp contract.
    pub fn warp(&self) -> &Arc<WarpContract> {
        &self.warp
    }

    /// Execute every transaction of `block` under its header's predicate
    /// results.
    ///
    /// # Errors
    /// * `BlockError::Codec` - header results do not decode
    /// * `BlockError::InvalidTransaction` - a transaction cannot pay its
    ///   intrinsic gas
    pub fn execute_block(
        &self,
        block: &Block,
        predicaters: &PredicaterSet,
    ) -> Result<ExecutionOutcome> {
        let results = HeaderPredicateResults::from_bytes(&block.header.predicate_results)?;

        let mut outcome = ExecutionOutcome::default();
        for tx in &block.transactions {
            let receipt = self.execute_tx(tx, &results, predicaters).map_err(|reason| {
                BlockError::InvalidTransaction {
                    tx_hash: tx.hash(),
                    reason,
                }
            })?;
            outcome.warp_messages.extend(self.warp_messages(&receipt));
            outcome.receipts.push(receipt);
        }
        Ok(outcome)
    }

    /// Execute one transaction.
    ///
    /// # Errors
    /// * `TransactionError::Predicate` - a predicate does not decode
    /// * `TransactionError::IntrinsicGas` - gas limit below intrinsic gas
    pub fn execute_tx(
        &self,
        tx: &PredicateTransaction,
        results: &HeaderPredicateResults,
        predicaters: &PredicaterSet,
    ) -> std::result::Result<Receipt, TransactionError> {
        let intrinsic = intrinsic_gas(tx, predicaters)?;
        if tx.gas_limit < intrinsic {
            return Err(TransactionError::IntrinsicGas {
                required: intrinsic,
                limit: tx.gas_limit,
            });
        }

        let tx_hash = tx.hash();
        let failed = results.failed_slots(&tx_hash, &WARP_CONTRACT_ADDRESS);
        let predicates = TxPredicates::new(tx, &failed);
        let ctx = CallContext {
            caller: tx.from,
            read_only: false,
            predicates: &predicates,
        };

        let receipt = match self.call(&ctx, tx, tx.gas_limit - intrinsic) {
            Ok(out) => Receipt {
                tx_hash,
                status: ReceiptStatus::Success,
                gas_used: intrinsic + out.gas_used,
                output: out.output,
                logs: out.logs,
            },
            Err(e) => {
                trace!("[qc-19] Tx {:02x?} reverted: {}", &tx_hash[..4], e);
                Receipt {
                    tx_hash,
                    status: ReceiptStatus::Reverted {
                        reason: e.to_string(),
                    },
                    gas_used: tx.gas_limit,
                    output: Vec::new(),
                    logs: Vec::new(),
                }
            }
        };
        Ok(receipt)
    }

    fn call(
        &self,
        ctx: &CallContext<'_>,
        tx: &PredicateTransaction,
        gas_limit: u64,
    ) -> std::result::Result<PrecompileOutput, ContractError> {
        match tx.to {
            Some(to) if to == WARP_CONTRACT_ADDRESS => self.warp.execute(ctx, &tx.data, gas_limit),
            Some(to) => match self.handlers.get(&to) {
                Some(handler) => handler.call(ctx, &tx.data, gas_limit),
                None => Ok(PrecompileOutput {
                    gas_used: 0,
                    output: Vec::new(),
                    logs: Vec::new(),
                }),
            },
            None => Ok(PrecompileOutput {
                gas_used: 0,
                output: Vec::new(),
                logs: Vec::new(),
            }),
        }
    }

    /// Unsigned messages carried by `SendWarpMessage` logs of a successful
    /// receipt.
    pub fn warp_messages(&self, receipt: &Receipt) -> Vec<UnsignedMessage> {
        if !receipt.is_success() {
            return Vec::new();
        }
        receipt
            .logs
            .iter()
            .filter(|log| {
                log.address == WARP_CONTRACT_ADDRESS
                    && log.topics.first() == Some(&self.warp.event_id())
            })
            .filter_map(|log| match UnsignedMessage::from_bytes(&log.data) {
                Ok(message) => Some(message),
                Err(e) => {
                    warn!("[qc-19] Undecodable SendWarpMessage log: {}", e);
                    None
                }
            })
            .collect()
    }
}
