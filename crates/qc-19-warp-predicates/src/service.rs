//! Predicate Block Service
//!
//! Drives blocks through build, verification, acceptance and rejection.
//! Predicate results are computed once by the builder and committed into the
//! header; every verifier recomputes them under the proposer's context and
//! rejects the block on any byte difference.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use qc_18_warp_messaging::WarpBackendApi;
use quantum_telemetry::{
    log_block_event, metric_inc, subsystem_span, BLOCK_TRANSITIONS, HEADER_RESULT_MISMATCHES,
};
use shared_types::Hash;
use tracing::{debug, info, warn};

use crate::adapters::{BlockExecutor, ExecutionOutcome};
use crate::algorithms::{compute_predicate_results, intrinsic_gas, PredicaterSet};
use crate::config::PredicateConfig;
use crate::domain::{
    Block, BlockStatus, HeaderPredicateResults, PredicateTransaction, ProposerContext, Receipt,
};
use crate::error::{BlockError, Result};
use crate::ports::PredicateBlockApi;

const SUBSYSTEM: &str = "qc-19";

struct BlockBody {
    block: Block,
    /// Set once the block has executed.
    receipts: Option<Vec<Receipt>>,
}

struct BlockRecord {
    number: u64,
    status: BlockStatus,
    /// Dropped on rejection.
    body: Option<BlockBody>,
}

impl BlockRecord {
    fn new(block: Block, receipts: Option<Vec<Receipt>>) -> Self {
        Self {
            number: block.header.number,
            status: BlockStatus::Built,
            body: Some(BlockBody { block, receipts }),
        }
    }
}

/// Block lifecycle with predicate re-verification.
pub struct PredicateBlockService {
    config: PredicateConfig,
    predicaters: PredicaterSet,
    executor: BlockExecutor,
    backend: Arc<dyn WarpBackendApi>,
    blocks: RwLock<HashMap<Hash, BlockRecord>>,
    /// Serializes accept and reject.
    decision: Mutex<()>,
}

impl PredicateBlockService {
    /// Create the service. Every configured predicate address needs a
    /// predicater; predicaters for other addresses are ignored.
    ///
    /// # Errors
    /// * `BlockError::UnregisteredPredicater` - configured address without a
    ///   predicater
    pub fn new(
        config: PredicateConfig,
        mut predicaters: PredicaterSet,
        executor: BlockExecutor,
        backend: Arc<dyn WarpBackendApi>,
    ) -> Result<Self> {
        let addresses = config.sorted_addresses();
        if let Some(address) = addresses.iter().find(|a| !predicaters.contains_key(*a)) {
            return Err(BlockError::UnregisteredPredicater { address: *address });
        }
        predicaters.retain(|address, _| addresses.contains(address));

        info!(
            "[qc-19] Initializing predicate block service with {} predicate contract(s)",
            predicaters.len()
        );
        Ok(Self {
            config,
            predicaters,
            executor,
            backend,
            blocks: RwLock::new(HashMap::new()),
            decision: Mutex::new(()),
        })
    }

    /// Service configuration.
    pub fn config(&self) -> &PredicateConfig {
        &self.config
    }

    /// The block executor.
    pub fn executor(&self) -> &BlockExecutor {
        &self.executor
    }

    /// Stored block. Rejected blocks keep only their status.
    pub fn block(&self, block_hash: &Hash) -> Result<Block> {
        self.blocks
            .read()
            .get(block_hash)
            .and_then(|r| r.body.as_ref())
            .map(|b| b.block.clone())
            .ok_or(BlockError::UnknownBlock {
                block_hash: *block_hash,
            })
    }

    /// Blocks whose body is still held.
    pub fn retained_blocks(&self) -> usize {
        self.blocks
            .read()
            .values()
            .filter(|r| r.body.is_some())
            .count()
    }

    /// Forget decided blocks below `below_height`, including the backend's
    /// acceptance records for them. Undecided blocks are kept. Returns the
    /// number of blocks forgotten.
    pub fn prune(&self, below_height: u64) -> usize {
        let _decision = self.decision.lock();
        let mut blocks = self.blocks.write();
        let stale: Vec<(Hash, BlockStatus)> = blocks
            .iter()
            .filter(|(_, r)| r.number < below_height && r.status.is_terminal())
            .map(|(hash, r)| (*hash, r.status))
            .collect();
        for (hash, status) in &stale {
            blocks.remove(hash);
            if *status == BlockStatus::Accepted {
                self.backend.forget_block(hash);
            }
        }
        drop(blocks);

        if !stale.is_empty() {
            debug!(
                "[qc-19] Pruned {} decided blocks below height {}",
                stale.len(),
                below_height
            );
        }
        stale.len()
    }

    /// Decoded predicate results of a stored block.
    pub fn predicate_results(&self, block_hash: &Hash) -> Result<HeaderPredicateResults> {
        let block = self.block(block_hash)?;
        Ok(HeaderPredicateResults::from_bytes(
            &block.header.predicate_results,
        )?)
    }

    fn is_includable(&self, tx: &PredicateTransaction) -> bool {
        match intrinsic_gas(tx, &self.predicaters) {
            Ok(required) if required <= tx.gas_limit => true,
            Ok(required) => {
                debug!(
                    "[qc-19] Dropping tx {:02x?}: intrinsic gas {} over limit {}",
                    &tx.hash()[..4],
                    required,
                    tx.gas_limit
                );
                false
            }
            Err(e) => {
                debug!("[qc-19] Dropping tx {:02x?}: {}", &tx.hash()[..4], e);
                false
            }
        }
    }

    fn record_messages(&self, block_hash: Hash, outcome: &ExecutionOutcome) -> Result<()> {
        for message in &outcome.warp_messages {
            self.backend.add_message(block_hash, message.clone())?;
        }
        Ok(())
    }

    fn check_transition(&self, block_hash: &Hash, next: BlockStatus) -> Result<()> {
        let blocks = self.blocks.read();
        let record = blocks.get(block_hash).ok_or(BlockError::UnknownBlock {
            block_hash: *block_hash,
        })?;
        if !record.status.can_transition_to(next) {
            return Err(BlockError::InvalidTransition {
                from: record.status,
                to: next,
            });
        }
        Ok(())
    }

    fn transition(&self, block_hash: &Hash, next: BlockStatus) -> Result<u64> {
        let mut blocks = self.blocks.write();
        let record = blocks.get_mut(block_hash).ok_or(BlockError::UnknownBlock {
            block_hash: *block_hash,
        })?;
        if !record.status.can_transition_to(next) {
            return Err(BlockError::InvalidTransition {
                from: record.status,
                to: next,
            });
        }
        record.status = next;
        if next == BlockStatus::Rejected {
            record.body = None;
        }
        metric_inc!(BLOCK_TRANSITIONS, &[next.label()]);
        Ok(record.number)
    }

    fn verify_inner(&self, block_hash: &Hash, context: Option<&ProposerContext>) -> Result<()> {
        let _span = subsystem_span!(
            "verify_block",
            subsystem = SUBSYSTEM,
            block = %hex::encode(block_hash)
        )
        .entered();
        let unknown = BlockError::UnknownBlock {
            block_hash: *block_hash,
        };
        let (block, status, executed) = {
            let blocks = self.blocks.read();
            let record = blocks.get(block_hash).ok_or(unknown.clone())?;
            if record.status != BlockStatus::Accepted
                && !record.status.can_transition_to(BlockStatus::Verified)
            {
                return Err(BlockError::InvalidTransition {
                    from: record.status,
                    to: BlockStatus::Verified,
                });
            }
            let body = record.body.as_ref().ok_or(unknown)?;
            (body.block.clone(), record.status, body.receipts.is_some())
        };

        let expected =
            compute_predicate_results(&block.transactions, &self.predicaters, context).to_bytes();
        if expected != block.header.predicate_results {
            metric_inc!(HEADER_RESULT_MISMATCHES);
            warn!(
                "[qc-19] Block {} at height {}: predicate results differ from header",
                hex::encode(block_hash),
                block.header.number
            );
            return Err(BlockError::InvalidHeaderPredicateResults {
                block_hash: *block_hash,
            });
        }
        if status == BlockStatus::Accepted {
            return Ok(());
        }

        if !executed {
            let outcome = self.executor.execute_block(&block, &self.predicaters)?;
            self.record_messages(*block_hash, &outcome)?;
            if let Some(body) = self
                .blocks
                .write()
                .get_mut(block_hash)
                .and_then(|r| r.body.as_mut())
            {
                body.receipts.get_or_insert(outcome.receipts);
            }
        }

        let number = self.transition(block_hash, BlockStatus::Verified)?;
        log_block_event!(
            debug,
            SUBSYSTEM,
            "Block verified",
            number,
            hex::encode(block_hash),
            with_context = context.is_some()
        );
        Ok(())
    }
}

impl PredicateBlockApi for PredicateBlockService {
    fn build_block_with_context(
        &self,
        parent_hash: Hash,
        number: u64,
        timestamp: u64,
        transactions: Vec<PredicateTransaction>,
        context: Option<&ProposerContext>,
    ) -> Result<Block> {
        let offered = transactions.len();
        let transactions: Vec<PredicateTransaction> = transactions
            .into_iter()
            .filter(|tx| self.is_includable(tx))
            .collect();

        let results = compute_predicate_results(&transactions, &self.predicaters, context);
        let block = Block::new(
            parent_hash,
            number,
            timestamp,
            transactions,
            results.to_bytes(),
        );
        let block_hash = block.hash();

        let outcome = self.executor.execute_block(&block, &self.predicaters)?;
        self.record_messages(block_hash, &outcome)?;

        self.blocks.write().insert(
            block_hash,
            BlockRecord::new(block.clone(), Some(outcome.receipts)),
        );
        metric_inc!(BLOCK_TRANSITIONS, &[BlockStatus::Built.label()]);
        log_block_event!(
            info,
            SUBSYSTEM,
            "Block built",
            number,
            hex::encode(block_hash),
            txs = block.transactions.len(),
            dropped = offered - block.transactions.len(),
            failed_predicates = results.count_failed()
        );
        Ok(block)
    }

    fn import_block(&self, block: Block) -> Result<Hash> {
        let block_hash = block.hash();
        if !block.has_valid_root() {
            return Err(BlockError::TransactionsRootMismatch { block_hash });
        }
        HeaderPredicateResults::from_bytes(&block.header.predicate_results)?;

        let mut blocks = self.blocks.write();
        if !blocks.contains_key(&block_hash) {
            debug!(
                "[qc-19] Imported block {} at height {}",
                hex::encode(block_hash),
                block.header.number
            );
            blocks.insert(block_hash, BlockRecord::new(block, None));
        }
        Ok(block_hash)
    }

    fn should_verify_with_context(&self, block_hash: &Hash) -> Result<bool> {
        let block = self.block(block_hash)?;
        Ok(block
            .transactions
            .iter()
            .any(|tx| tx.has_predicates(self.predicaters.keys())))
    }

    fn verify(&self, block_hash: &Hash) -> Result<()> {
        self.verify_inner(block_hash, None)
    }

    fn verify_with_context(&self, block_hash: &Hash, context: &ProposerContext) -> Result<()> {
        self.verify_inner(block_hash, Some(context))
    }

    fn accept(&self, block_hash: &Hash) -> Result<()> {
        let _decision = self.decision.lock();
        self.check_transition(block_hash, BlockStatus::Accepted)?;
        // The block stays Verified if signing fails, so accept can be retried.
        self.backend.accept_block(block_hash)?;
        let number = self.transition(block_hash, BlockStatus::Accepted)?;
        log_block_event!(
            info,
            SUBSYSTEM,
            "Block accepted",
            number,
            hex::encode(block_hash)
        );
        Ok(())
    }

    fn reject(&self, block_hash: &Hash) -> Result<()> {
        let _decision = self.decision.lock();
        self.check_transition(block_hash, BlockStatus::Rejected)?;
        self.backend.reject_block(block_hash)?;
        let number = self.transition(block_hash, BlockStatus::Rejected)?;
        log_block_event!(
            info,
            SUBSYSTEM,
            "Block rejected",
            number,
            hex::encode(block_hash)
        );
        Ok(())
    }

    fn status(&self, block_hash: &Hash) -> Result<BlockStatus> {
        self.blocks
            .read()
            .get(block_hash)
            .map(|r| r.status)
            .ok_or(BlockError::UnknownBlock {
                block_hash: *block_hash,
            })
    }

    fn receipts(&self, block_hash: &Hash) -> Result<Vec<Receipt>> {
        let blocks = self.blocks.read();
        let record = blocks.get(block_hash).ok_or(BlockError::UnknownBlock {
            block_hash: *block_hash,
        })?;
        Ok(record
            .body
            .as_ref()
            .and_then(|b| b.receipts.clone())
            .unwrap_or_default())
    }
}
