//! # Inbound Ports (Driving Ports / API)
//!
//! Block lifecycle as driven by the consensus engine.

use shared_types::Hash;

use crate::domain::{Block, BlockStatus, PredicateTransaction, ProposerContext, Receipt};
use crate::error::Result;

/// Predicate-aware block lifecycle.
pub trait PredicateBlockApi: Send + Sync {
    /// Build a block on `parent_hash`, verifying predicates under `context`
    /// and committing the results into the header. Invalid transactions are
    /// left out.
    fn build_block_with_context(
        &self,
        parent_hash: Hash,
        number: u64,
        timestamp: u64,
        transactions: Vec<PredicateTransaction>,
        context: Option<&ProposerContext>,
    ) -> Result<Block>;

    /// Register a block received from a peer.
    fn import_block(&self, block: Block) -> Result<Hash>;

    /// Whether the block carries predicates and needs a proposer context.
    fn should_verify_with_context(&self, block_hash: &Hash) -> Result<bool>;

    /// Verify without proposer context; every predicate counts as failed.
    fn verify(&self, block_hash: &Hash) -> Result<()>;

    /// Recompute predicate results under `context` and require them to
    /// equal the header's.
    ///
    /// # Errors
    /// * `BlockError::InvalidHeaderPredicateResults` - results differ
    /// * `BlockError::InvalidTransaction` - a transaction cannot execute
    fn verify_with_context(&self, block_hash: &Hash, context: &ProposerContext) -> Result<()>;

    /// Finalize a verified block.
    fn accept(&self, block_hash: &Hash) -> Result<()>;

    /// Discard a block.
    fn reject(&self, block_hash: &Hash) -> Result<()>;

    /// Current status.
    fn status(&self, block_hash: &Hash) -> Result<BlockStatus>;

    /// Receipts of an executed block, in transaction order.
    fn receipts(&self, block_hash: &Hash) -> Result<Vec<Receipt>>;
}
