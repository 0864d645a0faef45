//! # Domain Layer
//!
//! Predicate packing, predicate transactions, header results and blocks.

pub mod block;
pub mod errors;
pub mod predicate;
pub mod receipt;
pub mod results;
pub mod transaction;

pub use block::{transactions_root, Block, BlockHeader, BlockStatus, ProposerContext};
pub use errors::{PredicateError, PredicateFailure};
pub use predicate::{
    from_storage_keys, pack_predicate, to_storage_keys, unpack_predicate, PREDICATE_END_BYTE,
    STORAGE_KEY_LEN,
};
pub use receipt::{Receipt, ReceiptStatus};
pub use results::{HeaderPredicateResults, TxPredicateResults, RESULTS_VERSION};
pub use transaction::{new_predicate_tx, AccessTuple, PredicateTransaction, TX_BASE_GAS};
