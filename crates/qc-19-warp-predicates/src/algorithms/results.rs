//! # Predicate Results
//!
//! Verifies every predicate of every transaction against the proposer's
//! context and records the failed slots. The builder commits the outcome
//! into the header; verifiers recompute it and compare bytes.

use std::collections::BTreeMap;
use std::sync::Arc;

use qc_18_warp_messaging::BitSet;
use quantum_telemetry::{metric_inc, PREDICATE_RESULTS};
use rayon::prelude::*;
use shared_types::Address;
use tracing::debug;

use crate::domain::{
    HeaderPredicateResults, PredicateError, PredicateTransaction, ProposerContext,
    TxPredicateResults, TX_BASE_GAS,
};
use crate::error::TransactionError;
use crate::ports::Predicater;

/// Registered predicaters by contract address.
pub type PredicaterSet = BTreeMap<Address, Arc<dyn Predicater>>;

/// Results for every transaction of a block carrying at least one
/// predicate, in block order.
pub fn compute_predicate_results(
    transactions: &[PredicateTransaction],
    predicaters: &PredicaterSet,
    context: Option<&ProposerContext>,
) -> HeaderPredicateResults {
    let txs: Vec<TxPredicateResults> = transactions
        .par_iter()
        .filter_map(|tx| tx_results(tx, predicaters, context))
        .collect();

    let mut results = HeaderPredicateResults::new();
    for tx in txs {
        results.push(tx);
    }
    results
}

fn tx_results(
    tx: &PredicateTransaction,
    predicaters: &PredicaterSet,
    context: Option<&ProposerContext>,
) -> Option<TxPredicateResults> {
    if !tx.has_predicates(predicaters.keys()) {
        return None;
    }
    let tx_hash = tx.hash();

    let mut failed = BTreeMap::new();
    for (address, predicater) in predicaters {
        let predicates = tx.predicates_for(address);
        if predicates.is_empty() {
            continue;
        }
        let mut bits = BitSet::new();
        for (index, packed) in predicates.iter().enumerate() {
            match predicater.verify_predicate(context, packed) {
                Ok(()) => metric_inc!(PREDICATE_RESULTS, &["valid"]),
                Err(e) => {
                    debug!(
                        "[qc-19] Predicate {} of tx {:02x?} failed: {}",
                        index,
                        &tx_hash[..4],
                        e
                    );
                    metric_inc!(PREDICATE_RESULTS, &["invalid"]);
                    bits.add(index);
                }
            }
        }
        failed.insert(*address, bits);
    }
    Some(TxPredicateResults { tx_hash, failed })
}

/// Base transaction gas plus the gas of every predicate the transaction
/// carries.
///
/// # Errors
/// * `TransactionError::Predicate` - a predicate does not decode, or the sum
///   overflows
pub fn intrinsic_gas(
    tx: &PredicateTransaction,
    predicaters: &PredicaterSet,
) -> Result<u64, TransactionError> {
    let mut gas = TX_BASE_GAS;
    for (address, predicater) in predicaters {
        for packed in tx.predicates_for(address) {
            let cost = predicater.predicate_gas(&packed)?;
            gas = gas.checked_add(cost).ok_or(PredicateError::GasOverflow)?;
        }
    }
    Ok(gas)
}
