//! # QC-19 Predicate Result Benchmarks
//!
//! - Predicate packing and unpacking
//! - Header results for blocks full of warp transactions

use std::collections::BTreeMap;
use std::sync::Arc;

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use qc_18_warp_messaging::contract::WARP_CONTRACT_ADDRESS;
use qc_19_warp_predicates::{
    compute_predicate_results, new_predicate_tx, pack_predicate,
    pack_validate_invalid_warp_message, unpack_predicate, Predicater, PredicaterSet,
    ProposerContext, WarpPredicater,
};

use crate::fixtures::*;

/// Packing round trip of a signed message.
pub fn bench_packing(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-19-packing");
    let testbed = WarpTestbed::two_validators();
    let bytes = testbed
        .sign_all(&addressed_message(SENDER, RECEIVER_ADDRESS, &[7; 512]))
        .to_bytes();
    let packed = pack_predicate(&bytes);

    group.bench_function("pack", |b| b.iter(|| black_box(pack_predicate(&bytes))));
    group.bench_function("unpack", |b| {
        b.iter(|| black_box(unpack_predicate(&packed).is_ok()))
    });
    group.finish();
}

/// Header results for blocks of warp transactions.
pub fn bench_block_results(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-19-block-results");
    let testbed = WarpTestbed::new(&[100; 8]);
    let mut predicaters: PredicaterSet = BTreeMap::new();
    predicaters.insert(
        WARP_CONTRACT_ADDRESS,
        Arc::new(WarpPredicater::new(testbed.verifier())) as Arc<dyn Predicater>,
    );
    let context = ProposerContext::new(MINIMUM_HEIGHT);

    for txs in [1usize, 16, 64] {
        let transactions: Vec<_> = (0..txs)
            .map(|n| {
                let signed = testbed.sign_all(&block_hash_message([n as u8; 32]));
                new_predicate_tx(
                    n as u64,
                    SENDER,
                    Some(RECEIVER_ADDRESS),
                    1_000_000,
                    1,
                    pack_validate_invalid_warp_message(0),
                    vec![],
                    WARP_CONTRACT_ADDRESS,
                    &signed.to_bytes(),
                )
            })
            .collect();

        group.throughput(Throughput::Elements(txs as u64));
        group.bench_with_input(
            BenchmarkId::new("compute", txs),
            &transactions,
            |b, transactions| {
                b.iter(|| {
                    black_box(
                        compute_predicate_results(transactions, &predicaters, Some(&context))
                            .to_bytes(),
                    )
                })
            },
        );
    }

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_packing(c);
    bench_block_results(c);
}
