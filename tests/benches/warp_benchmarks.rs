//! # Quantum-Chain Warp Benchmarks
//!
//! | Subsystem | Operation | Target |
//! |-----------|-----------|--------|
//! | qc-18 Warp Messaging | Verify 64-validator quorum | < 5ms |
//! | qc-18 Warp Messaging | Decode 64 KiB signed message | < 100μs |
//! | qc-19 Warp Predicates | Results for 64 warp txs | < 50ms |

use criterion::{criterion_group, criterion_main, Criterion};
use qc_tests::benchmarks::{qc_18_warp_verification, qc_19_predicate_results};

fn warp_verification(c: &mut Criterion) {
    qc_18_warp_verification::register_benchmarks(c);
}

fn predicate_results(c: &mut Criterion) {
    qc_19_predicate_results::register_benchmarks(c);
}

criterion_group!(benches, warp_verification, predicate_results);
criterion_main!(benches);
