//! Prometheus metrics for the warp subsystems.
//!
//! All metrics follow the naming convention: `qc_<subsystem>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., warp_messages_signed_total)
//! - **Histogram**: Distribution of values (e.g., warp_verification_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // WARP MESSAGING METRICS (Subsystem 18)
    // =========================================================================

    /// Unsigned messages recorded by the backend (pending signature)
    pub static ref WARP_MESSAGES_RECORDED: Counter = Counter::new(
        "qc_warp_messages_recorded_total",
        "Total warp messages recorded as pending"
    ).expect("metric creation failed");

    /// Messages signed after their block was accepted
    pub static ref WARP_MESSAGES_SIGNED: Counter = Counter::new(
        "qc_warp_messages_signed_total",
        "Total warp messages signed on block acceptance"
    ).expect("metric creation failed");

    /// Pending messages dropped because their block was rejected
    pub static ref WARP_MESSAGES_DROPPED: Counter = Counter::new(
        "qc_warp_messages_dropped_total",
        "Total pending warp messages dropped on block rejection"
    ).expect("metric creation failed");

    /// Signature lookups served by the backend
    pub static ref WARP_SIGNATURE_REQUESTS: CounterVec = CounterVec::new(
        Opts::new("qc_warp_signature_requests_total", "Warp signature lookups"),
        &["kind", "outcome"]  // kind: message/block, outcome: hit/miss
    ).expect("metric creation failed");

    /// Signed-message verifications by outcome
    pub static ref WARP_VERIFICATIONS: CounterVec = CounterVec::new(
        Opts::new("qc_warp_verifications_total", "Warp message verifications"),
        &["result"]  // result: valid/wrong_network/registry/quorum/signature
    ).expect("metric creation failed");

    /// Verification duration
    pub static ref WARP_VERIFICATION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "qc_warp_verification_duration_seconds",
            "Time spent verifying signed warp messages"
        ).buckets(exponential_buckets(0.0001, 2.0, 15).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // PREDICATE METRICS (Subsystem 19)
    // =========================================================================

    /// Predicate outcomes written into header results
    pub static ref PREDICATE_RESULTS: CounterVec = CounterVec::new(
        Opts::new("qc_predicate_results_total", "Predicate verification outcomes"),
        &["outcome"]  // outcome: valid/invalid
    ).expect("metric creation failed");

    /// Re-verification that did not reproduce the committed header results
    pub static ref HEADER_RESULT_MISMATCHES: Counter = Counter::new(
        "qc_predicate_header_mismatches_total",
        "Blocks rejected because recomputed predicate results differ from the header"
    ).expect("metric creation failed");

    /// Block lifecycle transitions
    pub static ref BLOCK_TRANSITIONS: CounterVec = CounterVec::new(
        Opts::new("qc_predicate_block_transitions_total", "Block lifecycle transitions"),
        &["status"]  // status: built/verified/accepted/rejected
    ).expect("metric creation failed");
}

/// Handle for the metrics registry
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Warp messaging
        Box::new(WARP_MESSAGES_RECORDED.clone()),
        Box::new(WARP_MESSAGES_SIGNED.clone()),
        Box::new(WARP_MESSAGES_DROPPED.clone()),
        Box::new(WARP_SIGNATURE_REQUESTS.clone()),
        Box::new(WARP_VERIFICATIONS.clone()),
        Box::new(WARP_VERIFICATION_DURATION.clone()),
        // Predicates
        Box::new(PREDICATE_RESULTS.clone()),
        Box::new(HEADER_RESULT_MISMATCHES.clone()),
        Box::new(BLOCK_TRANSITIONS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::HistogramTimer::new(&$histogram)
    };
}
