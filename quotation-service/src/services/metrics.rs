//! Prometheus metrics for quotation-service.

use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, register_int_counter_vec, CounterVec, IntCounterVec, TextEncoder};

/// Quotation counter by lifecycle event.
pub static QUOTATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "quotation_quotations_total",
        "Total number of quotations by event",
        &["event"] // created, won, lost, reopened
    )
    .expect("Failed to register quotations_total")
});

/// Version counter by finality.
pub static VERSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "quotation_versions_total",
        "Total number of quotation versions created",
        &["final"]
    )
    .expect("Failed to register versions_total")
});

/// BOM generation counter.
pub static BOMS_GENERATED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "quotation_boms_generated_total",
        "Total number of generated bills of materials by outcome",
        &["outcome"]
    )
    .expect("Failed to register boms_generated_total")
});

/// BOS categories skipped for lack of a catalog item.
pub static BOS_CATEGORY_MISSING_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "quotation_bos_category_missing_total",
        "BOS categories omitted from a BOM because the catalog has no item",
        &["category"]
    )
    .expect("Failed to register bos_category_missing_total")
});

/// Grand total of created versions by currency label.
pub static QUOTED_AMOUNT_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "quotation_quoted_amount_total",
        "Total quoted amount by currency",
        &["currency"]
    )
    .expect("Failed to register quoted_amount_total")
});

/// Error counter for alerting.
pub static ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "quotation_errors_total",
        "Total number of errors by type",
        &["error_type"]
    )
    .expect("Failed to register errors_total")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&QUOTATIONS_TOTAL);
    Lazy::force(&VERSIONS_TOTAL);
    Lazy::force(&BOMS_GENERATED_TOTAL);
    Lazy::force(&BOS_CATEGORY_MISSING_TOTAL);
    Lazy::force(&QUOTED_AMOUNT_TOTAL);
    Lazy::force(&ERRORS_TOTAL);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
