//! Engine bootstrap for the hosting application.

use service_core::observability::init_tracing;
use std::sync::Arc;

use crate::config::QuotationConfig;
use crate::services::{init_metrics, QuotationService, QuotationStore};

/// Install tracing and metrics, then build the service over `store`.
pub fn build<S: QuotationStore>(config: &QuotationConfig, store: Arc<S>) -> QuotationService<S> {
    init_tracing(&config.service_name, &config.log_level, config.log_format);
    init_metrics();

    tracing::info!(
        service_name = %config.service_name,
        version = %config.service_version,
        environment = %config.common.environment,
        currency = %config.currency,
        "Quotation service initialized"
    );

    QuotationService::new(store, config.currency.clone())
}
