//! Services module for quotation-service.

pub mod aggregate;
pub mod bom;
pub mod metrics;
pub mod pricing;
pub mod quotation;
pub mod store;
pub mod versioning;

pub use aggregate::aggregate;
pub use bom::{generate_bom, generate_bom_report, BomReport};
pub use metrics::{get_metrics, init_metrics};
pub use pricing::{price_line, price_requests};
pub use quotation::QuotationService;
pub use store::{InMemoryStore, QuotationStore};
pub use versioning::next_version_label;
