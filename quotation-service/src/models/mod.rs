//! Domain models for quotation-service.

mod catalog;
mod line;
mod quotation;
mod system;
mod version;

pub use catalog::{Catalog, CatalogItem, ItemCategory, PricingConvention};
pub use line::{LineItemRequest, QuotationLine};
pub use quotation::{
    AddVersionRequest, CreateQuotationRequest, Quotation, QuotationStatus, QuotationTotals,
    QuotationVersion,
};
pub use system::{SystemConfiguration, SystemSizing};
pub use version::VersionLabel;
