//! Engine errors for quotation-service.

use rust_decimal::Decimal;
use service_core::error::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum QuotationError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid quantity {quantity} for item '{item_id}': quantity must not be negative")]
    InvalidQuantity { item_id: String, quantity: Decimal },

    #[error("Amount overflow while computing {0}")]
    AmountOverflow(String),

    #[error("Invalid catalog item '{item_id}': {reason}")]
    InvalidCatalogItem { item_id: String, reason: String },

    #[error("Unknown catalog item '{0}'")]
    UnknownCatalogItem(String),

    #[error("Quotation {0} not found")]
    QuotationNotFound(Uuid),

    #[error("Version {version_id} not found on quotation {quotation_id}")]
    VersionNotFound { quotation_id: Uuid, version_id: Uuid },

    #[error("Quotation {quotation_id} is {status} and cannot be changed")]
    QuotationClosed { quotation_id: Uuid, status: String },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl QuotationError {
    /// Stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            QuotationError::InvalidConfiguration(_) => "invalid_configuration",
            QuotationError::InvalidQuantity { .. } => "invalid_quantity",
            QuotationError::AmountOverflow(_) => "amount_overflow",
            QuotationError::InvalidCatalogItem { .. } => "invalid_catalog_item",
            QuotationError::UnknownCatalogItem(_) => "unknown_catalog_item",
            QuotationError::QuotationNotFound(_) => "quotation_not_found",
            QuotationError::VersionNotFound { .. } => "version_not_found",
            QuotationError::QuotationClosed { .. } => "quotation_closed",
            QuotationError::Validation(_) => "validation",
        }
    }
}

impl From<QuotationError> for AppError {
    fn from(err: QuotationError) -> Self {
        match err {
            QuotationError::Validation(errors) => AppError::ValidationError(errors),
            QuotationError::QuotationNotFound(_) | QuotationError::VersionNotFound { .. } => {
                AppError::NotFound(anyhow::Error::new(err))
            }
            QuotationError::QuotationClosed { .. } => AppError::Conflict(anyhow::Error::new(err)),
            QuotationError::InvalidConfiguration(_)
            | QuotationError::InvalidQuantity { .. }
            | QuotationError::AmountOverflow(_)
            | QuotationError::InvalidCatalogItem { .. }
            | QuotationError::UnknownCatalogItem(_) => AppError::BadRequest(anyhow::Error::new(err)),
        }
    }
}
