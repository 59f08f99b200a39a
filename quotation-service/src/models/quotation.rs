//! Quotation model for quotation-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::line::{LineItemRequest, QuotationLine};

/// Quotation lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuotationStatus {
    Draft,
    Won,
    Lost,
}

impl QuotationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotationStatus::Draft => "DRAFT",
            QuotationStatus::Won => "WON",
            QuotationStatus::Lost => "LOST",
        }
    }

    /// Won or lost.
    pub fn is_closed(&self) -> bool {
        matches!(self, QuotationStatus::Won | QuotationStatus::Lost)
    }
}

impl std::fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregate amounts of a line set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationTotals {
    pub subtotal: Decimal,
    pub margin_total: Decimal,
    pub tax_total: Decimal,
    pub grand_total: Decimal,
}

/// Immutable priced snapshot. Only `is_final` moves after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationVersion {
    pub version_id: Uuid,
    pub quotation_id: Uuid,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub is_final: bool,
    pub lines: Vec<QuotationLine>,
    #[serde(flatten)]
    pub totals: QuotationTotals,
    pub created_utc: DateTime<Utc>,
}

/// A client engagement grouping versions in creation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    pub quotation_id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub status: QuotationStatus,
    pub currency: String,
    pub versions: Vec<QuotationVersion>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Quotation {
    /// Most recently created version.
    pub fn latest_version(&self) -> Option<&QuotationVersion> {
        self.versions.last()
    }

    pub fn final_version(&self) -> Option<&QuotationVersion> {
        self.versions.iter().find(|v| v.is_final)
    }

    /// The version that represents the quotation: the final one if flagged,
    /// else the latest.
    pub fn effective_version(&self) -> Option<&QuotationVersion> {
        self.final_version().or_else(|| self.latest_version())
    }

    pub fn version(&self, version_id: Uuid) -> Option<&QuotationVersion> {
        self.versions.iter().find(|v| v.version_id == version_id)
    }
}

/// Input for creating a quotation with its first version.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuotationRequest {
    pub client_id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(nested)]
    #[serde(default)]
    pub items: Vec<LineItemRequest>,
    #[validate(length(min = 1, max = 32, message = "Version label cannot be empty"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

/// Input for adding a version to an existing quotation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddVersionRequest {
    pub quotation_id: Uuid,
    #[validate(nested)]
    #[serde(default)]
    pub items: Vec<LineItemRequest>,
    #[validate(length(min = 1, max = 32, message = "Version label is required"))]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default)]
    pub is_final: bool,
}
