//! Quotation line model for quotation-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::catalog::{ItemCategory, PricingConvention};

/// One priced row of a quotation.
///
/// Rates are copied from the catalog item (or an override) when the line is
/// priced, so later catalog edits never change an existing line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationLine {
    pub item_id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub category: ItemCategory,
    pub unit: String,
    pub pricing_unit: PricingConvention,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub margin_rate: Decimal,
    pub tax_rate: Decimal,
    pub base_amount: Decimal,
    pub margin_amount: Decimal,
    pub tax_amount: Decimal,
    pub line_total: Decimal,
}

impl QuotationLine {
    /// Request that re-prices this line to the same amounts.
    pub fn to_request(&self) -> LineItemRequest {
        LineItemRequest {
            item_id: self.item_id.clone(),
            quantity: self.quantity,
            margin_percent: Some(self.margin_rate * Decimal::ONE_HUNDRED),
            tax_percent: Some(self.tax_rate * Decimal::ONE_HUNDRED),
        }
    }
}

/// Line entry on a create/add-version request. Percentages are whole-number
/// percents (12.5 means 12.5%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LineItemRequest {
    #[validate(length(min = 1, message = "Item id is required"))]
    pub item_id: String,
    pub quantity: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_percent: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_percent: Option<Decimal>,
}

impl LineItemRequest {
    pub fn new(item_id: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
            margin_percent: None,
            tax_percent: None,
        }
    }

    pub fn with_margin_percent(mut self, percent: Decimal) -> Self {
        self.margin_percent = Some(percent);
        self
    }

    pub fn with_tax_percent(mut self, percent: Decimal) -> Self {
        self.tax_percent = Some(percent);
        self
    }

    pub fn margin_override(&self) -> Option<Decimal> {
        self.margin_percent.map(|p| p / Decimal::ONE_HUNDRED)
    }

    pub fn tax_override(&self) -> Option<Decimal> {
        self.tax_percent.map(|p| p / Decimal::ONE_HUNDRED)
    }
}
