//! Line-item pricing.
//!
//! The only place base, margin and tax amounts are computed. Margin and tax
//! are both taken on the base amount and never compound.

use rust_decimal::Decimal;

use crate::error::QuotationError;
use crate::models::{Catalog, CatalogItem, LineItemRequest, QuotationLine};

/// Price `quantity` of `item`. Overrides replace the catalog margin/tax rate.
pub fn price_line(
    item: &CatalogItem,
    quantity: Decimal,
    margin_override: Option<Decimal>,
    tax_override: Option<Decimal>,
) -> Result<QuotationLine, QuotationError> {
    if quantity < Decimal::ZERO {
        return Err(QuotationError::InvalidQuantity {
            item_id: item.item_id.clone(),
            quantity,
        });
    }

    let margin_rate = margin_override.unwrap_or(item.margin_rate);
    let tax_rate = tax_override.unwrap_or(item.tax_rate);

    let overflow = || QuotationError::AmountOverflow(format!("line '{}'", item.item_id));
    let base_amount = item.unit_price.checked_mul(quantity).ok_or_else(overflow)?;
    let margin_amount = base_amount.checked_mul(margin_rate).ok_or_else(overflow)?;
    let tax_amount = base_amount.checked_mul(tax_rate).ok_or_else(overflow)?;
    let line_total = base_amount
        .checked_add(margin_amount)
        .and_then(|sum| sum.checked_add(tax_amount))
        .ok_or_else(overflow)?;

    Ok(QuotationLine {
        item_id: item.item_id.clone(),
        description: item.name.clone(),
        brand: item.brand.clone(),
        category: item.category_tag(),
        unit: item.unit.clone(),
        pricing_unit: item.pricing_unit,
        quantity,
        unit_price: item.unit_price,
        margin_rate,
        tax_rate,
        base_amount,
        margin_amount,
        tax_amount,
        line_total,
    })
}

/// Resolve and price every request line. Stops at the first failure so a
/// quotation is never saved with lines silently missing.
pub fn price_requests(
    catalog: &Catalog,
    requests: &[LineItemRequest],
) -> Result<Vec<QuotationLine>, QuotationError> {
    requests
        .iter()
        .map(|request| {
            let item = catalog
                .get(&request.item_id)
                .ok_or_else(|| QuotationError::UnknownCatalogItem(request.item_id.clone()))?;
            price_line(
                item,
                request.quantity,
                request.margin_override(),
                request.tax_override(),
            )
        })
        .collect()
}
