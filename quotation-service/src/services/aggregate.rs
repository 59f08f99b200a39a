//! Quotation totals.

use rust_decimal::Decimal;

use crate::error::QuotationError;
use crate::models::{QuotationLine, QuotationTotals};

/// Sum a line set. The grand total is built from the three component sums,
/// which equals the sum of line totals since no step rounds.
pub fn aggregate(lines: &[QuotationLine]) -> Result<QuotationTotals, QuotationError> {
    let overflow = || QuotationError::AmountOverflow("quotation totals".to_string());

    let (subtotal, margin_total, tax_total) = lines.iter().try_fold(
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        |(base, margin, tax), line| {
            Some((
                base.checked_add(line.base_amount)?,
                margin.checked_add(line.margin_amount)?,
                tax.checked_add(line.tax_amount)?,
            ))
        },
    )
    .ok_or_else(overflow)?;

    let grand_total = subtotal
        .checked_add(margin_total)
        .and_then(|sum| sum.checked_add(tax_total))
        .ok_or_else(overflow)?;

    Ok(QuotationTotals {
        subtotal,
        margin_total,
        tax_total,
        grand_total,
    })
}
