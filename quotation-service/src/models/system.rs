//! Solar system configuration and derived sizing.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::QuotationError;

/// Input to BOM generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfiguration {
    pub system_capacity_kw: Decimal,
    pub module_wattage: Decimal,
    pub module_item_id: String,
    pub inverter_item_id: String,
    pub structure_item_id: String,
}

/// Physical size of the system after rounding up to whole modules.
///
/// `actual_kw` is authoritative for every downstream quantity; the requested
/// capacity is never used past this point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSizing {
    pub number_of_modules: u32,
    pub actual_watts: Decimal,
    pub actual_kw: Decimal,
}

impl SystemConfiguration {
    pub fn validate(&self) -> Result<(), QuotationError> {
        if self.system_capacity_kw <= Decimal::ZERO {
            return Err(QuotationError::InvalidConfiguration(format!(
                "system capacity must be positive (got {} kW)",
                self.system_capacity_kw
            )));
        }
        if self.module_wattage <= Decimal::ZERO {
            return Err(QuotationError::InvalidConfiguration(format!(
                "module wattage must be positive (got {} W)",
                self.module_wattage
            )));
        }
        Ok(())
    }

    pub fn sizing(&self) -> Result<SystemSizing, QuotationError> {
        self.validate()?;

        let target_watts = self
            .system_capacity_kw
            .checked_mul(Decimal::ONE_THOUSAND)
            .ok_or_else(|| {
                QuotationError::InvalidConfiguration("system capacity is too large".to_string())
            })?;

        let too_many_modules = || {
            QuotationError::InvalidConfiguration(format!(
                "{} kW at {} W per module needs too many modules",
                self.system_capacity_kw, self.module_wattage
            ))
        };

        let number_of_modules = target_watts
            .checked_div(self.module_wattage)
            .ok_or_else(too_many_modules)?
            .ceil()
            .to_u32()
            .ok_or_else(too_many_modules)?;

        let actual_watts = Decimal::from(number_of_modules)
            .checked_mul(self.module_wattage)
            .ok_or_else(too_many_modules)?;

        Ok(SystemSizing {
            number_of_modules,
            actual_watts,
            actual_kw: actual_watts / Decimal::ONE_THOUSAND,
        })
    }
}
