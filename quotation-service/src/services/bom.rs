//! Bill-of-materials generation for a solar system.
//!
//! Lines are emitted in a fixed order: module, inverter, structure, the
//! balance-of-system table in table order, then every remaining per-kW item
//! in catalog order. Generation is pure; the same inputs always produce the
//! same ordered lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::error::QuotationError;
use crate::models::{
    Catalog, CatalogItem, ItemCategory, PricingConvention, QuotationLine, SystemConfiguration,
    SystemSizing,
};
use crate::services::pricing::price_line;

/// Mounting structure weight, kg per kW of actual capacity.
pub const STRUCTURE_KG_PER_KW: u32 = 45;

/// DC/AC cable run, meters per kW of actual capacity.
pub const CABLE_METERS_PER_KW: u32 = 10;

/// How a balance-of-system category derives its quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BosQuantity {
    /// Actual system watts.
    SystemWatts,
    Fixed(u32),
    /// Multiple of actual system kW.
    PerKw(u32),
    /// One connector pair per two modules.
    HalfModules,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BosRule {
    pub category: ItemCategory,
    pub quantity: BosQuantity,
}

pub const BOS_RULES: [BosRule; 6] = [
    BosRule {
        category: ItemCategory::Acdb,
        quantity: BosQuantity::SystemWatts,
    },
    BosRule {
        category: ItemCategory::Dcdb,
        quantity: BosQuantity::SystemWatts,
    },
    BosRule {
        category: ItemCategory::Earthing,
        quantity: BosQuantity::Fixed(3),
    },
    BosRule {
        category: ItemCategory::LightningArrestor,
        quantity: BosQuantity::Fixed(1),
    },
    BosRule {
        category: ItemCategory::Cables,
        quantity: BosQuantity::PerKw(CABLE_METERS_PER_KW),
    },
    BosRule {
        category: ItemCategory::Connectors,
        quantity: BosQuantity::HalfModules,
    },
];

impl BosQuantity {
    pub fn resolve(&self, sizing: &SystemSizing) -> Decimal {
        match self {
            BosQuantity::SystemWatts => sizing.actual_watts,
            BosQuantity::Fixed(qty) => Decimal::from(*qty),
            BosQuantity::PerKw(factor) => sizing.actual_kw * Decimal::from(*factor),
            BosQuantity::HalfModules => Decimal::from(sizing.number_of_modules) / Decimal::TWO,
        }
    }
}

/// The three user-selected components of a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Module,
    Inverter,
    Structure,
}

impl Selection {
    fn label(&self) -> &'static str {
        match self {
            Selection::Module => "module",
            Selection::Inverter => "inverter",
            Selection::Structure => "structure",
        }
    }

    /// Fixed quantity for the selected item. The item's pricing convention
    /// does not change it: modules are billed per actual watt, the inverter
    /// as one unit, the structure per kg of derived weight.
    fn quantity(&self, sizing: &SystemSizing) -> Decimal {
        match self {
            Selection::Module => sizing.actual_watts,
            Selection::Inverter => Decimal::ONE,
            Selection::Structure => sizing.actual_kw * Decimal::from(STRUCTURE_KG_PER_KW),
        }
    }
}

/// Generated lines with the sizing they were derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomReport {
    pub sizing: SystemSizing,
    pub lines: Vec<QuotationLine>,
    /// Balance-of-system categories with no catalog item; their lines were
    /// left out.
    pub missing_categories: Vec<ItemCategory>,
}

/// Ordered BOM lines for `config` priced from `catalog`.
pub fn generate_bom(
    config: &SystemConfiguration,
    catalog: &Catalog,
) -> Result<Vec<QuotationLine>, QuotationError> {
    generate_bom_report(config, catalog).map(|report| report.lines)
}

pub fn generate_bom_report(
    config: &SystemConfiguration,
    catalog: &Catalog,
) -> Result<BomReport, QuotationError> {
    let sizing = config.sizing()?;

    let selections = [
        (Selection::Module, resolve(catalog, &config.module_item_id, Selection::Module)?),
        (Selection::Inverter, resolve(catalog, &config.inverter_item_id, Selection::Inverter)?),
        (Selection::Structure, resolve(catalog, &config.structure_item_id, Selection::Structure)?),
    ];

    let mut lines = Vec::with_capacity(selections.len() + BOS_RULES.len());
    let mut emitted: HashSet<&str> = HashSet::new();
    let mut missing_categories = Vec::new();

    for (selection, item) in selections {
        let quantity = selection.quantity(&sizing);
        lines.push(price_line(item, quantity, None, None)?);
        emitted.insert(item.item_id.as_str());
    }

    for rule in BOS_RULES.iter() {
        match catalog.first_in(rule.category) {
            Some(item) => {
                lines.push(price_line(item, rule.quantity.resolve(&sizing), None, None)?);
                emitted.insert(item.item_id.as_str());
            }
            None => {
                warn!(category = %rule.category, "No catalog item for BOS category, line omitted");
                missing_categories.push(rule.category);
            }
        }
    }

    for item in catalog.items() {
        if item.pricing_unit == PricingConvention::PerKw && !emitted.contains(item.item_id.as_str())
        {
            lines.push(price_line(item, sizing.actual_kw, None, None)?);
            emitted.insert(item.item_id.as_str());
        }
    }

    debug!(
        modules = sizing.number_of_modules,
        actual_kw = %sizing.actual_kw,
        lines = lines.len(),
        missing = missing_categories.len(),
        "BOM generated"
    );

    Ok(BomReport {
        sizing,
        lines,
        missing_categories,
    })
}

fn resolve<'a>(
    catalog: &'a Catalog,
    item_id: &str,
    selection: Selection,
) -> Result<&'a CatalogItem, QuotationError> {
    catalog.get(item_id).ok_or_else(|| {
        QuotationError::InvalidConfiguration(format!(
            "{} item '{}' not found in catalog",
            selection.label(),
            item_id
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, category: &str, price: i64, convention: PricingConvention) -> CatalogItem {
        CatalogItem {
            item_id: id.to_string(),
            name: id.to_string(),
            brand: None,
            unit_price: Decimal::from(price),
            tax_rate: Decimal::ZERO,
            margin_rate: Decimal::ZERO,
            unit: "Nos".to_string(),
            category: category.to_string(),
            pricing_unit: convention,
        }
    }

    fn config(kw: i64, wattage: i64) -> SystemConfiguration {
        SystemConfiguration {
            system_capacity_kw: Decimal::from(kw),
            module_wattage: Decimal::from(wattage),
            module_item_id: "MOD".to_string(),
            inverter_item_id: "INV".to_string(),
            structure_item_id: "STR".to_string(),
        }
    }

    fn minimal_catalog() -> Catalog {
        Catalog::new(vec![
            item("MOD", "Solar Modules", 20, PricingConvention::PerWatt),
            item("INV", "Inverters", 150000, PricingConvention::PerUnit),
            item("STR", "Mounting Structure", 120, PricingConvention::PerUnit),
        ])
        .unwrap()
    }

    #[test]
    fn test_bos_quantities() {
        let sizing = config(15, 630).sizing().unwrap();

        assert_eq!(BosQuantity::SystemWatts.resolve(&sizing), Decimal::from(15120));
        assert_eq!(BosQuantity::Fixed(3).resolve(&sizing), Decimal::from(3));
        assert_eq!(BosQuantity::PerKw(10).resolve(&sizing), Decimal::new(1512, 1));
        assert_eq!(BosQuantity::HalfModules.resolve(&sizing), Decimal::from(12));
    }

    #[test]
    fn test_odd_module_count_keeps_half_connector() {
        let sizing = config(5, 550).sizing().unwrap();
        assert_eq!(sizing.number_of_modules, 10);
        let sizing = config(6, 550).sizing().unwrap();
        assert_eq!(sizing.number_of_modules, 11);
        assert_eq!(BosQuantity::HalfModules.resolve(&sizing), Decimal::new(55, 1));
    }

    #[test]
    fn test_primary_lines_without_bos() {
        let report = generate_bom_report(&config(15, 630), &minimal_catalog()).unwrap();

        assert_eq!(report.lines.len(), 3);
        assert_eq!(report.lines[0].quantity, Decimal::from(15120));
        assert_eq!(report.lines[0].base_amount, Decimal::from(302400));
        assert_eq!(report.lines[1].quantity, Decimal::ONE);
        assert_eq!(report.lines[2].quantity, Decimal::new(6804, 1));
        assert_eq!(report.missing_categories.len(), BOS_RULES.len());
    }

    #[test]
    fn test_selection_quantity_ignores_convention() {
        let catalog = Catalog::new(vec![
            item("MOD", "Solar Modules", 20, PricingConvention::PerUnit),
            item("INV", "Inverters", 4000, PricingConvention::PerKw),
            item("STR", "Mounting Structure", 120, PricingConvention::PerKw),
        ])
        .unwrap();

        let lines = generate_bom(&config(15, 630), &catalog).unwrap();
        let quantities: Vec<Decimal> = lines.iter().map(|l| l.quantity).collect();
        assert_eq!(
            quantities,
            vec![Decimal::from(15120), Decimal::ONE, Decimal::new(6804, 1)]
        );
        assert_eq!(lines[1].base_amount, Decimal::from(4000));
    }

    #[test]
    fn test_unknown_selection_fails_before_any_line() {
        let mut cfg = config(10, 540);
        cfg.inverter_item_id = "INV-404".to_string();

        let err = generate_bom(&cfg, &minimal_catalog()).unwrap_err();
        match err {
            QuotationError::InvalidConfiguration(msg) => assert!(msg.contains("INV-404")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_per_kw_selection_not_repeated() {
        let catalog = Catalog::new(vec![
            item("MOD", "Solar Modules", 20, PricingConvention::PerWatt),
            item("INV", "Inverters", 4000, PricingConvention::PerKw),
            item("STR", "Mounting Structure", 120, PricingConvention::PerUnit),
            item("INST", "Installation", 2500, PricingConvention::PerKw),
        ])
        .unwrap();

        let lines = generate_bom(&config(10, 500), &catalog).unwrap();
        let ids: Vec<&str> = lines.iter().map(|l| l.item_id.as_str()).collect();
        assert_eq!(ids, vec!["MOD", "INV", "STR", "INST"]);
        assert_eq!(lines[1].quantity, Decimal::ONE);
        assert_eq!(lines[3].base_amount, Decimal::from(25000));
    }
}
