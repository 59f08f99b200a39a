//! Test helper module for quotation-service integration tests.
//!
//! Provides a fixture catalog and a service wired to an in-memory store.

#![allow(dead_code)]

use quotation_service::models::{Catalog, CatalogItem, PricingConvention, SystemConfiguration};
use quotation_service::services::{init_metrics, InMemoryStore, QuotationService};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_CLIENT_ID: &str = "22222222-2222-2222-2222-222222222222";

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("valid decimal literal")
}

pub fn client_id() -> Uuid {
    Uuid::parse_str(TEST_CLIENT_ID).unwrap()
}

pub fn item(
    item_id: &str,
    category: &str,
    unit_price: &str,
    margin_rate: &str,
    tax_rate: &str,
    pricing_unit: PricingConvention,
) -> CatalogItem {
    CatalogItem {
        item_id: item_id.to_string(),
        name: format!("{} ({})", item_id, category),
        brand: None,
        unit_price: dec(unit_price),
        tax_rate: dec(tax_rate),
        margin_rate: dec(margin_rate),
        unit: match pricing_unit {
            PricingConvention::PerUnit => "Nos".to_string(),
            PricingConvention::PerWatt => "Wp".to_string(),
            PricingConvention::PerKw => "kW".to_string(),
        },
        category: category.to_string(),
        pricing_unit,
    }
}

/// Full rooftop catalog. Order matters: a second cable item and the per-kW
/// installation charge sit before the BOS items they must not displace.
pub fn solar_catalog_items() -> Vec<CatalogItem> {
    use PricingConvention::*;

    vec![
        item("MOD-630", "Solar Modules", "20", "0", "0", PerWatt),
        item("INV-15K", "Inverters", "150000", "0.10", "0.12", PerUnit),
        item("INV-10K", "Inverters", "110000", "0.10", "0.12", PerUnit),
        item("INST", "Installation", "5000", "0", "0.18", PerKw),
        item("STR-GI", "Mounting Structure", "110", "0.15", "0.18", PerUnit),
        item("CAB-4", "Cables", "85", "0", "0.18", PerUnit),
        item("CAB-6", "Cables", "120", "0", "0.18", PerUnit),
        item("MC4", "Connectors", "150", "0", "0.18", PerUnit),
        item("ACDB-1", "ACDB", "0.5", "0", "0.18", PerWatt),
        item("DCDB-1", "DCDB", "0.4", "0", "0.18", PerWatt),
        item("EARTH-1", "Earthing", "2500", "0", "0.18", PerUnit),
        item("LA-1", "Lightning Arrestor", "3500", "0", "0.18", PerUnit),
        item("NET-MTR", "Liaisoning", "1000", "0", "0", PerKw),
    ]
}

pub fn solar_catalog() -> Catalog {
    Catalog::new(solar_catalog_items()).expect("fixture catalog is valid")
}

/// Three plain items priced 100, 200 and 300 per unit.
pub fn simple_catalog() -> Catalog {
    use PricingConvention::PerUnit;

    Catalog::new(vec![
        item("A", "Other", "100", "0", "0", PerUnit),
        item("B", "Other", "200", "0", "0", PerUnit),
        item("C", "Other", "300", "0", "0", PerUnit),
    ])
    .expect("fixture catalog is valid")
}

pub fn system(capacity_kw: &str, module_wattage: &str) -> SystemConfiguration {
    SystemConfiguration {
        system_capacity_kw: dec(capacity_kw),
        module_wattage: dec(module_wattage),
        module_item_id: "MOD-630".to_string(),
        inverter_item_id: "INV-15K".to_string(),
        structure_item_id: "STR-GI".to_string(),
    }
}

pub fn service() -> QuotationService<InMemoryStore> {
    init_metrics();
    QuotationService::new(Arc::new(InMemoryStore::new()), "INR")
}
