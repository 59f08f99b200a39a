//! Catalog item model for quotation-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::QuotationError;

/// Unit basis against which an item's quantity is interpreted.
///
/// The wire names are fixed: per-watt and per-kW items have always been
/// stored as `RS_PER_WATT` / `RS_PER_KW`, and the short forms are accepted
/// on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PricingConvention {
    #[default]
    #[serde(rename = "PER_UNIT")]
    PerUnit,
    #[serde(rename = "RS_PER_WATT", alias = "PER_WATT")]
    PerWatt,
    #[serde(rename = "RS_PER_KW", alias = "PER_KW")]
    PerKw,
}

impl PricingConvention {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingConvention::PerUnit => "PER_UNIT",
            PricingConvention::PerWatt => "RS_PER_WATT",
            PricingConvention::PerKw => "RS_PER_KW",
        }
    }
}

impl std::fmt::Display for PricingConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category tag derived from an item's free-text category label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    SolarModules,
    Inverters,
    MountingStructure,
    Acdb,
    Dcdb,
    Earthing,
    LightningArrestor,
    Cables,
    Connectors,
    Other,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::SolarModules => "Solar Modules",
            ItemCategory::Inverters => "Inverters",
            ItemCategory::MountingStructure => "Mounting Structure",
            ItemCategory::Acdb => "ACDB",
            ItemCategory::Dcdb => "DCDB",
            ItemCategory::Earthing => "Earthing",
            ItemCategory::LightningArrestor => "Lightning Arrestor",
            ItemCategory::Cables => "Cables",
            ItemCategory::Connectors => "Connectors",
            ItemCategory::Other => "Other",
        }
    }

    /// Parse a catalog label. Matching ignores case and surrounding whitespace;
    /// unknown labels map to `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "solar modules" | "solar module" | "modules" => ItemCategory::SolarModules,
            "inverters" | "inverter" => ItemCategory::Inverters,
            "mounting structure" | "structure" => ItemCategory::MountingStructure,
            "acdb" => ItemCategory::Acdb,
            "dcdb" => ItemCategory::Dcdb,
            "earthing" => ItemCategory::Earthing,
            "lightning arrestor" | "lightning arrester" => ItemCategory::LightningArrestor,
            "cables" | "cable" => ItemCategory::Cables,
            "connectors" | "connector" => ItemCategory::Connectors,
            _ => ItemCategory::Other,
        }
    }
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A sellable catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub item_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub unit_price: Decimal,
    #[serde(default)]
    pub tax_rate: Decimal,
    #[serde(default)]
    pub margin_rate: Decimal,
    pub unit: String,
    pub category: String,
    #[serde(default)]
    pub pricing_unit: PricingConvention,
}

impl CatalogItem {
    /// Category tag used by BOM generation. The label itself is display only.
    pub fn category_tag(&self) -> ItemCategory {
        ItemCategory::from_label(&self.category)
    }

    /// Check the non-negativity invariant on price, tax and margin.
    pub fn validate(&self) -> Result<(), QuotationError> {
        let checks = [
            ("unit_price", self.unit_price),
            ("tax_rate", self.tax_rate),
            ("margin_rate", self.margin_rate),
        ];

        for (field, value) in checks {
            if value < Decimal::ZERO {
                return Err(QuotationError::InvalidCatalogItem {
                    item_id: self.item_id.clone(),
                    reason: format!("{} must not be negative (got {})", field, value),
                });
            }
        }

        Ok(())
    }
}

/// Immutable catalog snapshot handed to the engine for one request.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    by_id: HashMap<String, usize>,
    by_category: HashMap<ItemCategory, usize>,
}

impl Catalog {
    /// Build a snapshot, validating every item. The category index keeps the
    /// first item of each tag in catalog order; a repeated id keeps its first
    /// occurrence.
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, QuotationError> {
        let mut by_id = HashMap::with_capacity(items.len());
        let mut by_category = HashMap::new();

        for (idx, item) in items.iter().enumerate() {
            item.validate()?;
            by_id.entry(item.item_id.clone()).or_insert(idx);
            by_category.entry(item.category_tag()).or_insert(idx);
        }

        Ok(Self {
            items,
            by_id,
            by_category,
        })
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, item_id: &str) -> Option<&CatalogItem> {
        self.by_id.get(item_id).map(|&idx| &self.items[idx])
    }

    /// First item in catalog order carrying the given category tag.
    pub fn first_in(&self, category: ItemCategory) -> Option<&CatalogItem> {
        self.by_category.get(&category).map(|&idx| &self.items[idx])
    }
}
