use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::materials::{Material, MaterialVariant, SupplierRef};

/// One supplier's offer inside a comparison, ordered by price.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub material_id: String,
    pub supplier: Option<SupplierRef>,
    pub price: Option<Decimal>,
    pub unit: Option<String>,
    pub lead_time_days: Option<i32>,
    pub availability: Option<String>,
    pub minimum_order: Option<Decimal>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl From<&Material> for ComparisonEntry {
    fn from(material: &Material) -> Self {
        Self {
            material_id: material.id.clone(),
            supplier: material.supplier.clone(),
            price: material.price,
            unit: material.unit.clone(),
            lead_time_days: material.lead_time_days,
            availability: material.availability.clone(),
            minimum_order: material.minimum_order,
            last_updated: None,
        }
    }
}

impl From<&MaterialVariant> for ComparisonEntry {
    fn from(variant: &MaterialVariant) -> Self {
        Self {
            material_id: variant.material_id.clone(),
            supplier: variant.supplier.clone(),
            price: variant.price,
            unit: variant.unit.clone(),
            lead_time_days: variant.lead_time_days,
            availability: variant.availability.clone(),
            minimum_order: variant.minimum_order,
            last_updated: variant.last_updated,
        }
    }
}

/// Min/max/avg over the concrete prices in a comparison. All `None`
/// when no entry carries a price.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub avg: Option<Decimal>,
}

/// The scored pick of a comparison.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BestValue {
    pub material_id: String,
    pub score: f64,
    /// Human-readable justification, e.g. "Lowest price, Available now".
    pub reasons: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaterialComparison {
    pub material_id: String,
    pub name: String,
    pub entries: Vec<ComparisonEntry>,
    pub price_range: PriceRange,
    pub best_value: Option<BestValue>,
}

/// Price spread across a canonical material's variants.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VariantStatistics {
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub avg_price: Decimal,
    pub variant_count: usize,
}
