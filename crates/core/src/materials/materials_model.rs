use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Minimal supplier snapshot carried on materials and variants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRef {
    pub id: String,
    pub name: String,
}

/// Catalog material as the pricing services see it. Owned by the
/// catalog subsystem; this crate only reads it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub unit: Option<String>,
    pub supplier: Option<SupplierRef>,
    /// Free-form availability tag ("in_stock", "limited_stock", ...).
    pub availability: Option<String>,
    pub lead_time_days: Option<i32>,
    pub minimum_order: Option<Decimal>,
}

/// A canonical material groups equivalent supplier-specific variants.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CanonicalMaterial {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
}

/// One supplier's offering of a canonical material.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaterialVariant {
    pub id: String,
    pub canonical_material_id: String,
    pub material_id: String,
    pub supplier: Option<SupplierRef>,
    pub price: Option<Decimal>,
    pub unit: Option<String>,
    pub lead_time_days: Option<i32>,
    pub availability: Option<String>,
    pub minimum_order: Option<Decimal>,
    pub last_updated: Option<DateTime<Utc>>,
}
