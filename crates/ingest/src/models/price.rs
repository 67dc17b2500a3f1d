use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::units::UnitCode;

/// One normalized price observation produced by an adapter fetch.
///
/// Produced fresh per fetch and never mutated; ownership passes to the
/// persistence step as-is. `raw_data` preserves the opaque source payload
/// for auditing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaterialPrice {
    /// Source-scoped identifier of the record
    pub external_id: String,

    /// Item name as reported by the source
    pub name: String,

    /// Non-negative price
    pub price: Decimal,

    /// Unit of measure, from the closed code set
    pub unit: UnitCode,

    /// Currency code, "USD" unless the source says otherwise
    pub currency: String,

    /// Adapter-assigned trust weight in [0, 1]
    pub confidence_score: f64,

    /// Link back to the source record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    /// Canonical category, when the adapter could infer one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Open key/value map of source-specific attributes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specifications: Option<HashMap<String, Value>>,

    /// Opaque source payload, preserved for audit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<Value>,
}

impl MaterialPrice {
    /// Create a price record with the required fields; currency defaults
    /// to USD and confidence to 1.0.
    pub fn new(
        external_id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
        unit: UnitCode,
    ) -> Self {
        Self {
            external_id: external_id.into(),
            name: name.into(),
            price,
            unit,
            currency: "USD".to_string(),
            confidence_score: 1.0,
            source_url: None,
            category: None,
            specifications: None,
            raw_data: None,
        }
    }
}

/// Outcome of one bulk fetch.
///
/// Invariant: when `success` is true, `items_processed` equals the length
/// of `prices`; on failure `prices` is absent. Use the constructors to
/// keep the invariant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncResult {
    pub success: bool,
    pub items_processed: u32,
    pub items_failed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prices: Option<Vec<MaterialPrice>>,
}

impl SyncResult {
    /// A successful fetch. `items_processed` is derived from the list.
    pub fn ok(prices: Vec<MaterialPrice>, items_failed: u32) -> Self {
        Self {
            success: true,
            items_processed: prices.len() as u32,
            items_failed,
            error_message: None,
            prices: Some(prices),
        }
    }

    /// A failed fetch. No prices, counts zeroed.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            items_processed: 0,
            items_failed: 0,
            error_message: Some(message.into()),
            prices: None,
        }
    }
}
