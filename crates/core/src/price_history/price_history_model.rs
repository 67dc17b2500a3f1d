use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One observed price point for a material. Append-only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceHistoryRecord {
    pub id: String,
    pub material_id: String,
    pub price: Decimal,
    pub recorded_at: DateTime<Utc>,
    /// Where the observation came from ("sync", "manual", a provider
    /// name, ...).
    pub source: String,
}

impl PriceHistoryRecord {
    pub fn new(material_id: impl Into<String>, price: Decimal, source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            material_id: material_id.into(),
            price,
            recorded_at: Utc::now(),
            source: source.into(),
        }
    }
}

/// Windowed price statistics for a material. Zero-shaped when the
/// window holds no records.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PriceStatistics {
    pub min: Decimal,
    pub max: Decimal,
    pub avg: Decimal,
    pub count: usize,
    /// Latest recorded price overall, regardless of window.
    pub current: Option<Decimal>,
    /// Absolute change from the oldest in-window record to the latest.
    pub change: Decimal,
    pub percent_change: Decimal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTrend {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}
