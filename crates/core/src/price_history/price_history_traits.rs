use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::PriceHistoryRecord;
use crate::errors::Result;

/// Append-only storage for price observations.
#[async_trait]
pub trait PriceHistoryRepositoryTrait: Send + Sync {
    async fn append(&self, record: &PriceHistoryRecord) -> Result<()>;

    /// Most recent record for a material, across all time.
    async fn latest(&self, material_id: &str) -> Result<Option<PriceHistoryRecord>>;

    /// Records at or after `since`, ascending by `recorded_at`.
    async fn in_window(
        &self,
        material_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<PriceHistoryRecord>>;
}
