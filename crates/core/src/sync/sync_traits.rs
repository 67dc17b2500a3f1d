use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{DataProvider, PriceSource, SyncJob};
use crate::errors::Result;

/// Access to configured data providers.
#[async_trait]
pub trait ProviderRepositoryTrait: Send + Sync {
    async fn get(&self, provider_id: &str) -> Result<Option<DataProvider>>;

    async fn list_active(&self) -> Result<Vec<DataProvider>>;

    /// Record a successful sync time.
    async fn set_last_sync(&self, provider_id: &str, at: DateTime<Utc>) -> Result<()>;
}

/// Persistence for sync jobs and price-source provenance rows.
#[async_trait]
pub trait SyncRepositoryTrait: Send + Sync {
    async fn create_job(&self, job: &SyncJob) -> Result<()>;

    async fn update_job(&self, job: &SyncJob) -> Result<()>;

    async fn insert_price_sources(&self, rows: &[PriceSource]) -> Result<()>;

    /// Valid rows whose `expires_at` has passed.
    async fn list_expired_valid(&self, now: DateTime<Utc>) -> Result<Vec<PriceSource>>;

    /// Soft-invalidate the given rows; returns how many flipped.
    async fn invalidate(&self, ids: &[String]) -> Result<usize>;
}
