//! Sync module - provider sync orchestration and provenance storage.

mod sync_model;
mod sync_service;
mod sync_traits;

pub use sync_model::{
    DataProvider, PriceSource, SyncJob, SyncJobStatus, SyncJobType, SyncOutcome, SyncReport,
};
pub use sync_service::{SyncService, FETCH_LIMIT, PRICE_TTL_HOURS};
pub use sync_traits::{ProviderRepositoryTrait, SyncRepositoryTrait};
