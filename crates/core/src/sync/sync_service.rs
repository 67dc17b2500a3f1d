use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use pricedock_ingest::{MaterialPrice, ProviderRegistry};

use super::{
    DataProvider, PriceSource, ProviderRepositoryTrait, SyncJob, SyncJobType, SyncOutcome,
    SyncRepositoryTrait, SyncReport,
};
use crate::errors::{Error, Result};
use crate::materials::MaterialRepositoryTrait;

/// Records requested per provider fetch.
pub const FETCH_LIMIT: usize = 100;

/// Fetched prices are considered fresh for this long.
pub const PRICE_TTL_HOURS: i64 = 24;

/// Orchestrates provider syncs: runs fetches through registry-resolved
/// adapters, matches records to the catalog, and persists provenance
/// rows. Retry and scheduling belong to the caller.
pub struct SyncService {
    registry: Arc<ProviderRegistry>,
    providers: Arc<dyn ProviderRepositoryTrait>,
    sync_repository: Arc<dyn SyncRepositoryTrait>,
    materials: Arc<dyn MaterialRepositoryTrait>,
}

impl SyncService {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        providers: Arc<dyn ProviderRepositoryTrait>,
        sync_repository: Arc<dyn SyncRepositoryTrait>,
        materials: Arc<dyn MaterialRepositoryTrait>,
    ) -> Self {
        Self {
            registry,
            providers,
            sync_repository,
            materials,
        }
    }

    /// Run one sync against one provider.
    ///
    /// Configuration problems (unknown/inactive provider, no adapter
    /// factory registered under the provider's name) fail fast; fetch
    /// failures are recorded on the job row before the error surfaces.
    pub async fn sync_provider(
        &self,
        provider_id: &str,
        job_type: SyncJobType,
    ) -> Result<SyncReport> {
        let provider = self
            .providers
            .get(provider_id)
            .await?
            .ok_or_else(|| Error::Config(format!("unknown provider '{provider_id}'")))?;
        if !provider.is_active {
            return Err(Error::Config(format!(
                "provider '{}' is not active",
                provider.name
            )));
        }

        let mut job = SyncJob::start(provider_id, job_type);
        self.sync_repository.create_job(&job).await?;

        let adapter = match self.registry.get(&provider.name, provider.provider_config()) {
            Some(adapter) => adapter,
            None => {
                let message = format!("no adapter registered for '{}'", provider.name);
                self.mark_failed(&mut job, &message).await;
                return Err(Error::Config(message));
            }
        };

        info!("sync {:?} started for provider '{}'", job_type, provider.name);
        let result = adapter.fetch_prices(None, None, FETCH_LIMIT).await;
        if !result.success {
            let message = result
                .error_message
                .unwrap_or_else(|| "fetch failed".to_string());
            self.mark_failed(&mut job, &message).await;
            return Err(Error::Sync {
                provider: provider.name,
                message,
            });
        }

        let prices = result.prices.unwrap_or_default();
        let (rows, unmatched) = match self.match_to_catalog(&provider, &prices).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.mark_failed(&mut job, &e.to_string()).await;
                return Err(e);
            }
        };
        if let Err(e) = self.sync_repository.insert_price_sources(&rows).await {
            self.mark_failed(&mut job, &e.to_string()).await;
            return Err(e);
        }

        job.complete(result.items_processed, result.items_failed, unmatched);
        self.sync_repository.update_job(&job).await?;
        self.providers.set_last_sync(provider_id, Utc::now()).await?;
        info!(
            "sync completed for '{}': {} processed, {} failed, {unmatched} unmatched",
            provider.name, job.items_processed, job.items_failed
        );

        Ok(SyncReport {
            job_id: job.id,
            provider_id: provider_id.to_string(),
            items_processed: job.items_processed,
            items_failed: job.items_failed,
            items_unmatched: unmatched,
        })
    }

    /// Incremental pass over every active provider flagged
    /// `supports_volatile`. Providers fail independently.
    pub async fn sync_volatile(&self) -> Result<Vec<SyncOutcome>> {
        let providers = self.providers.list_active().await?;
        let volatile = providers.into_iter().filter(DataProvider::supports_volatile);
        self.run_batch(volatile, SyncJobType::Incremental).await
    }

    /// Full pass over every active provider whose sync interval has
    /// elapsed. Never-synced providers are always included.
    pub async fn sync_full_catalog(&self) -> Result<Vec<SyncOutcome>> {
        let now = Utc::now();
        let providers = self.providers.list_active().await?;
        let stale = providers.into_iter().filter(move |p| p.is_stale(now));
        self.run_batch(stale, SyncJobType::Full).await
    }

    /// Soft-invalidate every valid price source past its expiry.
    /// Returns how many rows flipped.
    pub async fn sweep_expired(&self) -> Result<usize> {
        let now = Utc::now();
        let expired = self.sync_repository.list_expired_valid(now).await?;
        if expired.is_empty() {
            return Ok(0);
        }
        let ids: Vec<String> = expired.into_iter().map(|row| row.id).collect();
        let flipped = self.sync_repository.invalidate(&ids).await?;
        info!("expired {flipped} price sources");
        Ok(flipped)
    }

    async fn run_batch(
        &self,
        providers: impl Iterator<Item = DataProvider>,
        job_type: SyncJobType,
    ) -> Result<Vec<SyncOutcome>> {
        let mut outcomes = Vec::new();
        for provider in providers {
            match self.sync_provider(&provider.id, job_type).await {
                Ok(report) => outcomes.push(SyncOutcome::Completed(report)),
                Err(e) => {
                    warn!("sync failed for provider '{}': {e}", provider.name);
                    outcomes.push(SyncOutcome::Failed {
                        provider_id: provider.id,
                        error: e.to_string(),
                    });
                }
            }
        }
        Ok(outcomes)
    }

    /// Match fetched records to catalog materials by exact name.
    /// Misses count as unmatched, not as failures.
    async fn match_to_catalog(
        &self,
        provider: &DataProvider,
        prices: &[MaterialPrice],
    ) -> Result<(Vec<PriceSource>, u32)> {
        let now = Utc::now();
        let mut rows = Vec::new();
        let mut unmatched = 0u32;
        for price in prices {
            match self.materials.find_by_name(&price.name).await? {
                Some(material) => rows.push(PriceSource::from_fetch(
                    &material.id,
                    &provider.id,
                    price,
                    now,
                    PRICE_TTL_HOURS,
                )),
                None => {
                    debug!(
                        "no catalog match for '{}' from provider '{}'",
                        price.name, provider.name
                    );
                    unmatched += 1;
                }
            }
        }
        Ok((rows, unmatched))
    }

    async fn mark_failed(&self, job: &mut SyncJob, message: &str) {
        job.fail(message);
        if let Err(e) = self.sync_repository.update_job(job).await {
            warn!("failed to persist failed job '{}': {e}", job.id);
        }
    }
}
