//! In-memory repository implementations shared by service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::errors::Result;
use crate::materials::{Material, MaterialRepositoryTrait, MaterialVariant};
use crate::price_history::{PriceHistoryRecord, PriceHistoryRepositoryTrait};
use crate::sync::{DataProvider, PriceSource, ProviderRepositoryTrait, SyncJob, SyncRepositoryTrait};

/// Bare material with the given string as both id and name.
pub(crate) fn material_named(name: &str) -> Material {
    Material {
        id: name.to_string(),
        name: name.to_string(),
        category: None,
        price: None,
        unit: None,
        supplier: None,
        availability: None,
        lead_time_days: None,
        minimum_order: None,
    }
}

/// Active demo-adapter provider row.
pub(crate) fn demo_provider_row(id: &str) -> DataProvider {
    DataProvider {
        id: id.to_string(),
        name: "demo".to_string(),
        provider_type: "api".to_string(),
        base_url: "https://demo.example.com".to_string(),
        api_key_encrypted: None,
        config: HashMap::new(),
        is_active: true,
        rate_limit_requests: 100,
        rate_limit_period: 3600,
        sync_interval_hours: 24,
        last_sync_at: None,
    }
}

#[derive(Default)]
pub(crate) struct InMemoryMaterialRepository {
    materials: Mutex<Vec<Material>>,
    variants: Mutex<Vec<MaterialVariant>>,
}

impl InMemoryMaterialRepository {
    pub(crate) fn insert(&self, material: Material) {
        self.materials.lock().unwrap().push(material);
    }

    pub(crate) fn insert_variant(&self, variant: MaterialVariant) {
        self.variants.lock().unwrap().push(variant);
    }
}

#[async_trait]
impl MaterialRepositoryTrait for InMemoryMaterialRepository {
    async fn get_by_id(&self, material_id: &str) -> Result<Option<Material>> {
        Ok(self
            .materials
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == material_id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Material>> {
        Ok(self
            .materials
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.name == name)
            .cloned())
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Material>> {
        Ok(self
            .materials
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.category.as_deref() == Some(category))
            .cloned()
            .collect())
    }

    async fn list_priced(&self) -> Result<Vec<Material>> {
        Ok(self
            .materials
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.price.is_some())
            .cloned()
            .collect())
    }

    async fn variant_for_material(&self, material_id: &str) -> Result<Option<MaterialVariant>> {
        Ok(self
            .variants
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.material_id == material_id)
            .cloned())
    }

    async fn variants_for_canonical(&self, canonical_id: &str) -> Result<Vec<MaterialVariant>> {
        Ok(self
            .variants
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.canonical_material_id == canonical_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryProviderRepository {
    providers: Mutex<Vec<DataProvider>>,
}

impl InMemoryProviderRepository {
    pub(crate) fn insert(&self, provider: DataProvider) {
        self.providers.lock().unwrap().push(provider);
    }
}

#[async_trait]
impl ProviderRepositoryTrait for InMemoryProviderRepository {
    async fn get(&self, provider_id: &str) -> Result<Option<DataProvider>> {
        Ok(self
            .providers
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == provider_id)
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<DataProvider>> {
        Ok(self
            .providers
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.is_active)
            .cloned()
            .collect())
    }

    async fn set_last_sync(&self, provider_id: &str, at: DateTime<Utc>) -> Result<()> {
        if let Some(provider) = self
            .providers
            .lock()
            .unwrap()
            .iter_mut()
            .find(|p| p.id == provider_id)
        {
            provider.last_sync_at = Some(at);
        }
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct InMemorySyncRepository {
    jobs: Mutex<Vec<SyncJob>>,
    sources: Mutex<Vec<PriceSource>>,
}

impl InMemorySyncRepository {
    pub(crate) fn jobs(&self) -> Vec<SyncJob> {
        self.jobs.lock().unwrap().clone()
    }

    pub(crate) fn price_sources(&self) -> Vec<PriceSource> {
        self.sources.lock().unwrap().clone()
    }

    /// Shift every stored row into the past, for expiry tests.
    pub(crate) fn backdate_all(&self, by: Duration) {
        for row in self.sources.lock().unwrap().iter_mut() {
            row.fetched_at -= by;
            row.expires_at -= by;
        }
    }
}

#[async_trait]
impl SyncRepositoryTrait for InMemorySyncRepository {
    async fn create_job(&self, job: &SyncJob) -> Result<()> {
        self.jobs.lock().unwrap().push(job.clone());
        Ok(())
    }

    async fn update_job(&self, job: &SyncJob) -> Result<()> {
        let mut jobs = self.jobs.lock().unwrap();
        if let Some(stored) = jobs.iter_mut().find(|j| j.id == job.id) {
            *stored = job.clone();
        }
        Ok(())
    }

    async fn insert_price_sources(&self, rows: &[PriceSource]) -> Result<()> {
        self.sources.lock().unwrap().extend_from_slice(rows);
        Ok(())
    }

    async fn list_expired_valid(&self, now: DateTime<Utc>) -> Result<Vec<PriceSource>> {
        Ok(self
            .sources
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.is_valid && row.expires_at < now)
            .cloned()
            .collect())
    }

    async fn invalidate(&self, ids: &[String]) -> Result<usize> {
        let mut flipped = 0;
        for row in self.sources.lock().unwrap().iter_mut() {
            if row.is_valid && ids.contains(&row.id) {
                row.is_valid = false;
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}

#[derive(Default)]
pub(crate) struct InMemoryPriceHistory {
    records: Mutex<Vec<PriceHistoryRecord>>,
}

impl InMemoryPriceHistory {
    pub(crate) fn seed(&self, record: PriceHistoryRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub(crate) fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl PriceHistoryRepositoryTrait for InMemoryPriceHistory {
    async fn append(&self, record: &PriceHistoryRecord) -> Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn latest(&self, material_id: &str) -> Result<Option<PriceHistoryRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.material_id == material_id)
            .max_by_key(|r| r.recorded_at)
            .cloned())
    }

    async fn in_window(
        &self,
        material_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<PriceHistoryRecord>> {
        let mut records: Vec<PriceHistoryRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.material_id == material_id && r.recorded_at >= since)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.recorded_at);
        Ok(records)
    }
}
