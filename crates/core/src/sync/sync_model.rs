use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use pricedock_ingest::{MaterialPrice, ProviderConfig};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncJobType {
    Full,
    Incremental,
    Single,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncJobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// One sync run against one provider. Transitions once from Running to
/// a terminal status.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncJob {
    pub id: String,
    pub provider_id: String,
    pub job_type: SyncJobType,
    pub status: SyncJobStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub items_processed: u32,
    pub items_failed: u32,
    /// Fetched records with no exact-name catalog match. Not failures;
    /// tracked so silent mismatch drift is visible.
    pub items_unmatched: u32,
    pub error_message: Option<String>,
}

impl SyncJob {
    pub fn start(provider_id: impl Into<String>, job_type: SyncJobType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            provider_id: provider_id.into(),
            job_type,
            status: SyncJobStatus::Running,
            started_at: Some(Utc::now()),
            completed_at: None,
            items_processed: 0,
            items_failed: 0,
            items_unmatched: 0,
            error_message: None,
        }
    }

    pub fn complete(&mut self, processed: u32, failed: u32, unmatched: u32) {
        self.status = SyncJobStatus::Completed;
        self.completed_at = Some(Utc::now());
        self.items_processed = processed;
        self.items_failed = failed;
        self.items_unmatched = unmatched;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = SyncJobStatus::Failed;
        self.completed_at = Some(Utc::now());
        self.error_message = Some(message.into());
    }
}

/// Provenance-tagged price observation persisted per (material,
/// provider) fetch. Rows are never deleted; expiry flips `is_valid`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceSource {
    pub id: String,
    pub material_id: String,
    pub provider_id: String,
    pub external_id: String,
    pub price: Decimal,
    pub unit: String,
    pub currency: String,
    pub confidence_score: f64,
    pub source_url: Option<String>,
    pub raw_data: Option<Value>,
    pub fetched_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_valid: bool,
}

impl PriceSource {
    /// Build a row from one fetched record, valid for `ttl_hours` from
    /// `fetched_at`.
    pub fn from_fetch(
        material_id: impl Into<String>,
        provider_id: impl Into<String>,
        price: &MaterialPrice,
        fetched_at: DateTime<Utc>,
        ttl_hours: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            material_id: material_id.into(),
            provider_id: provider_id.into(),
            external_id: price.external_id.clone(),
            price: price.price,
            unit: price.unit.as_str().to_string(),
            currency: price.currency.clone(),
            confidence_score: price.confidence_score,
            source_url: price.source_url.clone(),
            raw_data: price.raw_data.clone(),
            fetched_at,
            expires_at: fetched_at + Duration::hours(ttl_hours),
            is_valid: true,
        }
    }
}

/// Configured data source. The API key is stored encrypted; the storage
/// layer hands it back usable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataProvider {
    pub id: String,
    pub name: String,
    /// "api" or "scraper"
    pub provider_type: String,
    pub base_url: String,
    pub api_key_encrypted: Option<String>,
    pub config: HashMap<String, Value>,
    pub is_active: bool,
    pub rate_limit_requests: u32,
    pub rate_limit_period: u32,
    pub sync_interval_hours: i64,
    /// Updated only when a sync completes.
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl DataProvider {
    /// Adapter configuration for this provider's registry factory.
    pub fn provider_config(&self) -> ProviderConfig {
        let mut config = ProviderConfig::new(self.name.clone(), self.base_url.clone());
        config.api_key = self.api_key_encrypted.clone();
        config.config = self.config.clone();
        config.rate_limit_requests = self.rate_limit_requests;
        config.rate_limit_period = self.rate_limit_period;
        config
    }

    /// Providers flagged for frequent re-sync of volatile prices.
    pub fn supports_volatile(&self) -> bool {
        self.config
            .get("supports_volatile")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Due for a full sync. Never-synced providers are always due.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match self.last_sync_at {
            Some(last) => (now - last) >= Duration::hours(self.sync_interval_hours),
            None => true,
        }
    }
}

/// Counts from one completed sync run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncReport {
    pub job_id: String,
    pub provider_id: String,
    pub items_processed: u32,
    pub items_failed: u32,
    pub items_unmatched: u32,
}

/// Per-provider result of a batch sync pass. Failures are collected,
/// never short-circuited.
#[derive(Clone, Debug, Serialize)]
pub enum SyncOutcome {
    Completed(SyncReport),
    Failed { provider_id: String, error: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricedock_ingest::UnitCode;
    use rust_decimal_macros::dec;

    #[test]
    fn test_job_lifecycle() {
        let mut job = SyncJob::start("prov-1", SyncJobType::Full);
        assert_eq!(job.status, SyncJobStatus::Running);
        assert!(job.started_at.is_some());
        assert!(job.completed_at.is_none());

        job.complete(20, 1, 3);
        assert_eq!(job.status, SyncJobStatus::Completed);
        assert_eq!(job.items_unmatched, 3);
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn test_job_failure_records_message() {
        let mut job = SyncJob::start("prov-1", SyncJobType::Incremental);
        job.fail("API error: 503");
        assert_eq!(job.status, SyncJobStatus::Failed);
        assert_eq!(job.error_message.as_deref(), Some("API error: 503"));
    }

    #[test]
    fn test_price_source_expiry_window() {
        let fetched = MaterialPrice::new("X-1", "Rebar", dec!(11.80), UnitCode::Ea);
        let now = Utc::now();
        let row = PriceSource::from_fetch("mat-1", "prov-1", &fetched, now, 24);
        assert_eq!(row.expires_at - row.fetched_at, Duration::hours(24));
        assert!(row.is_valid);
        assert_eq!(row.unit, "EA");
    }

    #[test]
    fn test_staleness() {
        let mut provider = DataProvider {
            id: "p".into(),
            name: "demo".into(),
            provider_type: "api".into(),
            base_url: String::new(),
            api_key_encrypted: None,
            config: HashMap::new(),
            is_active: true,
            rate_limit_requests: 100,
            rate_limit_period: 3600,
            sync_interval_hours: 24,
            last_sync_at: None,
        };
        let now = Utc::now();
        assert!(provider.is_stale(now), "never-synced is always stale");

        provider.last_sync_at = Some(now - Duration::hours(2));
        assert!(!provider.is_stale(now));

        provider.last_sync_at = Some(now - Duration::hours(24));
        assert!(provider.is_stale(now), "boundary counts as stale");
    }
}
