//! Price provider trait definitions.
//!
//! This module defines the core `PriceProvider` trait that all pricing
//! sources implement, plus the shared HTTP client plumbing.

pub mod costdb;
pub mod demo;
pub(crate) mod http;
pub mod scraper;
pub mod shopsearch;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{MaterialPrice, SyncResult};

/// How a provider reaches its source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    /// Structured HTTP API
    Api,
    /// Browser-driven page scraping
    Scraper,
}

/// Trait for pricing sources.
///
/// Implement this trait to add support for a new source. Adapters are
/// selected at runtime through the
/// [`ProviderRegistry`](crate::registry::ProviderRegistry), never
/// hardcoded.
///
/// Failure semantics are deliberately lopsided: `fetch_prices` never
/// returns an error (failures become `SyncResult::failed`), and
/// `fetch_single_price` collapses not-found and error into `None`. The
/// distinction survives only in logs.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Provider name as registered ("demo", "costdb", ...).
    fn name(&self) -> &str;

    /// Whether this source is API-backed or scraper-backed.
    fn kind(&self) -> ProviderKind;

    /// Bulk fetch, bounded by `limit`.
    ///
    /// Must never fail; any internal error materializes as a
    /// `SyncResult` with `success == false` and a non-empty
    /// `error_message`.
    async fn fetch_prices(
        &self,
        category: Option<&str>,
        search_query: Option<&str>,
        limit: usize,
    ) -> SyncResult;

    /// Point lookup by source-scoped id. `None` on not-found and on any
    /// error condition alike.
    async fn fetch_single_price(&self, external_id: &str) -> Option<MaterialPrice>;

    /// Convenience search wrapper over `fetch_prices`.
    async fn search_materials(&self, query: &str, limit: usize) -> Vec<MaterialPrice> {
        self.fetch_prices(None, Some(query), limit)
            .await
            .prices
            .unwrap_or_default()
    }

    /// Lightweight reachability probe for provider health checks. Never
    /// used to gate a fetch.
    async fn validate_connection(&self) -> bool;

    /// Static lookup through the adapter's `category_mapping` config
    /// table, when one is configured.
    fn map_to_canonical_category(&self, provider_category: &str) -> Option<String> {
        let _ = provider_category;
        None
    }

    /// Trust weight for a raw source record: base 0.8, +0.1 when the
    /// source marks it verified, +0.1 when recently updated, capped at
    /// 1.0.
    fn calculate_confidence(&self, raw: &Value) -> f64 {
        let mut confidence: f64 = 0.8;
        if raw.get("verified").and_then(Value::as_bool) == Some(true) {
            confidence += 0.1;
        }
        if raw.get("recent_update").and_then(Value::as_bool) == Some(true) {
            confidence += 0.1;
        }
        confidence.min(1.0)
    }
}

/// `map_to_canonical_category` for adapters holding a [`ProviderConfig`]:
/// reads the `category_mapping` object from the config map.
pub(crate) fn mapped_category(
    config: &crate::models::ProviderConfig,
    provider_category: &str,
) -> Option<String> {
    config
        .config_object("category_mapping")?
        .get(provider_category)
        .and_then(Value::as_str)
        .map(str::to_string)
}
