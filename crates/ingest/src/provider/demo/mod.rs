//! Demo provider with synthetic pricing data.
//!
//! Used for development and end-to-end tests; produces plausible records
//! without touching the network.

use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;

use crate::models::{MaterialPrice, ProviderConfig, SyncResult, UnitCode};
use crate::provider::{mapped_category, PriceProvider, ProviderKind};

const DEMO_CATEGORIES: &[&str] = &["Steel", "Concrete", "Lumber", "Cement"];
const DEMO_UNITS: &[UnitCode] = &[UnitCode::Ea, UnitCode::Lf, UnitCode::Sf, UnitCode::Cy];

/// Cap on records per synthetic batch.
const MAX_BATCH: usize = 20;

pub struct DemoProvider {
    config: ProviderConfig,
}

impl DemoProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    fn generate_batch(&self, category: Option<&str>, limit: usize) -> Vec<MaterialPrice> {
        let mut rng = rand::thread_rng();
        let categories: Vec<&str> = match category {
            Some(c) => vec![c],
            None => DEMO_CATEGORIES.to_vec(),
        };

        (0..limit.min(MAX_BATCH))
            .map(|i| {
                let cat = categories[rng.gen_range(0..categories.len())];
                let external_id = format!("DEMO-{i:04}");
                // price in [25.00, 750.00), generated as cents
                let price = Decimal::new(rng.gen_range(2500..75000), 2);
                let mut price_record = MaterialPrice::new(
                    external_id.clone(),
                    format!("Demo {cat} Product {i}"),
                    price,
                    DEMO_UNITS[rng.gen_range(0..DEMO_UNITS.len())],
                );
                price_record.category = Some(cat.to_string());
                price_record.confidence_score = rng.gen_range(0.70..=1.00);
                price_record.source_url =
                    Some(format!("{}/materials/{external_id}", self.config.base_url));
                price_record
            })
            .collect()
    }
}

#[async_trait]
impl PriceProvider for DemoProvider {
    fn name(&self) -> &str {
        "demo"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Api
    }

    async fn fetch_prices(
        &self,
        category: Option<&str>,
        _search_query: Option<&str>,
        limit: usize,
    ) -> SyncResult {
        SyncResult::ok(self.generate_batch(category, limit), 0)
    }

    async fn fetch_single_price(&self, external_id: &str) -> Option<MaterialPrice> {
        let mut rng = rand::thread_rng();
        let mut price_record = MaterialPrice::new(
            external_id,
            format!("Demo Material {external_id}"),
            Decimal::new(rng.gen_range(5000..50000), 2),
            UnitCode::Ea,
        );
        price_record.confidence_score = 0.9;
        price_record.source_url =
            Some(format!("{}/materials/{external_id}", self.config.base_url));
        Some(price_record)
    }

    async fn validate_connection(&self) -> bool {
        true
    }

    fn map_to_canonical_category(&self, provider_category: &str) -> Option<String> {
        mapped_category(&self.config, provider_category)
    }
}
