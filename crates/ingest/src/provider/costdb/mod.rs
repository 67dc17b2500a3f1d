//! Cost-database API provider for construction cost data.
//!
//! The cost database publishes material, labor, and equipment costs
//! indexed by CSI-style divisions and geographic region. Config keys:
//! - `region_code`: pricing region (default "US-NATL")
//! - `data_year`: cost-data year (default "2024")

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::HeaderValue;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::str::FromStr;

use crate::errors::IngestError;
use crate::models::{MaterialPrice, ProviderConfig, SyncResult, UnitCode};
use crate::normalize::{category_to_division, division_to_category, infer_unit, parse_price};
use crate::provider::{http, mapped_category, PriceProvider, ProviderKind};

const DEFAULT_BASE_URL: &str = "https://api.costdb.io/v1";

/// Fixed confidence for cost-database records; the source is curated.
const CONFIDENCE: f64 = 0.95;

pub struct CostDbProvider {
    client: Client,
    config: ProviderConfig,
    region_code: String,
    data_year: String,
}

impl CostDbProvider {
    pub fn new(mut config: ProviderConfig) -> Self {
        if config.base_url.is_empty() {
            config.base_url = DEFAULT_BASE_URL.to_string();
        }
        let region_code = config
            .config_str("region_code")
            .unwrap_or("US-NATL")
            .to_string();
        let data_year = config.config_str("data_year").unwrap_or("2024").to_string();
        let client = http::build_client(&config);

        Self {
            client,
            config,
            region_code,
            data_year,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Cost-database requests carry the key both as bearer auth (set on
    /// the shared client) and as `X-API-Key`.
    fn api_key_header(&self) -> Option<HeaderValue> {
        self.config
            .api_key
            .as_deref()
            .and_then(|key| HeaderValue::from_str(key).ok())
    }

    /// Parse a bulk response body into price records. Items that fail to
    /// parse are skipped and counted.
    fn parse_response(&self, data: &Value) -> (Vec<MaterialPrice>, u32) {
        let items = data
            .get("items")
            .or_else(|| data.get("data"))
            .and_then(Value::as_array);

        let mut prices = Vec::new();
        let mut failed = 0u32;
        for item in items.into_iter().flatten() {
            match self.parse_item(item) {
                Some(price) => prices.push(price),
                None => failed += 1,
            }
        }
        (prices, failed)
    }

    fn parse_item(&self, item: &Value) -> Option<MaterialPrice> {
        let external_id = string_field(item, &["id", "code"])?;
        let name = string_field(item, &["description", "name"])?;
        let price = decimal_field(item, &["unit_cost", "material_cost"])?;
        let unit = item
            .get("unit")
            .and_then(Value::as_str)
            .map(|u| UnitCode::from_code(u).unwrap_or_else(|| infer_unit(u)))
            .unwrap_or(UnitCode::Ea);
        let division = item.get("division").and_then(Value::as_str).unwrap_or("");

        let mut specifications: HashMap<String, Value> = HashMap::new();
        for key in [
            "division",
            "subdivision",
            "labor_cost",
            "equipment_cost",
            "total_cost",
            "crew",
            "daily_output",
        ] {
            if let Some(value) = item.get(key) {
                specifications.insert(key.to_string(), value.clone());
            }
        }
        specifications.insert("region".to_string(), json!(self.region_code));

        let mut record = MaterialPrice::new(external_id.clone(), name, price, unit);
        record.confidence_score = CONFIDENCE;
        record.source_url = Some(self.url(&format!("/costs/{external_id}")));
        record.category = Some(division_to_category(division).to_string());
        record.specifications = Some(specifications);
        record.raw_data = Some(item.clone());
        Some(record)
    }
}

fn string_field(item: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match item.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => continue,
        }
    }
    None
}

fn decimal_field(item: &Value, keys: &[&str]) -> Option<Decimal> {
    for key in keys {
        match item.get(key) {
            Some(Value::Number(n)) => return Decimal::from_str(&n.to_string()).ok(),
            Some(Value::String(s)) => return Some(parse_price(s)),
            _ => continue,
        }
    }
    None
}

#[async_trait]
impl PriceProvider for CostDbProvider {
    fn name(&self) -> &str {
        "costdb"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Api
    }

    async fn fetch_prices(
        &self,
        category: Option<&str>,
        search_query: Option<&str>,
        limit: usize,
    ) -> SyncResult {
        let mut params: Vec<(&str, String)> = vec![
            ("limit", limit.min(100).to_string()),
            ("region", self.region_code.clone()),
            ("year", self.data_year.clone()),
        ];
        if let Some(category) = category {
            params.push(("division", category_to_division(category).to_string()));
        }
        if let Some(query) = search_query {
            params.push(("search", query.to_string()));
        }

        let mut request = self.client.get(self.url("/costs/materials")).query(&params);
        if let Some(key) = self.api_key_header() {
            request = request.header("X-API-Key", key);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("costdb fetch failed: {e}");
                return SyncResult::failed(e.to_string());
            }
        };

        if response.status().as_u16() == 401 {
            let error = IngestError::InvalidApiKey {
                provider: self.name().to_string(),
            };
            return SyncResult::failed(error.to_string());
        }
        if !response.status().is_success() {
            let error = IngestError::ApiStatus {
                provider: self.name().to_string(),
                status: response.status().as_u16(),
            };
            return SyncResult::failed(error.to_string());
        }

        let data: Value = match response.json().await {
            Ok(data) => data,
            Err(e) => return SyncResult::failed(e.to_string()),
        };

        let (prices, failed) = self.parse_response(&data);
        debug!("costdb returned {} records ({failed} skipped)", prices.len());
        SyncResult::ok(prices, failed)
    }

    async fn fetch_single_price(&self, external_id: &str) -> Option<MaterialPrice> {
        let params = [
            ("region", self.region_code.as_str()),
            ("year", self.data_year.as_str()),
        ];
        let mut request = self
            .client
            .get(self.url(&format!("/costs/materials/{external_id}")))
            .query(&params);
        if let Some(key) = self.api_key_header() {
            request = request.header("X-API-Key", key);
        }

        let response = match request.send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!(
                    "costdb single lookup for '{external_id}' returned {}",
                    response.status()
                );
                return None;
            }
            Err(e) => {
                debug!("costdb single lookup for '{external_id}' failed: {e}");
                return None;
            }
        };

        let item: Value = response.json().await.ok()?;
        self.parse_item(&item)
    }

    async fn validate_connection(&self) -> bool {
        match self.client.get(self.url("/status")).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn map_to_canonical_category(&self, provider_category: &str) -> Option<String> {
        mapped_category(&self.config, provider_category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn provider() -> CostDbProvider {
        let mut config = ProviderConfig::new("costdb", "");
        config.api_key = Some("test_key".to_string());
        CostDbProvider::new(config)
    }

    #[test]
    fn test_default_base_url_applied() {
        assert_eq!(provider().config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_parse_response_maps_divisions() {
        let data = json!({
            "items": [
                {
                    "id": "031100-0200",
                    "description": "Structural concrete forms, walls",
                    "unit_cost": 4.85,
                    "unit": "SF",
                    "division": "03",
                    "labor_cost": 2.10,
                    "crew": "C-1"
                },
                {
                    "code": "220523",
                    "name": "Ball valve, bronze, 1 in",
                    "material_cost": 38.0,
                    "unit": "EA",
                    "division": "22 05 23"
                }
            ]
        });
        let (prices, failed) = provider().parse_response(&data);
        assert_eq!(failed, 0);
        assert_eq!(prices.len(), 2);

        assert_eq!(prices[0].price, dec!(4.85));
        assert_eq!(prices[0].unit, UnitCode::Sf);
        assert_eq!(prices[0].category.as_deref(), Some("Concrete"));
        assert_eq!(prices[0].confidence_score, 0.95);
        let specs = prices[0].specifications.as_ref().unwrap();
        assert_eq!(specs.get("crew"), Some(&json!("C-1")));
        assert_eq!(specs.get("region"), Some(&json!("US-NATL")));

        assert_eq!(prices[1].external_id, "220523");
        assert_eq!(prices[1].category.as_deref(), Some("Plumbing"));
    }

    #[test]
    fn test_parse_response_counts_bad_items() {
        let data = json!({
            "data": [
                {"id": "A-1", "description": "Good item", "unit_cost": 10.0, "unit": "EA"},
                {"id": "A-2", "description": "No price at all"},
                {"unit_cost": 5.0}
            ]
        });
        let (prices, failed) = provider().parse_response(&data);
        assert_eq!(prices.len(), 1);
        assert_eq!(failed, 2);
    }

    #[test]
    fn test_parse_response_empty_body() {
        let (prices, failed) = provider().parse_response(&json!({}));
        assert!(prices.is_empty());
        assert_eq!(failed, 0);
    }

    #[test]
    fn test_unknown_division_is_general() {
        let data = json!({"items": [
            {"id": "Z", "name": "Mystery widget", "unit_cost": 1.0, "division": "99"},
            {"id": "Y", "name": "Imported widget", "unit_cost": 2.0, "division": "€3"}
        ]});
        let (prices, failed) = provider().parse_response(&data);
        assert_eq!(failed, 0);
        assert_eq!(prices[0].category.as_deref(), Some("General"));
        // non-ASCII division codes parse through without panicking
        assert_eq!(prices[1].category.as_deref(), Some("General"));
    }

    #[test]
    fn test_free_text_unit_is_inferred() {
        let data = json!({"items": [
            {"id": "G", "name": "Driveway sealer", "unit_cost": 24.0, "unit": "per gallon"}
        ]});
        let (prices, _) = provider().parse_response(&data);
        assert_eq!(prices[0].unit, UnitCode::Gal);
    }
}
