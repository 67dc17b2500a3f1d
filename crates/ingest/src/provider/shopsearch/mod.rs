//! Search-aggregator provider for retail shopping results.
//!
//! A single aggregator endpoint fronts several search engines; the
//! `engine` config key selects which one:
//! - `retail_a`: big-box retailer product search (default)
//! - `retail_b`: second retailer, organic results only
//! - `shopping`: general shopping search across merchants
//!
//! Retail engines return structured product feeds and carry a higher
//! confidence than the merchant-mixed shopping feed.

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;

use crate::errors::IngestError;
use crate::models::{MaterialPrice, ProviderConfig, SyncResult};
use crate::normalize::{infer_category, infer_unit, parse_price};
use crate::provider::{http, mapped_category, PriceProvider, ProviderKind};

const DEFAULT_BASE_URL: &str = "https://api.searchhub.dev";

const RETAIL_CONFIDENCE: f64 = 0.85;
const SHOPPING_CONFIDENCE: f64 = 0.75;
/// Product-detail lookups resolve a single known listing.
const PRODUCT_CONFIDENCE: f64 = 0.9;

pub struct ShopSearchProvider {
    client: reqwest::Client,
    config: ProviderConfig,
    engine: String,
    location: String,
}

impl ShopSearchProvider {
    pub fn new(mut config: ProviderConfig) -> Self {
        if config.base_url.is_empty() {
            config.base_url = DEFAULT_BASE_URL.to_string();
        }
        let engine = config.config_str("engine").unwrap_or("retail_a").to_string();
        let location = config
            .config_str("location")
            .unwrap_or("United States")
            .to_string();
        let client = http::build_client(&config);

        Self {
            client,
            config,
            engine,
            location,
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search.json", self.config.base_url.trim_end_matches('/'))
    }

    fn search_params(&self, query: &str, limit: usize) -> Vec<(String, String)> {
        let mut params = vec![
            (
                "api_key".to_string(),
                self.config.api_key.clone().unwrap_or_default(),
            ),
            ("engine".to_string(), self.engine.clone()),
            ("q".to_string(), query.to_string()),
            ("num".to_string(), limit.min(100).to_string()),
        ];
        match self.engine.as_str() {
            "retail_a" => {
                let zip = self.config.config_str("zip_code").unwrap_or("45409");
                params.push(("delivery_zip".to_string(), zip.to_string()));
            }
            "shopping" => {
                params.push(("location".to_string(), self.location.clone()));
                params.push(("gl".to_string(), "us".to_string()));
                params.push(("hl".to_string(), "en".to_string()));
            }
            _ => {}
        }
        params
    }

    /// Dispatch parsing to the engine-specific result shape. Unknown
    /// engines produce no records.
    fn parse_results(&self, data: &Value, category: Option<&str>) -> (Vec<MaterialPrice>, u32) {
        match self.engine.as_str() {
            "retail_a" => parse_product_feed(data, "products", RETAIL_CONFIDENCE, category),
            "retail_b" => parse_product_feed(data, "organic_results", RETAIL_CONFIDENCE, category),
            "shopping" => parse_product_feed(data, "shopping_results", SHOPPING_CONFIDENCE, category),
            other => {
                warn!("unknown search engine '{other}', no results parsed");
                (vec![], 0)
            }
        }
    }
}

/// Parse one entry from an aggregator result array. Entries without a
/// title or a usable price are rejected.
fn parse_entry(
    entry: &Value,
    position: usize,
    confidence: f64,
    category: Option<&str>,
) -> Option<MaterialPrice> {
    let title = entry.get("title").and_then(Value::as_str)?;

    let price = match entry.get("extracted_price") {
        Some(Value::Number(n)) => parse_price(&n.to_string()),
        _ => parse_price(entry.get("price").and_then(Value::as_str).unwrap_or("")),
    };
    if price.is_zero() {
        return None;
    }

    let external_id = ["product_id", "model", "item_id"]
        .iter()
        .find_map(|key| match entry.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| format!("pos-{position}"));

    let mut specifications: HashMap<String, Value> = HashMap::new();
    for key in ["seller", "source", "rating", "reviews", "brand", "delivery"] {
        if let Some(value) = entry.get(key) {
            specifications.insert(key.to_string(), value.clone());
        }
    }

    let mut record = MaterialPrice::new(external_id, title, price, infer_unit(title));
    record.confidence_score = confidence;
    record.category = Some(
        category
            .map(str::to_string)
            .unwrap_or_else(|| infer_category(title)),
    );
    record.source_url = entry
        .get("link")
        .or_else(|| entry.get("product_link"))
        .and_then(Value::as_str)
        .map(str::to_string);
    if !specifications.is_empty() {
        record.specifications = Some(specifications);
    }
    record.raw_data = Some(entry.clone());
    Some(record)
}

fn parse_product_feed(
    data: &Value,
    array_key: &str,
    confidence: f64,
    category: Option<&str>,
) -> (Vec<MaterialPrice>, u32) {
    let entries = data.get(array_key).and_then(Value::as_array);
    let mut prices = Vec::new();
    let mut failed = 0u32;
    for (position, entry) in entries.into_iter().flatten().enumerate() {
        match parse_entry(entry, position, confidence, category) {
            Some(price) => prices.push(price),
            None => failed += 1,
        }
    }
    (prices, failed)
}

#[async_trait]
impl PriceProvider for ShopSearchProvider {
    fn name(&self) -> &str {
        "shopsearch"
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
        let query = search_query
            .or(category)
            .unwrap_or("construction materials");
        let params = self.search_params(query, limit);

        let response = match self.client.get(self.search_url()).query(&params).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("shopsearch fetch failed: {e}");
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

        let (prices, failed) = self.parse_results(&data, category);
        debug!(
            "shopsearch ({}) returned {} records ({failed} skipped)",
            self.engine,
            prices.len()
        );
        SyncResult::ok(prices, failed)
    }

    /// Point lookup is only available for the `retail_a` engine, which
    /// exposes a product-detail endpoint.
    async fn fetch_single_price(&self, external_id: &str) -> Option<MaterialPrice> {
        if self.engine != "retail_a" {
            debug!(
                "{}",
                IngestError::NotSupported {
                    operation: "fetch_single_price".to_string(),
                    provider: self.engine.clone(),
                }
            );
            return None;
        }

        let params = [
            ("api_key", self.config.api_key.clone().unwrap_or_default()),
            ("engine", "retail_a_product".to_string()),
            ("product_id", external_id.to_string()),
        ];
        let response = self
            .client
            .get(self.search_url())
            .query(&params)
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            debug!(
                "shopsearch product lookup for '{external_id}' returned {}",
                response.status()
            );
            return None;
        }

        let data: Value = response.json().await.ok()?;
        let product = data.get("product_results")?;
        let title = product.get("title").and_then(Value::as_str)?;
        let price = match product.get("price") {
            Some(Value::Number(n)) => parse_price(&n.to_string()),
            Some(Value::String(s)) => parse_price(s),
            _ => return None,
        };
        if price.is_zero() {
            return None;
        }

        let mut record =
            MaterialPrice::new(external_id, title, price, infer_unit(title));
        record.confidence_score = PRODUCT_CONFIDENCE;
        record.category = Some(infer_category(title));
        record.source_url = product
            .get("link")
            .and_then(Value::as_str)
            .map(str::to_string);
        record.raw_data = Some(product.clone());
        Some(record)
    }

    async fn validate_connection(&self) -> bool {
        let params = self.search_params("test", 1);
        match self.client.get(self.search_url()).query(&params).send().await {
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
    use crate::models::UnitCode;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn provider_for(engine: &str) -> ShopSearchProvider {
        let mut config = ProviderConfig::new("shopsearch", "");
        config.api_key = Some("test_key".to_string());
        config.config.insert("engine".into(), json!(engine));
        ShopSearchProvider::new(config)
    }

    #[test]
    fn test_retail_a_params_include_zip() {
        let provider = provider_for("retail_a");
        let params = provider.search_params("lumber", 10);
        assert!(params.contains(&("delivery_zip".to_string(), "45409".to_string())));
        assert!(params.contains(&("num".to_string(), "10".to_string())));
    }

    #[test]
    fn test_shopping_params_include_locale() {
        let provider = provider_for("shopping");
        let params = provider.search_params("rebar", 200);
        assert!(params.contains(&("location".to_string(), "United States".to_string())));
        assert!(params.contains(&("gl".to_string(), "us".to_string())));
        // request size is capped
        assert!(params.contains(&("num".to_string(), "100".to_string())));
    }

    #[test]
    fn test_parse_retail_feed() {
        let data = json!({
            "products": [
                {
                    "product_id": "312528316",
                    "title": "2 in. x 4 in. x 8 ft. Stud Lumber",
                    "extracted_price": 3.98,
                    "link": "https://retailer.example/p/312528316",
                    "brand": "Unbranded",
                    "rating": 4.4
                },
                {
                    "title": "Item priced as text per sq ft",
                    "price": "$12.47"
                },
                {
                    "title": "No price on this one"
                }
            ]
        });
        let provider = provider_for("retail_a");
        let (prices, failed) = provider.parse_results(&data, None);
        assert_eq!(prices.len(), 2);
        assert_eq!(failed, 1);

        assert_eq!(prices[0].external_id, "312528316");
        assert_eq!(prices[0].price, dec!(3.98));
        assert_eq!(prices[0].unit, UnitCode::Ea);
        assert_eq!(prices[0].category.as_deref(), Some("Lumber"));
        assert_eq!(prices[0].confidence_score, RETAIL_CONFIDENCE);
        assert_eq!(
            prices[0].source_url.as_deref(),
            Some("https://retailer.example/p/312528316")
        );

        // entries without an id fall back to their feed position
        assert_eq!(prices[1].external_id, "pos-1");
        assert_eq!(prices[1].price, dec!(12.47));
        assert_eq!(prices[1].unit, UnitCode::Sf);
    }

    #[test]
    fn test_parse_shopping_feed_confidence() {
        let data = json!({
            "shopping_results": [
                {"title": "Concrete mix 80 lb bag", "extracted_price": 6.25, "seller": "MegaMart"}
            ]
        });
        let provider = provider_for("shopping");
        let (prices, _) = provider.parse_results(&data, None);
        assert_eq!(prices[0].confidence_score, SHOPPING_CONFIDENCE);
        assert_eq!(prices[0].category.as_deref(), Some("Concrete"));
        let specs = prices[0].specifications.as_ref().unwrap();
        assert_eq!(specs.get("seller"), Some(&json!("MegaMart")));
    }

    #[test]
    fn test_caller_category_wins_over_inference() {
        let data = json!({
            "organic_results": [
                {"title": "Galvanized deck screws", "extracted_price": 9.99}
            ]
        });
        let provider = provider_for("retail_b");
        let (prices, _) = provider.parse_results(&data, Some("Hardware"));
        assert_eq!(prices[0].category.as_deref(), Some("Hardware"));
    }

    #[test]
    fn test_unknown_engine_parses_nothing() {
        let provider = provider_for("mystery");
        let (prices, failed) = provider.parse_results(&json!({"products": [{}]}), None);
        assert!(prices.is_empty());
        assert_eq!(failed, 0);
    }

    #[tokio::test]
    async fn test_single_lookup_unsupported_for_shopping() {
        let provider = provider_for("shopping");
        assert!(provider.fetch_single_price("123").await.is_none());
    }
}
