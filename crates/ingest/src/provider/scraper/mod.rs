//! Browser-driven scraper provider for supplier sites without an API.
//!
//! The scraper never speaks HTTP for page content itself; it drives an
//! injected [`PageDriver`] (a headless-browser session in production, a
//! fake in tests) and extracts listings with configured CSS selectors.
//!
//! Config keys:
//! - `selectors`: object overriding the default selector set
//! - `detail_selectors`: selector set for product-detail pages
//! - `respect_robots_txt`: honor `robots.txt` (default true)
//! - `delay_seconds`: politeness delay between page loads (default 2)
//! - `max_pages`: pagination cap per fetch (default 5)

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::errors::IngestError;
use crate::models::{MaterialPrice, ProviderConfig, SyncResult};
use crate::normalize::{infer_category, infer_unit, parse_price};
use crate::provider::{mapped_category, PriceProvider, ProviderKind};

/// Scraped listings are the least trusted source.
const CONFIDENCE: f64 = 0.7;

/// Minimal driving surface over a browser page. Selector arguments are
/// CSS selectors; `*_in` methods address one element inside the
/// `list_selector` match at `index`.
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn goto(&mut self, url: &str) -> Result<(), IngestError>;
    fn current_url(&self) -> String;
    /// Number of elements matching `selector`.
    fn count(&self, selector: &str) -> usize;
    fn text_in(&self, list_selector: &str, index: usize, selector: &str) -> Option<String>;
    fn attr_in(&self, list_selector: &str, index: usize, selector: &str, attr: &str)
        -> Option<String>;
    fn text(&self, selector: &str) -> Option<String>;
    /// Click the first element matching `selector`; false when absent.
    async fn click(&mut self, selector: &str) -> bool;
}

/// CSS selectors for a supplier's listing pages.
#[derive(Clone, Debug)]
pub struct Selectors {
    pub product_list: String,
    pub name: String,
    pub price: String,
    pub unit: String,
    pub link: String,
    pub next_page: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            product_list: ".product-item".to_string(),
            name: ".product-name".to_string(),
            price: ".product-price".to_string(),
            unit: ".product-unit".to_string(),
            link: "a".to_string(),
            next_page: ".pagination .next".to_string(),
        }
    }
}

impl Selectors {
    /// Bundled selector sets for supplier sites we scrape often enough
    /// to ship selectors for.
    pub fn preset(site: &str) -> Option<Self> {
        match site {
            "grainger" => Some(Self {
                product_list: ".search-result__item".to_string(),
                name: ".search-result__title".to_string(),
                price: ".pricing__price".to_string(),
                unit: ".pricing__uom".to_string(),
                link: "a.search-result__link".to_string(),
                next_page: "button[aria-label='Next']".to_string(),
            }),
            _ => None,
        }
    }

    /// Build from a config object, falling back field by field.
    fn from_config(config: Option<&serde_json::Map<String, Value>>) -> Self {
        let defaults = Self::default();
        let Some(map) = config else {
            return defaults;
        };
        let pick = |key: &str, default: String| {
            map.get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or(default)
        };
        Self {
            product_list: pick("product_list", defaults.product_list),
            name: pick("name", defaults.name),
            price: pick("price", defaults.price),
            unit: pick("unit", defaults.unit),
            link: pick("link", defaults.link),
            next_page: pick("next_page", defaults.next_page),
        }
    }
}

/// Parse a robots.txt body and decide whether scraping the site root is
/// allowed for generic agents. Only a blanket `Disallow: /` under
/// `User-agent: *` blocks us.
pub(crate) fn robots_allows(body: &str) -> bool {
    let mut applies = false;
    for line in body.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        if let Some(agent) = line.strip_prefix("User-agent:") {
            applies = agent.trim() == "*";
        } else if applies {
            if let Some(path) = line.strip_prefix("Disallow:") {
                if path.trim() == "/" {
                    return false;
                }
            }
        }
    }
    true
}

pub struct ScraperProvider {
    config: ProviderConfig,
    driver: Mutex<Box<dyn PageDriver>>,
    selectors: Selectors,
    detail_selectors: Selectors,
    respect_robots_txt: bool,
    delay: Duration,
    max_pages: usize,
}

impl ScraperProvider {
    pub fn new(config: ProviderConfig, driver: Box<dyn PageDriver>) -> Self {
        let selectors = match config.config_object("selectors") {
            Some(map) => Selectors::from_config(Some(map)),
            None => config
                .config_str("preset")
                .and_then(Selectors::preset)
                .unwrap_or_default(),
        };
        let detail_selectors = match config.config_object("detail_selectors") {
            Some(map) => Selectors::from_config(Some(map)),
            None => selectors.clone(),
        };
        let respect_robots_txt = config.config_bool("respect_robots_txt").unwrap_or(true);
        let delay = Duration::from_secs(config.config_u64("delay_seconds").unwrap_or(2));
        let max_pages = config.config_u64("max_pages").unwrap_or(5) as usize;

        Self {
            config,
            driver: Mutex::new(driver),
            selectors,
            detail_selectors,
            respect_robots_txt,
            delay,
            max_pages,
        }
    }

    /// Check the site's robots.txt. Fails open: unreachable or
    /// unparseable robots files do not block a fetch.
    async fn robots_permit(&self) -> bool {
        if !self.respect_robots_txt {
            return true;
        }
        let url = format!(
            "{}/robots.txt",
            self.config.base_url.trim_end_matches('/')
        );
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        match client.get(&url).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(body) => robots_allows(&body),
                Err(_) => true,
            },
            _ => true,
        }
    }

    fn listing_url(&self, category: Option<&str>, search_query: Option<&str>) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        match (search_query, category) {
            (Some(query), _) => format!("{base}/search?q={query}"),
            (None, Some(category)) => format!("{base}/category/{category}"),
            (None, None) => format!("{base}/products"),
        }
    }

    fn make_absolute(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            format!(
                "{}/{}",
                self.config.base_url.trim_end_matches('/'),
                href.trim_start_matches('/')
            )
        }
    }

    /// Extract one listing from the current page. `None` when the name
    /// or price element is missing.
    fn extract_item(&self, driver: &dyn PageDriver, index: usize) -> Option<MaterialPrice> {
        let list = self.selectors.product_list.as_str();
        let name = driver.text_in(list, index, &self.selectors.name)?;
        let name = name.trim().to_string();
        let price_text = driver.text_in(list, index, &self.selectors.price)?;
        let price = parse_price(&price_text);
        if name.is_empty() || price.is_zero() {
            return None;
        }

        let unit_text = driver
            .text_in(list, index, &self.selectors.unit)
            .unwrap_or_default();
        let external_id = driver
            .attr_in(list, index, &self.selectors.link, "data-sku")
            .or_else(|| driver.attr_in(list, index, &self.selectors.link, "data-id"))
            .unwrap_or_else(|| {
                // stable fallback id derived from the listing name
                format!("{:x}", md5::compute(name.as_bytes()))[..12].to_string()
            });
        let unit = infer_unit(&format!("{unit_text} {name}"));

        let mut specifications: HashMap<String, Value> = HashMap::new();
        specifications.insert("scraped".to_string(), json!(true));
        specifications.insert("source".to_string(), json!(self.config.name));

        let mut record = MaterialPrice::new(external_id, name.clone(), price, unit);
        record.confidence_score = CONFIDENCE;
        record.category = Some(infer_category(&name));
        record.source_url = driver
            .attr_in(list, index, &self.selectors.link, "href")
            .map(|href| self.make_absolute(&href));
        record.specifications = Some(specifications);
        Some(record)
    }
}

#[async_trait]
impl PriceProvider for ScraperProvider {
    fn name(&self) -> &str {
        "scraper"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Scraper
    }

    async fn fetch_prices(
        &self,
        category: Option<&str>,
        search_query: Option<&str>,
        limit: usize,
    ) -> SyncResult {
        if !self.robots_permit().await {
            info!("robots.txt disallows scraping {}", self.config.base_url);
            return SyncResult::failed(IngestError::RobotsDisallowed.to_string());
        }

        let mut driver = self.driver.lock().await;
        if let Err(e) = driver.goto(&self.listing_url(category, search_query)).await {
            return SyncResult::failed(e.to_string());
        }

        let mut prices = Vec::new();
        let mut failed = 0u32;
        let mut pages = 0usize;

        while pages < self.max_pages && prices.len() < limit {
            tokio::time::sleep(self.delay).await;
            pages += 1;

            let found = driver.count(&self.selectors.product_list);
            debug!(
                "scraper page {pages}: {found} listings at {}",
                driver.current_url()
            );
            for index in 0..found {
                if prices.len() >= limit {
                    break;
                }
                match self.extract_item(driver.as_ref(), index) {
                    Some(price) => prices.push(price),
                    None => failed += 1,
                }
            }

            if prices.len() >= limit || !driver.click(&self.selectors.next_page).await {
                break;
            }
        }

        SyncResult::ok(prices, failed)
    }

    async fn fetch_single_price(&self, external_id: &str) -> Option<MaterialPrice> {
        if !self.robots_permit().await {
            return None;
        }

        let url = format!(
            "{}/product/{external_id}",
            self.config.base_url.trim_end_matches('/')
        );
        let mut driver = self.driver.lock().await;
        if let Err(e) = driver.goto(&url).await {
            warn!("scraper detail load failed for '{external_id}': {e}");
            return None;
        }

        let name = driver.text(&self.detail_selectors.name)?.trim().to_string();
        let price = parse_price(&driver.text(&self.detail_selectors.price)?);
        if name.is_empty() || price.is_zero() {
            return None;
        }
        let unit_text = driver.text(&self.detail_selectors.unit).unwrap_or_default();

        let mut record = MaterialPrice::new(
            external_id,
            name.clone(),
            price,
            infer_unit(&format!("{unit_text} {name}")),
        );
        record.confidence_score = CONFIDENCE;
        record.category = Some(infer_category(&name));
        record.source_url = Some(driver.current_url());
        Some(record)
    }

    async fn validate_connection(&self) -> bool {
        let mut driver = self.driver.lock().await;
        driver.goto(&self.config.base_url).await.is_ok()
    }

    fn map_to_canonical_category(&self, provider_category: &str) -> Option<String> {
        mapped_category(&self.config, provider_category)
    }
}
