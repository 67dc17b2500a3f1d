//! Runtime registry mapping provider names to adapter factories.
//!
//! Orchestration code never constructs adapters directly; it asks the
//! registry by name so that new sources plug in without touching the
//! sync path.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::models::ProviderConfig;
use crate::provider::costdb::CostDbProvider;
use crate::provider::demo::DemoProvider;
use crate::provider::scraper::{PageDriver, ScraperProvider};
use crate::provider::shopsearch::ShopSearchProvider;
use crate::provider::PriceProvider;

/// Builds one adapter instance from its runtime configuration.
pub type AdapterFactory = Box<dyn Fn(ProviderConfig) -> Arc<dyn PriceProvider> + Send + Sync>;

/// Builds a fresh browser session for a scraper adapter.
pub type DriverFactory = Arc<dyn Fn() -> Box<dyn PageDriver> + Send + Sync>;

#[derive(Default)]
pub struct ProviderRegistry {
    factories: HashMap<String, AdapterFactory>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in API adapters. Scraper
    /// registration requires a browser session factory; see
    /// [`register_scraper`](Self::register_scraper).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("demo", |config| Arc::new(DemoProvider::new(config)));
        registry.register("costdb", |config| Arc::new(CostDbProvider::new(config)));
        registry.register("shopsearch", |config| {
            Arc::new(ShopSearchProvider::new(config))
        });
        registry
    }

    /// Register a factory under `name`. Names are case-insensitive;
    /// re-registering a name replaces the previous factory.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(ProviderConfig) -> Arc<dyn PriceProvider> + Send + Sync + 'static,
    {
        let key = name.to_lowercase();
        if self.factories.insert(key, Box::new(factory)).is_some() {
            debug!("replaced provider factory '{}'", name.to_lowercase());
        }
    }

    /// Register the scraper adapter, which needs a driver factory to
    /// open a browser session per instance.
    pub fn register_scraper(&mut self, driver_factory: DriverFactory) {
        self.register("scraper", move |config| {
            Arc::new(ScraperProvider::new(config, driver_factory()))
        });
    }

    /// Build an adapter by name. `None` for unknown names.
    pub fn get(&self, name: &str, config: ProviderConfig) -> Option<Arc<dyn PriceProvider>> {
        self.factories.get(&name.to_lowercase()).map(|f| f(config))
    }

    /// Registered provider names, sorted.
    pub fn providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}
