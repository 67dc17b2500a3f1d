//! PriceDock Ingest Crate
//!
//! This crate provides provider-agnostic price fetching for the
//! PriceDock materials marketplace.
//!
//! # Overview
//!
//! The ingest crate supports:
//! - Multiple source types: pricing APIs, search aggregators, browser scrapers
//! - Runtime provider selection through a name -> factory registry
//! - Shared normalization heuristics (units, categories, price text)
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  ProviderConfig  | --> | ProviderRegistry |  (name -> factory)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  PriceProvider   |  (demo, costdb, shopsearch, scraper)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   SyncResult     |  (normalized MaterialPrice records)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`MaterialPrice`] - One normalized price observation from a source
//! - [`SyncResult`] - Outcome of a bulk fetch, failure-tolerant by design
//! - [`UnitCode`] - Closed set of unit-of-measure codes
//! - [`ProviderConfig`] - Structured configuration for one provider

pub mod errors;
pub mod models;
pub mod normalize;
pub mod provider;
pub mod registry;

pub use errors::IngestError;
pub use models::{MaterialPrice, ProviderConfig, SyncResult, UnitCode};
pub use provider::demo::DemoProvider;
pub use provider::costdb::CostDbProvider;
pub use provider::scraper::{PageDriver, ScraperProvider, Selectors};
pub use provider::shopsearch::ShopSearchProvider;
pub use provider::{PriceProvider, ProviderKind};
pub use registry::{AdapterFactory, DriverFactory, ProviderRegistry};
