//! Price-history module - append-only price records, statistics, and
//! trend detection.

mod price_history_model;
mod price_history_service;
mod price_history_traits;

pub use price_history_model::{PriceHistoryRecord, PriceStatistics, PriceTrend};
pub use price_history_service::PriceHistoryService;
pub use price_history_traits::PriceHistoryRepositoryTrait;
