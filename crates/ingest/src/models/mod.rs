//! Adapter-level data models.

mod config;
mod price;
mod units;

pub use config::ProviderConfig;
pub use price::{MaterialPrice, SyncResult};
pub use units::UnitCode;
