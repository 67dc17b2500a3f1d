//! PriceDock Core - pricing services, persistent models, and traits.
//!
//! This crate contains the orchestration and analysis layers of the
//! PriceDock materials pricing backend. It is database-agnostic: all
//! persistence goes through repository traits implemented by a storage
//! crate.

pub mod comparison;
pub mod errors;
pub mod materials;
pub mod price_history;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export error types
pub use errors::DatabaseError;
pub use errors::Error;
pub use errors::Result;

// Re-export the service layer
pub use comparison::ComparisonService;
pub use price_history::PriceHistoryService;
pub use sync::SyncService;
