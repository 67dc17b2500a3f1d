//! Comparison module - cross-supplier price comparison and best-value
//! scoring.

mod comparison_model;
mod comparison_service;

pub use comparison_model::{
    BestValue, ComparisonEntry, MaterialComparison, PriceRange, VariantStatistics,
};
pub use comparison_service::ComparisonService;
