//! Shared normalization heuristics.
//!
//! Every adapter funnels free-text source data through these helpers so
//! that heterogeneous sources produce comparable records. The tables are
//! ordered and evaluated first-match-wins; the ordering is load-bearing
//! where keywords overlap.

mod category;
mod divisions;
mod price_text;
mod units;

pub use category::infer_category;
pub use divisions::{category_to_division, division_to_category};
pub use price_text::parse_price;
pub use units::infer_unit;
