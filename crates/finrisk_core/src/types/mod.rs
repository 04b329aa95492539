//! Core data types.
//!
//! This module provides:
//! - `ids`: Strongly-typed asset identifiers
//! - `series`: Immutable price and return series
//! - `table`: Aligned multi-asset tables
//! - `error`: The engine-wide error taxonomy
//!
//! # Re-exports
//!
//! - [`AssetId`] from `ids`
//! - [`PriceSeries`], [`ReturnSeries`], [`ReturnMode`] from `series`
//! - [`PriceTable`], [`ReturnTable`] from `table`
//! - [`RiskError`], [`RiskResult`] from `error`

pub mod error;
pub mod ids;
pub mod series;
pub mod table;

pub use error::{RiskError, RiskResult};
pub use ids::AssetId;
pub use series::{PriceSeries, ReturnMode, ReturnSeries};
pub use table::{PriceTable, ReturnTable};
