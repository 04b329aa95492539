//! # finrisk_core: Returns and Statistics Foundation
//!
//! ## Layer 1 (Foundation) Role
//!
//! finrisk_core is the bottom layer of the risk workspace, providing:
//! - Price and return series with validated, immutable storage (`types`)
//! - Period returns in simple or log mode (`returns`)
//! - Volatility, rolling volatility, correlation and covariance (`stats`)
//! - Annualisation of per-period statistics (`stats::annualise`)
//! - The engine-wide error taxonomy: `RiskError` (`types::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other finrisk_* crates, with minimal
//! external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - chrono: Date index of price and return series
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use chrono::NaiveDate;
//! use finrisk_core::returns::compute_returns;
//! use finrisk_core::stats::volatility;
//! use finrisk_core::types::{PriceSeries, ReturnMode};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let prices = PriceSeries::with_daily_index("ACME", start, vec![100.0, 90.0, 95.0, 80.0]).unwrap();
//! let returns = compute_returns(&prices, ReturnMode::Simple).unwrap();
//!
//! assert_eq!(returns.len(), 3);
//! let vol = volatility(returns.values()).unwrap();
//! assert!(vol > 0.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for series, tables, matrices and errors

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod returns;
pub mod stats;
pub mod traits;
pub mod types;
