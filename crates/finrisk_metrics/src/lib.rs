//! # finrisk_metrics: Per-Asset Risk Metrics
//!
//! ## Layer 2 Role
//!
//! finrisk_metrics builds on `finrisk_core` and provides:
//! - Drawdown series, maximum drawdown and its peak/trough (`drawdown`)
//! - Sharpe ratio with an explicit undefined state (`sharpe`)
//! - Beta against a benchmark (`beta`)
//! - The per-asset statistics record and its calculator (`asset_stats`)
//! - Rayon helpers for fanning independent work out (`parallel`)
//!
//! ## Usage Examples
//!
//! ```rust
//! use finrisk_metrics::drawdown::max_drawdown;
//! use finrisk_metrics::sharpe::sharpe_ratio;
//!
//! let mdd = max_drawdown(&[100.0_f64, 90.0, 95.0, 80.0]).unwrap();
//! assert!((mdd + 0.2).abs() < 1e-12);
//!
//! // Zero volatility never yields a number
//! assert!(sharpe_ratio(0.01, 0.0, 0.0).value().is_err());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `AssetStats`, `SharpeRatio` and `DrawdownPeriod`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod asset_stats;
pub mod beta;
pub mod drawdown;
pub mod parallel;
pub mod sharpe;

pub use asset_stats::{AnalysisConfig, AssetStats, AssetStatsCalculator};
pub use sharpe::SharpeRatio;
