//! # finrisk_stress: Stress Testing
//!
//! ## Layer 4 Role
//!
//! finrisk_stress sits on top of the portfolio aggregator and answers
//! "what if" questions:
//! - Market-wide and single-asset return shocks
//! - Correlation breakdowns
//! - Preset scenarios and a per-asset concentration sweep
//! - A parallel engine reporting the worst case
//!
//! Scenarios never modify their inputs. Each one derives a shocked copy
//! and reruns the aggregation on it.
//!
//! ## Usage Examples
//!
//! ```rust
//! use chrono::NaiveDate;
//! use finrisk_core::types::{PriceSeries, PriceTable, ReturnMode};
//! use finrisk_portfolio::{validate_weights, PortfolioWeights, RiskInputs, WeightPolicy};
//! use finrisk_stress::scenarios::{ScenarioBounds, StressScenario};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let table = PriceTable::new(vec![
//!     PriceSeries::with_daily_index("A", start, vec![100.0, 101.0, 99.0, 102.0]).unwrap(),
//!     PriceSeries::with_daily_index("B", start, vec![20.0, 19.5, 20.5, 20.0]).unwrap(),
//! ]).unwrap();
//! let inputs = RiskInputs::from_prices(&table, ReturnMode::Simple).unwrap();
//! let weights = validate_weights(
//!     &PortfolioWeights::new().with("A", 0.5).with("B", 0.5),
//!     inputs.assets(),
//!     &WeightPolicy::default(),
//! ).unwrap();
//!
//! let result = StressScenario::market_wide("Crash", -0.3, 1)
//!     .configure(&ScenarioBounds::default()).unwrap()
//!     .apply(&inputs).unwrap()
//!     .evaluate(&weights).unwrap();
//! assert!((result.shock_return + 0.3).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for scenarios and results

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod scenarios;

pub use scenarios::{StressEngine, StressResult, StressScenario};
