//! # finrisk_portfolio: Portfolio Risk Aggregation
//!
//! ## Layer 3 Role
//!
//! finrisk_portfolio combines per-asset statistics into portfolio-level
//! risk:
//! - The weights validation gate (`weights`)
//! - Immutable risk input snapshots (`inputs`)
//! - Volatility, risk contributions and diversification (`aggregator`)
//! - Realised performance of the weighted portfolio (`performance`)
//!
//! Aggregation only accepts [`ValidatedWeights`], which can only be
//! produced by [`validate_weights`].
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for weights, inputs and results

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod aggregator;
pub mod inputs;
pub mod performance;
pub mod weights;

pub use aggregator::{
    diversification_benefit, portfolio_volatility, risk_contribution, PortfolioAggregator,
    PortfolioRisk,
};
pub use inputs::RiskInputs;
pub use performance::{portfolio_performance, PortfolioPerformance};
pub use weights::{validate_weights, PortfolioWeights, ValidatedWeights, WeightPolicy};
