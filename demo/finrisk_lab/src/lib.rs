//! # FinRisk Lab
//!
//! FinRisk Lab drives the finrisk engine from a TOML configuration: it
//! loads an aligned price table (CSV or seeded synthetic paths), validates
//! the portfolio weights and runs the analysis and stress workflows,
//! writing each outcome as a JSON report.
//!
//! ## Features
//!
//! - **Risk Analysis**: Per-asset volatility, drawdown, Sharpe and beta;
//!   correlation matrix; portfolio volatility, risk contributions and
//!   diversification benefit; realised portfolio performance
//! - **Stress Testing**: Preset and configured scenarios, beta-scaled
//!   market shocks and an optional concentration sweep
//!
//! ## Architecture
//!
//! This crate sits in the host layer, outside the engine:
//! - Configuration is turned into immutable engine settings here
//! - The engine crates (`finrisk_core` → `finrisk_stress`) never see files,
//!   environment variables or the async runtime

pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod session;
pub mod workflow;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{DataMode, LabConfig};
    pub use crate::error::LabError;
    pub use crate::report::{FileWriter, RiskReport};
    pub use crate::session::PortfolioSession;
    pub use crate::workflow::{
        AnalysisWorkflow, ProgressCallback, RiskWorkflow, StressTestWorkflow, WorkflowResult,
        WorkflowStep,
    };
}
