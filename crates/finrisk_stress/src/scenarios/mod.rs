//! Stress scenario definition and execution.
//!
//! This module provides infrastructure for:
//! - Scenario definitions and parameter bounds
//! - Return and correlation shocks
//! - The configured / applied / evaluated lifecycle
//! - Preset stress scenarios and the concentration sweep
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │                  Stress Engine                      │
//! ├────────────────────────────────────────────────────┤
//! │  StressScenario     - Named shock definition       │
//! │  ConfiguredScenario - Bounds-checked scenario      │
//! │  AppliedScenario    - Shocked copy of the inputs   │
//! │  StressResult       - Baseline vs stressed risk    │
//! │  StressEngine       - Execution & worst case       │
//! └────────────────────────────────────────────────────┘
//! ```

mod engine;
mod presets;
mod scenario;
mod shock;
mod state;
mod sweep;

pub use engine::StressEngine;
pub use presets::PresetScenarioType;
pub use scenario::{CorrelationRule, ScenarioBounds, ScenarioKind, StressScenario};
pub use shock::{break_correlation, per_period_factor, shock_returns};
pub use state::{AppliedScenario, ConfiguredScenario, StressResult};
pub use sweep::concentration_sweep;
