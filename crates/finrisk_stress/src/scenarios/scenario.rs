//! Stress scenario definitions and parameter bounds.

use super::state::ConfiguredScenario;
use finrisk_core::types::{AssetId, RiskError, RiskResult};
use std::fmt;

/// How a correlation breakdown rewrites off-diagonal correlations.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CorrelationRule {
    /// Every off-diagonal entry becomes `target`
    ForceTo(f64),
    /// Every off-diagonal entry is multiplied and clipped to `[-1, 1]`
    Amplify(f64),
}

impl fmt::Display for CorrelationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForceTo(target) => write!(f, "force to {}", target),
            Self::Amplify(multiplier) => write!(f, "amplify x{}", multiplier),
        }
    }
}

#[cfg(feature = "serde")]
fn default_window() -> usize {
    1
}

/// What a scenario shocks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ScenarioKind {
    /// Uniform shock to every asset over the trailing `window` periods
    MarketWide {
        /// Compounded move over the window, in `[-1, 0]`
        shock: f64,
        /// Number of trailing periods the move is spread over
        #[cfg_attr(feature = "serde", serde(default = "default_window"))]
        window: usize,
    },
    /// Shock to a single asset
    Concentrated {
        /// Shocked asset
        asset: AssetId,
        /// Compounded move over the window, in `[-1, 0]`
        shock: f64,
        /// Number of trailing periods the move is spread over
        #[cfg_attr(feature = "serde", serde(default = "default_window"))]
        window: usize,
    },
    /// Override of the correlation structure
    CorrelationBreakdown {
        /// Rewrite rule
        rule: CorrelationRule,
    },
}

impl ScenarioKind {
    /// Short label of the kind.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MarketWide { .. } => "market_wide",
            Self::Concentrated { .. } => "concentrated",
            Self::CorrelationBreakdown { .. } => "correlation_breakdown",
        }
    }
}

/// A named stress scenario.
///
/// # Examples
/// ```
/// use finrisk_stress::scenarios::{ScenarioBounds, StressScenario};
///
/// let crash = StressScenario::market_wide("Crash", -0.3, 1);
/// assert!(crash.configure(&ScenarioBounds::default()).is_ok());
///
/// let impossible = StressScenario::market_wide("Too far", -1.5, 1);
/// assert!(impossible.configure(&ScenarioBounds::default()).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StressScenario {
    /// Display name
    pub name: String,
    /// Shock definition
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind: ScenarioKind,
}

impl StressScenario {
    /// Create a scenario.
    pub fn new(name: impl Into<String>, kind: ScenarioKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Market-wide shock.
    pub fn market_wide(name: impl Into<String>, shock: f64, window: usize) -> Self {
        Self::new(name, ScenarioKind::MarketWide { shock, window })
    }

    /// Shock to one asset.
    pub fn concentrated(
        name: impl Into<String>,
        asset: impl Into<AssetId>,
        shock: f64,
        window: usize,
    ) -> Self {
        Self::new(
            name,
            ScenarioKind::Concentrated {
                asset: asset.into(),
                shock,
                window,
            },
        )
    }

    /// Correlation breakdown.
    pub fn correlation_breakdown(name: impl Into<String>, rule: CorrelationRule) -> Self {
        Self::new(name, ScenarioKind::CorrelationBreakdown { rule })
    }

    /// Validate parameters against `bounds`. No data is touched.
    ///
    /// # Errors
    /// `ScenarioOutOfBounds` naming the first offending parameter.
    pub fn configure(&self, bounds: &ScenarioBounds) -> RiskResult<ConfiguredScenario> {
        match &self.kind {
            ScenarioKind::MarketWide { shock, window }
            | ScenarioKind::Concentrated { shock, window, .. } => {
                bounds.check_shock(*shock)?;
                bounds.check_window(*window)?;
            }
            ScenarioKind::CorrelationBreakdown { rule } => bounds.check_rule(rule)?,
        }
        Ok(ConfiguredScenario::new(self.clone()))
    }
}

impl fmt::Display for StressScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Realistic ranges for scenario parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioBounds {
    /// Most severe shock (a total loss)
    pub min_shock: f64,
    /// Mildest shock
    pub max_shock: f64,
    /// Smallest shock window
    pub min_window: usize,
    /// Lowest forced correlation
    pub min_correlation: f64,
    /// Highest forced correlation
    pub max_correlation: f64,
    /// Smallest amplification multiplier
    pub min_multiplier: f64,
    /// Largest amplification multiplier
    pub max_multiplier: f64,
}

impl Default for ScenarioBounds {
    fn default() -> Self {
        Self {
            min_shock: -1.0,
            max_shock: 0.0,
            min_window: 1,
            min_correlation: -1.0,
            max_correlation: 1.0,
            min_multiplier: 1.0,
            max_multiplier: 10.0,
        }
    }
}

impl ScenarioBounds {
    fn check_range(parameter: &str, value: f64, min: f64, max: f64) -> RiskResult<()> {
        if value.is_finite() && value >= min && value <= max {
            Ok(())
        } else {
            Err(RiskError::ScenarioOutOfBounds {
                parameter: parameter.to_string(),
                value,
                min,
                max,
            })
        }
    }

    fn check_shock(&self, shock: f64) -> RiskResult<()> {
        Self::check_range("shock", shock, self.min_shock, self.max_shock)
    }

    fn check_window(&self, window: usize) -> RiskResult<()> {
        if window >= self.min_window {
            Ok(())
        } else {
            Err(RiskError::ScenarioOutOfBounds {
                parameter: "window".to_string(),
                value: window as f64,
                min: self.min_window as f64,
                max: f64::INFINITY,
            })
        }
    }

    fn check_rule(&self, rule: &CorrelationRule) -> RiskResult<()> {
        match rule {
            CorrelationRule::ForceTo(target) => Self::check_range(
                "correlation_target",
                *target,
                self.min_correlation,
                self.max_correlation,
            ),
            CorrelationRule::Amplify(multiplier) => Self::check_range(
                "correlation_multiplier",
                *multiplier,
                self.min_multiplier,
                self.max_multiplier,
            ),
        }
    }
}
