//! Preset scenarios for common stress tests.
//!
//! Provides ready-to-use scenarios for typical downside analysis:
//! - Market-wide declines (-20%, -30%)
//! - A -40% shock to the largest holding
//! - Correlation breakdowns (1.5x amplification, lockstep)

use super::scenario::{CorrelationRule, StressScenario};
use finrisk_portfolio::ValidatedWeights;

/// Types of preset scenarios.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PresetScenarioType {
    /// Every asset falls 20%
    #[cfg_attr(feature = "serde", serde(rename = "market_down_20_pct"))]
    MarketDown20Pct,
    /// Every asset falls 30%
    #[cfg_attr(feature = "serde", serde(rename = "market_down_30_pct"))]
    MarketDown30Pct,
    /// The largest holding falls 40%
    #[cfg_attr(feature = "serde", serde(rename = "largest_holding_down_40_pct"))]
    LargestHoldingDown40Pct,
    /// Off-diagonal correlations amplified 1.5x
    CorrelationAmplify,
    /// Every pair perfectly correlated
    CorrelationLockstep,
}

impl PresetScenarioType {
    /// Get all presets.
    pub fn all() -> Vec<Self> {
        vec![
            Self::MarketDown20Pct,
            Self::MarketDown30Pct,
            Self::LargestHoldingDown40Pct,
            Self::CorrelationAmplify,
            Self::CorrelationLockstep,
        ]
    }

    /// Get the market-wide presets.
    pub fn market_scenarios() -> Vec<Self> {
        vec![Self::MarketDown20Pct, Self::MarketDown30Pct]
    }

    /// Get the correlation presets.
    pub fn correlation_scenarios() -> Vec<Self> {
        vec![Self::CorrelationAmplify, Self::CorrelationLockstep]
    }

    /// Get human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MarketDown20Pct => "Market -20%",
            Self::MarketDown30Pct => "Market -30%",
            Self::LargestHoldingDown40Pct => "Largest holding -40%",
            Self::CorrelationAmplify => "Correlation x1.5",
            Self::CorrelationLockstep => "Correlation -> 1",
        }
    }

    /// Get description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::MarketDown20Pct => "All assets decline 20% in the latest period",
            Self::MarketDown30Pct => "All assets decline 30% in the latest period",
            Self::LargestHoldingDown40Pct => {
                "The largest-weight asset declines 40% in the latest period"
            }
            Self::CorrelationAmplify => "Off-diagonal correlations scaled by 1.5 and clipped",
            Self::CorrelationLockstep => "All assets move in lockstep (correlation 1)",
        }
    }

    /// Build the scenario for a portfolio.
    ///
    /// Only [`Self::LargestHoldingDown40Pct`] depends on the weights.
    pub fn build(&self, weights: &ValidatedWeights) -> StressScenario {
        match self {
            Self::MarketDown20Pct => StressScenario::market_wide(self.name(), -0.20, 1),
            Self::MarketDown30Pct => StressScenario::market_wide(self.name(), -0.30, 1),
            Self::LargestHoldingDown40Pct => {
                let (asset, _) = weights.largest();
                StressScenario::concentrated(
                    format!("{} ({})", self.name(), asset),
                    asset.clone(),
                    -0.40,
                    1,
                )
            }
            Self::CorrelationAmplify => {
                StressScenario::correlation_breakdown(self.name(), CorrelationRule::Amplify(1.5))
            }
            Self::CorrelationLockstep => {
                StressScenario::correlation_breakdown(self.name(), CorrelationRule::ForceTo(1.0))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::{ScenarioBounds, ScenarioKind};
    use finrisk_core::types::AssetId;
    use finrisk_portfolio::{validate_weights, PortfolioWeights, WeightPolicy};

    fn weights() -> ValidatedWeights {
        let universe = vec![AssetId::new("A"), AssetId::new("B"), AssetId::new("C")];
        let raw = PortfolioWeights::new()
            .with("A", 0.2)
            .with("B", 0.5)
            .with("C", 0.3);
        validate_weights(&raw, &universe, &WeightPolicy::default()).unwrap()
    }

    #[test]
    fn test_all_presets_within_default_bounds() {
        let w = weights();
        for preset in PresetScenarioType::all() {
            let scenario = preset.build(&w);
            assert!(scenario.configure(&ScenarioBounds::default()).is_ok());
            assert!(scenario.name.starts_with(preset.name()));
            assert!(!preset.description().is_empty());
        }
    }

    #[test]
    fn test_largest_holding_targets_max_weight() {
        let scenario = PresetScenarioType::LargestHoldingDown40Pct.build(&weights());
        match scenario.kind {
            ScenarioKind::Concentrated { asset, shock, window } => {
                assert_eq!(asset.as_str(), "B");
                assert_eq!(shock, -0.40);
                assert_eq!(window, 1);
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_groupings() {
        assert_eq!(PresetScenarioType::market_scenarios().len(), 2);
        assert_eq!(PresetScenarioType::correlation_scenarios().len(), 2);
        assert_eq!(PresetScenarioType::all().len(), 5);
    }
}
