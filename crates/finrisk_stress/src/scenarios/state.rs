//! Scenario lifecycle: configured, applied, evaluated.
//!
//! Each stage is its own type, so a scenario cannot be evaluated before
//! it has been validated and applied to data:
//!
//! ```text
//! StressScenario --configure--> ConfiguredScenario --apply--> AppliedScenario --evaluate--> StressResult
//! ```

use super::scenario::{ScenarioKind, StressScenario};
use super::shock::{break_correlation, shock_returns};
use finrisk_core::types::{AssetId, RiskError, RiskResult};
use finrisk_portfolio::{PortfolioAggregator, PortfolioRisk, RiskInputs, ValidatedWeights};
use tracing::debug;

/// A scenario whose parameters passed bounds validation.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfiguredScenario {
    scenario: StressScenario,
}

impl ConfiguredScenario {
    pub(crate) fn new(scenario: StressScenario) -> Self {
        Self { scenario }
    }

    /// The validated scenario.
    pub fn scenario(&self) -> &StressScenario {
        &self.scenario
    }

    /// Scenario name.
    pub fn name(&self) -> &str {
        &self.scenario.name
    }

    /// Build shocked copies of `inputs`. The originals are only read.
    ///
    /// # Errors
    /// - `UnknownAsset` if a concentrated shock names an asset not in `inputs`
    /// - `InvalidWindow` if the shock window exceeds the return history
    /// - `ScenarioOutOfBounds` if a forced correlation cannot hold for the
    ///   number of assets
    /// - `DegenerateInput`, naming the scenario, if amplified correlations
    ///   are not positive semi-definite
    pub fn apply<'a>(&self, inputs: &'a RiskInputs) -> RiskResult<AppliedScenario<'a>> {
        let n = inputs.n_assets();
        let (stressed, asset_shocks) = match &self.scenario.kind {
            ScenarioKind::MarketWide { shock, window } => {
                let columns: Vec<usize> = (0..n).collect();
                let returns = shock_returns(inputs.returns(), &columns, *shock, *window)?;
                (inputs.with_returns(returns)?, vec![*shock; n])
            }
            ScenarioKind::Concentrated {
                asset,
                shock,
                window,
            } => {
                let idx = inputs
                    .position(asset.as_str())
                    .ok_or_else(|| RiskError::UnknownAsset(asset.to_string()))?;
                let returns = shock_returns(inputs.returns(), &[idx], *shock, *window)?;
                let mut shocks = vec![0.0; n];
                shocks[idx] = *shock;
                (inputs.with_returns(returns)?, shocks)
            }
            ScenarioKind::CorrelationBreakdown { rule } => {
                let correlation =
                    break_correlation(inputs.correlation(), *rule).map_err(|e| match e {
                        RiskError::DegenerateInput(msg) => RiskError::degenerate(format!(
                            "{} in scenario '{}'",
                            msg, self.scenario.name
                        )),
                        other => other,
                    })?;
                (inputs.with_correlation(correlation)?, vec![0.0; n])
            }
        };

        debug!(scenario = %self.scenario.name, kind = self.scenario.kind.label(), "scenario applied");

        Ok(AppliedScenario {
            scenario: self.scenario.clone(),
            baseline: inputs,
            stressed,
            asset_shocks,
        })
    }
}

/// A scenario applied to a snapshot, holding the shocked copy.
#[derive(Clone, Debug)]
pub struct AppliedScenario<'a> {
    scenario: StressScenario,
    baseline: &'a RiskInputs,
    stressed: RiskInputs,
    asset_shocks: Vec<f64>,
}

impl<'a> AppliedScenario<'a> {
    /// The scenario that was applied.
    pub fn scenario(&self) -> &StressScenario {
        &self.scenario
    }

    /// Unshocked inputs.
    pub fn baseline(&self) -> &'a RiskInputs {
        self.baseline
    }

    /// Shocked inputs.
    pub fn stressed(&self) -> &RiskInputs {
        &self.stressed
    }

    /// Instantaneous shock per asset, in input order.
    pub fn asset_shocks(&self) -> &[f64] {
        &self.asset_shocks
    }

    /// Scale market-wide shocks by per-asset betas.
    ///
    /// Each asset's shock becomes `β * shock`, floored at a total loss.
    /// Other scenario kinds are returned unchanged.
    ///
    /// # Errors
    /// `DimensionMismatch` if `betas` does not match the asset count.
    pub fn with_betas(mut self, betas: &[f64]) -> RiskResult<Self> {
        if betas.len() != self.asset_shocks.len() {
            return Err(RiskError::dimension_mismatch(
                "scenario betas",
                self.asset_shocks.len(),
                betas.len(),
            ));
        }
        if let ScenarioKind::MarketWide { shock, .. } = self.scenario.kind {
            self.asset_shocks = betas.iter().map(|b| (b * shock).max(-1.0)).collect();
        }
        Ok(self)
    }

    /// Rerun portfolio aggregation on the baseline and shocked inputs.
    pub fn evaluate(&self, weights: &ValidatedWeights) -> RiskResult<StressResult> {
        let aggregator = PortfolioAggregator::new();
        let baseline = aggregator.aggregate(self.baseline, weights)?;
        let stressed = aggregator.aggregate(&self.stressed, weights)?;
        let shock_return: f64 = weights
            .values()
            .iter()
            .zip(&self.asset_shocks)
            .map(|(w, s)| w * s)
            .sum();

        debug!(
            scenario = %self.scenario.name,
            baseline_volatility = baseline.total_volatility,
            stressed_volatility = stressed.total_volatility,
            shock_return,
            "scenario evaluated"
        );

        Ok(StressResult {
            scenario: self.scenario.clone(),
            baseline,
            stressed,
            shock_return,
            asset_shock_returns: weights
                .assets()
                .iter()
                .cloned()
                .zip(self.asset_shocks.iter().copied())
                .collect(),
        })
    }
}

/// Outcome of one stress scenario.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StressResult {
    /// Scenario that produced this result
    pub scenario: StressScenario,
    /// Portfolio risk before the shock
    pub baseline: PortfolioRisk,
    /// Portfolio risk recomputed on the shocked inputs
    pub stressed: PortfolioRisk,
    /// Instantaneous portfolio return implied by the shock `Σ wᵢ sᵢ`
    pub shock_return: f64,
    /// Instantaneous return per asset
    pub asset_shock_returns: Vec<(AssetId, f64)>,
}

impl StressResult {
    /// Change in portfolio volatility.
    pub fn volatility_change(&self) -> f64 {
        self.stressed.total_volatility - self.baseline.total_volatility
    }

    /// Change in diversification benefit.
    pub fn diversification_change(&self) -> f64 {
        self.stressed.diversification_benefit - self.baseline.diversification_benefit
    }

    /// Check whether the shock implies a loss.
    pub fn is_loss(&self) -> bool {
        self.shock_return < 0.0
    }
}
