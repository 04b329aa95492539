//! Concentration sweep: shock each holding in turn.

use super::scenario::{ScenarioBounds, StressScenario};
use super::state::StressResult;
use finrisk_core::types::RiskResult;
use finrisk_portfolio::{RiskInputs, ValidatedWeights};

/// Apply the same concentrated shock to every asset in turn.
///
/// Results are in asset order; each one reports the loss from that single
/// asset falling by `shock` over the trailing `window` periods.
///
/// # Errors
/// `ScenarioOutOfBounds` for an invalid shock or window, or the first
/// evaluation error.
pub fn concentration_sweep(
    inputs: &RiskInputs,
    weights: &ValidatedWeights,
    shock: f64,
    window: usize,
    bounds: &ScenarioBounds,
) -> RiskResult<Vec<StressResult>> {
    weights
        .assets()
        .iter()
        .map(|asset| {
            let scenario = StressScenario::concentrated(
                format!("{} {:+.0}%", asset, shock * 100.0),
                asset.clone(),
                shock,
                window,
            );
            scenario.configure(bounds)?.apply(inputs)?.evaluate(weights)
        })
        .collect()
}
