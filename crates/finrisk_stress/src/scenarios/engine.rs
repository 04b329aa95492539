//! Stress execution engine.
//!
//! Registers validated scenarios, evaluates them against one snapshot and
//! portfolio, and keeps the results for worst-case queries.

use super::presets::PresetScenarioType;
use super::scenario::{ScenarioBounds, StressScenario};
use super::state::{ConfiguredScenario, StressResult};
use finrisk_core::types::RiskResult;
use finrisk_metrics::parallel::ParallelConfig;
use finrisk_portfolio::{RiskInputs, ValidatedWeights};
use std::cmp::Ordering;
use tracing::{info, warn};

/// Engine for executing stress scenarios against a portfolio.
///
/// Scenarios are independent, so [`StressEngine::run_all`] evaluates them
/// in parallel once their number reaches the configured threshold. Results
/// are kept in registration order either way.
#[derive(Clone, Debug, Default)]
pub struct StressEngine {
    bounds: ScenarioBounds,
    parallel: ParallelConfig,
    betas: Option<Vec<f64>>,
    scenarios: Vec<ConfiguredScenario>,
    results: Vec<StressResult>,
}

impl StressEngine {
    /// Create an engine with default bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom parameter bounds for scenarios added afterwards.
    pub fn with_bounds(mut self, bounds: ScenarioBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the parallel execution policy.
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Scale market-wide shocks by per-asset betas (input order).
    pub fn with_betas(mut self, betas: Vec<f64>) -> Self {
        self.betas = Some(betas);
        self
    }

    /// Validate and register a scenario.
    ///
    /// # Errors
    /// `ScenarioOutOfBounds` if a parameter is outside the bounds.
    pub fn add_scenario(&mut self, scenario: StressScenario) -> RiskResult<()> {
        let configured = scenario.configure(&self.bounds)?;
        self.scenarios.push(configured);
        Ok(())
    }

    /// Validate and register several scenarios; stops at the first failure.
    pub fn add_scenarios(
        &mut self,
        scenarios: impl IntoIterator<Item = StressScenario>,
    ) -> RiskResult<()> {
        scenarios
            .into_iter()
            .try_for_each(|scenario| self.add_scenario(scenario))
    }

    /// Register preset scenarios built for `weights`.
    pub fn add_presets(
        &mut self,
        presets: &[PresetScenarioType],
        weights: &ValidatedWeights,
    ) -> RiskResult<()> {
        self.add_scenarios(presets.iter().map(|p| p.build(weights)))
    }

    /// Get registered scenarios.
    pub fn scenarios(&self) -> &[ConfiguredScenario] {
        &self.scenarios
    }

    /// Get scenario count.
    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }

    fn evaluate(
        &self,
        scenario: &ConfiguredScenario,
        inputs: &RiskInputs,
        weights: &ValidatedWeights,
    ) -> RiskResult<StressResult> {
        let applied = scenario.apply(inputs)?;
        let applied = match &self.betas {
            Some(betas) => applied.with_betas(betas)?,
            None => applied,
        };
        applied.evaluate(weights)
    }

    /// Evaluate one scenario without recording the result.
    pub fn run_scenario(
        &self,
        scenario: &ConfiguredScenario,
        inputs: &RiskInputs,
        weights: &ValidatedWeights,
    ) -> RiskResult<StressResult> {
        self.evaluate(scenario, inputs, weights)
    }

    /// Evaluate every registered scenario and record the results.
    ///
    /// Previous results are replaced. On error nothing is recorded.
    pub fn run_all(
        &mut self,
        inputs: &RiskInputs,
        weights: &ValidatedWeights,
    ) -> RiskResult<&[StressResult]> {
        if inputs.correlation().is_degenerate() {
            warn!(
                assets = ?inputs.correlation().degenerate_assets(),
                "stressing inputs with zero-variance assets"
            );
        }
        info!(
            scenarios = self.scenarios.len(),
            parallel = self.parallel.should_parallelize(self.scenarios.len()),
            "running stress scenarios"
        );

        let results = self
            .parallel
            .try_map(&self.scenarios, |s| self.evaluate(s, inputs, weights))?;
        self.results = results;
        Ok(&self.results)
    }

    /// Get all results.
    pub fn results(&self) -> &[StressResult] {
        &self.results
    }

    /// Result with the most negative instantaneous portfolio return.
    pub fn worst_case(&self) -> Option<&StressResult> {
        self.results.iter().min_by(|a, b| {
            a.shock_return
                .partial_cmp(&b.shock_return)
                .unwrap_or(Ordering::Equal)
        })
    }

    /// Result with the highest stressed portfolio volatility.
    pub fn worst_case_by_volatility(&self) -> Option<&StressResult> {
        self.results.iter().max_by(|a, b| {
            a.stressed
                .total_volatility
                .partial_cmp(&b.stressed.total_volatility)
                .unwrap_or(Ordering::Equal)
        })
    }

    /// Clear all results.
    pub fn clear_results(&mut self) {
        self.results.clear();
    }

    /// Clear scenarios and results.
    pub fn clear(&mut self) {
        self.scenarios.clear();
        self.results.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::CorrelationRule;
    use chrono::NaiveDate;
    use finrisk_core::stats::CorrelationMatrix;
    use finrisk_core::types::{PriceSeries, PriceTable, ReturnMode, RiskError};
    use finrisk_portfolio::{validate_weights, PortfolioWeights, WeightPolicy};

    fn fixture() -> (RiskInputs, ValidatedWeights) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let table = PriceTable::new(vec![
            PriceSeries::with_daily_index("A", start, vec![100.0, 101.0, 99.5, 102.0, 101.0])
                .unwrap(),
            PriceSeries::with_daily_index("B", start, vec![40.0, 40.4, 39.0, 39.5, 41.0]).unwrap(),
            PriceSeries::with_daily_index("C", start, vec![10.0, 9.9, 10.1, 10.0, 10.2]).unwrap(),
        ])
        .unwrap();
        let inputs = RiskInputs::from_prices(&table, ReturnMode::Simple).unwrap();
        let raw = PortfolioWeights::new()
            .with("A", 0.5)
            .with("B", 0.3)
            .with("C", 0.2);
        let weights = validate_weights(&raw, inputs.assets(), &WeightPolicy::default()).unwrap();
        (inputs, weights)
    }

    #[test]
    fn test_engine_new() {
        let engine = StressEngine::new();
        assert_eq!(engine.scenario_count(), 0);
        assert!(engine.worst_case().is_none());
    }

    #[test]
    fn test_add_scenario_validates() {
        let mut engine = StressEngine::new();
        assert!(engine
            .add_scenario(StressScenario::market_wide("ok", -0.1, 1))
            .is_ok());
        assert!(matches!(
            engine.add_scenario(StressScenario::market_wide("bad", 0.5, 1)),
            Err(RiskError::ScenarioOutOfBounds { .. })
        ));
        assert_eq!(engine.scenario_count(), 1);
    }

    #[test]
    fn test_run_all_and_worst_case() {
        let (inputs, weights) = fixture();
        let mut engine = StressEngine::new();
        engine
            .add_presets(&PresetScenarioType::all(), &weights)
            .unwrap();

        let results = engine.run_all(&inputs, &weights).unwrap();
        assert_eq!(results.len(), 5);
        assert_eq!(results[0].scenario.name, "Market -20%");

        let worst = engine.worst_case().unwrap();
        assert_eq!(worst.scenario.name, "Market -30%");
        assert!(engine.worst_case_by_volatility().is_some());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (inputs, weights) = fixture();
        let scenarios: Vec<StressScenario> = (1..=12)
            .map(|k| StressScenario::market_wide(format!("m{}", k), -0.05 * k as f64, 1 + k % 3))
            .chain(std::iter::once(StressScenario::correlation_breakdown(
                "amp",
                CorrelationRule::Amplify(2.0),
            )))
            .collect();

        let mut par = StressEngine::new().with_parallel(ParallelConfig::new(1));
        par.add_scenarios(scenarios.clone()).unwrap();
        let mut seq = StressEngine::new().with_parallel(ParallelConfig::sequential());
        seq.add_scenarios(scenarios).unwrap();

        assert_eq!(
            par.run_all(&inputs, &weights).unwrap(),
            seq.run_all(&inputs, &weights).unwrap()
        );
    }

    #[test]
    fn test_betas_applied_to_market_scenarios() {
        let (inputs, weights) = fixture();
        let mut engine = StressEngine::new().with_betas(vec![1.2, 0.8, 0.0]);
        engine
            .add_scenario(StressScenario::market_wide("Crash", -0.25, 1))
            .unwrap();
        let results = engine.run_all(&inputs, &weights).unwrap();
        let expected = 0.5 * 1.2 * -0.25 + 0.3 * 0.8 * -0.25;
        assert!((results[0].shock_return - expected).abs() < 1e-12);
    }

    #[test]
    fn test_failed_run_records_nothing() {
        let (inputs, weights) = fixture();
        let mut engine = StressEngine::new();
        engine
            .add_scenario(StressScenario::concentrated("missing", "ZZZ", -0.2, 1))
            .unwrap();
        assert!(engine.run_all(&inputs, &weights).is_err());
        assert!(engine.results().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut engine = StressEngine::new();
        engine
            .add_scenario(StressScenario::market_wide("m", -0.1, 1))
            .unwrap();
        engine.clear();
        assert_eq!(engine.scenario_count(), 0);
    }

    #[test]
    fn test_amplify_on_negative_correlations_names_the_scenario() {
        let (inputs, weights) = fixture();
        let correlation = CorrelationMatrix::from_rows(
            inputs.assets().to_vec(),
            vec![
                vec![1.0, -0.63, -0.63],
                vec![-0.63, 1.0, -0.2],
                vec![-0.63, -0.2, 1.0],
            ],
        )
        .unwrap();
        let inputs = inputs.with_correlation(correlation).unwrap();

        let mut engine = StressEngine::new();
        engine
            .add_presets(&PresetScenarioType::all(), &weights)
            .unwrap();
        match engine.run_all(&inputs, &weights) {
            Err(RiskError::DegenerateInput(msg)) => {
                assert!(msg.contains(PresetScenarioType::CorrelationAmplify.name()));
                assert!(msg.contains("positive semi-definite"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(engine.results().is_empty());

        let rest: Vec<_> = PresetScenarioType::all()
            .into_iter()
            .filter(|p| *p != PresetScenarioType::CorrelationAmplify)
            .collect();
        engine.clear();
        engine.add_presets(&rest, &weights).unwrap();
        let results = engine.run_all(&inputs, &weights).unwrap();
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.stressed.total_variance >= 0.0));
    }
}
