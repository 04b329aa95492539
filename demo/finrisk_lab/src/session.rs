//! Validated portfolio snapshot shared by the workflows.
//!
//! A session holds the full price table (benchmark included), the risk
//! inputs of the held assets and the weights validated against them.
//! Everything is immutable after construction.

use crate::config::LabConfig;
use crate::error::LabError;
use finrisk_core::returns::compute_returns;
use finrisk_core::types::{PriceTable, RiskError};
use finrisk_metrics::beta::beta;
use finrisk_portfolio::{validate_weights, RiskInputs, ValidatedWeights};
use tracing::{debug, info};

/// Prices, risk inputs and validated weights of one portfolio.
#[derive(Debug, Clone)]
pub struct PortfolioSession {
    prices: PriceTable,
    held: PriceTable,
    inputs: RiskInputs,
    weights: ValidatedWeights,
    benchmark: Option<String>,
}

impl PortfolioSession {
    /// Build a session from a loaded price table.
    ///
    /// A benchmark column that carries no weight is kept for beta but
    /// left out of the portfolio universe.
    ///
    /// # Errors
    /// - `UnknownAsset` if the benchmark is not a price column
    /// - Any return, statistics or weight validation error
    pub fn from_prices(config: &LabConfig, prices: PriceTable) -> Result<Self, LabError> {
        if let Some(benchmark) = &config.benchmark {
            if prices.get(benchmark).is_none() {
                return Err(RiskError::UnknownAsset(benchmark.clone()).into());
            }
        }

        let held = match &config.benchmark {
            Some(benchmark) if !config.weights.contains_key(benchmark) => PriceTable::new(
                prices
                    .series()
                    .iter()
                    .filter(|s| s.asset().as_str() != benchmark)
                    .cloned()
                    .collect(),
            )?,
            _ => prices.clone(),
        };

        let inputs = RiskInputs::from_prices(&held, config.return_mode)?;
        let weights = validate_weights(
            &config.portfolio_weights(),
            inputs.assets(),
            &config.weight_policy(),
        )?;

        info!(
            assets = inputs.n_assets(),
            periods = inputs.returns().len(),
            benchmark = config.benchmark.as_deref().unwrap_or("none"),
            "portfolio session ready"
        );

        Ok(Self {
            prices,
            held,
            inputs,
            weights,
            benchmark: config.benchmark.clone(),
        })
    }

    /// Load prices as configured and build a session.
    pub fn load(config: &LabConfig) -> Result<Self, LabError> {
        let prices = crate::data::load_prices(config)?;
        Self::from_prices(config, prices)
    }

    /// Every loaded price column.
    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    /// Price columns of the held assets.
    pub fn held_prices(&self) -> &PriceTable {
        &self.held
    }

    /// Risk inputs of the held assets.
    pub fn inputs(&self) -> &RiskInputs {
        &self.inputs
    }

    /// Validated weights, ordered like [`RiskInputs::assets`].
    pub fn weights(&self) -> &ValidatedWeights {
        &self.weights
    }

    /// Benchmark column name.
    pub fn benchmark(&self) -> Option<&str> {
        self.benchmark.as_deref()
    }

    /// Beta of every held asset against the benchmark, in input order.
    ///
    /// Returns `None` without a benchmark.
    pub fn betas(&self) -> Result<Option<Vec<f64>>, LabError> {
        let Some(name) = self.benchmark.as_deref() else {
            return Ok(None);
        };
        let series = self
            .prices
            .get(name)
            .ok_or_else(|| RiskError::UnknownAsset(name.to_string()))?;
        let benchmark_returns = compute_returns(series, self.inputs.returns().mode())?;

        let returns = self.inputs.returns();
        let betas = returns
            .assets()
            .iter()
            .enumerate()
            .map(|(i, asset)| {
                beta(returns.column(i), benchmark_returns.values())
                    .map_err(|e| e.for_asset(asset.as_str()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(benchmark = name, betas = ?betas, "betas computed");
        Ok(Some(betas))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use finrisk_core::types::PriceSeries;

    fn table() -> PriceTable {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceTable::new(vec![
            PriceSeries::with_daily_index("A", start, vec![100.0, 102.0, 99.0, 103.0, 104.0])
                .unwrap(),
            PriceSeries::with_daily_index("B", start, vec![50.0, 50.5, 49.0, 50.0, 51.5]).unwrap(),
            PriceSeries::with_daily_index("MKT", start, vec![10.0, 10.1, 9.9, 10.2, 10.3])
                .unwrap(),
        ])
        .unwrap()
    }

    fn config(weights: &[(&str, f64)], benchmark: Option<&str>) -> LabConfig {
        let mut config = LabConfig::default();
        config.weights = weights.iter().map(|(a, w)| (a.to_string(), *w)).collect();
        config.benchmark = benchmark.map(str::to_string);
        config
    }

    #[test]
    fn test_unweighted_benchmark_is_excluded_from_universe() {
        let session =
            PortfolioSession::from_prices(&config(&[("A", 0.5), ("B", 0.5)], Some("MKT")), table())
                .unwrap();
        assert_eq!(session.inputs().n_assets(), 2);
        assert_eq!(session.prices().n_assets(), 3);
        assert_eq!(session.weights().values(), &[0.5, 0.5]);

        let betas = session.betas().unwrap().unwrap();
        assert_eq!(betas.len(), 2);
        assert!(betas.iter().all(|b| b.is_finite()));
    }

    #[test]
    fn test_benchmark_beta_against_itself_is_one() {
        let session = PortfolioSession::from_prices(
            &config(&[("A", 0.4), ("B", 0.4), ("MKT", 0.2)], Some("MKT")),
            table(),
        )
        .unwrap();
        let betas = session.betas().unwrap().unwrap();
        assert_relative_eq!(betas[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_no_benchmark_no_betas() {
        let session = PortfolioSession::from_prices(
            &config(&[("A", 0.3), ("B", 0.3), ("MKT", 0.4)], None),
            table(),
        )
        .unwrap();
        assert!(session.betas().unwrap().is_none());
    }

    #[test]
    fn test_missing_weight_is_rejected() {
        let err = PortfolioSession::from_prices(&config(&[("A", 1.0)], Some("MKT")), table())
            .unwrap_err();
        assert!(matches!(err, LabError::Risk(RiskError::InvalidWeights(_))));
    }

    #[test]
    fn test_unknown_benchmark() {
        let err = PortfolioSession::from_prices(
            &config(&[("A", 0.5), ("B", 0.5)], Some("SPX")),
            table(),
        )
        .unwrap_err();
        assert!(matches!(err, LabError::Risk(RiskError::UnknownAsset(_))));
    }
}
