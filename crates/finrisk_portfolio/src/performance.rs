//! Historical performance of the weighted portfolio.
//!
//! Per-period portfolio returns are `Σ wᵢ rᵢ,t` on simple returns. Log
//! returns are converted to simple returns first so the weighted sum stays
//! exact. The value series starts at 1.0 and compounds those returns.

use crate::weights::ValidatedWeights;
use finrisk_core::stats::{mean, volatility, Annualisation};
use finrisk_core::types::{ReturnMode, ReturnTable, RiskResult};
use finrisk_metrics::drawdown::{drawdown_series, max_drawdown_period, DrawdownPeriod};
use finrisk_metrics::sharpe::{annualised_sharpe_ratio, SharpeRatio};

/// Realised performance of a portfolio over the return table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioPerformance {
    /// Simple portfolio return per period
    pub returns: Vec<f64>,
    /// Portfolio value, one point per period plus the initial 1.0
    pub value_series: Vec<f64>,
    /// Compounded total return `Π(1 + r) - 1`
    pub total_return: f64,
    /// Annualised mean return
    pub annualised_return: f64,
    /// Annualised volatility of portfolio returns
    pub annualised_volatility: f64,
    /// Annualised Sharpe ratio at the given risk-free rate
    pub sharpe_ratio: SharpeRatio,
    /// Drawdown of the value series
    pub drawdown: Vec<f64>,
    /// Worst drawdown and where it occurred
    pub max_drawdown: DrawdownPeriod,
}

/// Weighted portfolio return per period.
///
/// # Errors
/// `DimensionMismatch` / `InvalidWeights` if the weights were not
/// validated against the table's assets.
pub fn portfolio_returns(
    weights: &ValidatedWeights,
    returns: &ReturnTable,
) -> RiskResult<Vec<f64>> {
    weights.ensure_aligned(&returns.assets())?;
    let simple = |r: f64| match returns.mode() {
        ReturnMode::Simple => r,
        ReturnMode::Log => r.exp() - 1.0,
    };
    Ok((0..returns.len())
        .map(|t| {
            weights
                .values()
                .iter()
                .enumerate()
                .map(|(i, w)| w * simple(returns.column(i)[t]))
                .sum()
        })
        .collect())
}

/// Value of 1.0 invested at the start, compounded by `returns`.
pub fn value_series(returns: &[f64]) -> Vec<f64> {
    let mut value = 1.0;
    std::iter::once(1.0)
        .chain(returns.iter().map(|r| {
            value *= 1.0 + r;
            value
        }))
        .collect()
}

/// Compounded total return `Π(1 + r) - 1`.
pub fn total_return(returns: &[f64]) -> f64 {
    returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

/// Full performance summary of the portfolio.
///
/// `risk_free_rate` is per period.
///
/// # Errors
/// - `InsufficientData` with fewer than two periods
/// - `DegenerateInput` if the portfolio value reaches zero
pub fn portfolio_performance(
    weights: &ValidatedWeights,
    returns: &ReturnTable,
    risk_free_rate: f64,
    annualisation: &Annualisation,
) -> RiskResult<PortfolioPerformance> {
    let period_returns = portfolio_returns(weights, returns)?;
    let vol = volatility(&period_returns)?;
    let mean_return = mean(&period_returns)?;
    let values = value_series(&period_returns);
    let drawdown = drawdown_series(&values)?;
    let max_drawdown = max_drawdown_period(&values)?;

    Ok(PortfolioPerformance {
        total_return: total_return(&period_returns),
        annualised_return: annualisation.mean_return(mean_return),
        annualised_volatility: annualisation.volatility(vol),
        sharpe_ratio: annualised_sharpe_ratio(mean_return, vol, risk_free_rate, annualisation),
        returns: period_returns,
        value_series: values,
        drawdown,
        max_drawdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::{validate_weights, PortfolioWeights, WeightPolicy};
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};
    use finrisk_core::types::ReturnSeries;

    fn table(mode: ReturnMode, a: Vec<f64>, b: Vec<f64>) -> ReturnTable {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let dates: Vec<NaiveDate> = (0..a.len()).map(|i| start + Duration::days(i as i64)).collect();
        ReturnTable::new(vec![
            ReturnSeries::new("A", mode, dates.clone(), a).unwrap(),
            ReturnSeries::new("B", mode, dates, b).unwrap(),
        ])
        .unwrap()
    }

    fn weights(table: &ReturnTable, a: f64, b: f64) -> ValidatedWeights {
        let raw = PortfolioWeights::new().with("A", a).with("B", b);
        validate_weights(&raw, &table.assets(), &WeightPolicy::default()).unwrap()
    }

    #[test]
    fn test_weighted_returns_and_compounding() {
        let t = table(ReturnMode::Simple, vec![0.10, -0.10], vec![0.0, 0.20]);
        let w = weights(&t, 0.5, 0.5);
        let r = portfolio_returns(&w, &t).unwrap();
        assert_relative_eq!(r[0], 0.05, epsilon = 1e-15);
        assert_relative_eq!(r[1], 0.05, epsilon = 1e-15);

        let v = value_series(&r);
        assert_eq!(v.len(), 3);
        assert_eq!(v[0], 1.0);
        assert_relative_eq!(v[2], 1.05 * 1.05, epsilon = 1e-15);
        assert_relative_eq!(total_return(&r), 1.05 * 1.05 - 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_log_returns_are_converted() {
        let t = table(
            ReturnMode::Log,
            vec![(1.1_f64).ln(), (0.9_f64).ln()],
            vec![(1.1_f64).ln(), (0.9_f64).ln()],
        );
        let w = weights(&t, 0.5, 0.5);
        let r = portfolio_returns(&w, &t).unwrap();
        assert_relative_eq!(r[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(r[1], -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_performance_drawdown() {
        let t = table(
            ReturnMode::Simple,
            vec![0.1, -0.2, 0.05, 0.0],
            vec![0.1, -0.2, 0.05, 0.0],
        );
        let w = weights(&t, 0.3, 0.7);
        let perf = portfolio_performance(&w, &t, 0.0, &Annualisation::default()).unwrap();

        assert_eq!(perf.value_series.len(), 5);
        assert_eq!(perf.drawdown.len(), 5);
        assert_relative_eq!(perf.max_drawdown.depth, -0.2, epsilon = 1e-12);
        assert_eq!((perf.max_drawdown.peak, perf.max_drawdown.trough), (1, 2));
        assert!(perf.sharpe_ratio.is_defined());
    }
}
