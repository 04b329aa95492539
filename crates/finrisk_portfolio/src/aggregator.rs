//! Correlation-aware portfolio risk aggregation.
//!
//! Single-asset portfolios short-circuit every computation: volatility is
//! the asset's own, its risk contribution is 1 and there is no
//! diversification. No ratio is ever formed for them.

use crate::inputs::RiskInputs;
use crate::weights::ValidatedWeights;
use finrisk_core::stats::CovarianceMatrix;
use finrisk_core::types::{AssetId, RiskError, RiskResult};
use tracing::debug;

/// Negative diversification within this distance of zero is round-off.
pub const DIVERSIFICATION_TOLERANCE: f64 = 1e-12;

/// Aggregated risk of a weighted portfolio.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioRisk {
    /// Asset order of the contribution vectors
    pub assets: Vec<AssetId>,
    /// Portfolio volatility `√(wᵀΣw)`
    pub total_volatility: f64,
    /// Portfolio variance `wᵀΣw`
    pub total_variance: f64,
    /// Weighted mean return `Σ wᵢ μᵢ`
    pub expected_return: f64,
    /// Fractional risk contributions, summing to 1
    pub risk_contributions: Vec<f64>,
    /// Absolute variance contributions `wᵢ(Σw)ᵢ`, summing to the variance
    pub variance_contributions: Vec<f64>,
    /// `Σ|wᵢ|σᵢ - σₚ`, never negative
    pub diversification_benefit: f64,
}

impl PortfolioRisk {
    /// Risk contribution of a named asset.
    pub fn contribution_of(&self, asset: &str) -> Option<f64> {
        self.assets
            .iter()
            .position(|a| a.as_str() == asset)
            .map(|i| self.risk_contributions[i])
    }
}

fn check_size(weights: &ValidatedWeights, covariance: &CovarianceMatrix) -> RiskResult<()> {
    weights.ensure_aligned(covariance.assets())
}

/// Portfolio volatility `√(wᵀΣw)`.
///
/// A single-asset portfolio returns that asset's own volatility.
///
/// # Errors
/// `DimensionMismatch` / `InvalidWeights` if the weights were validated
/// against a different asset order.
pub fn portfolio_volatility(
    weights: &ValidatedWeights,
    covariance: &CovarianceMatrix,
) -> RiskResult<f64> {
    check_size(weights, covariance)?;
    if weights.is_single_asset() {
        return Ok(covariance.variance(0).sqrt());
    }
    let variance = covariance.quadratic_form(weights.values())?;
    if variance < -DIVERSIFICATION_TOLERANCE {
        return Err(RiskError::degenerate(format!(
            "portfolio variance {} is negative; covariance is not positive semi-definite",
            variance
        )));
    }
    // Round-off can push a near-singular form a hair below zero
    Ok(variance.max(0.0).sqrt())
}

/// Absolute variance contributions `wᵢ(Σw)ᵢ`.
pub fn variance_contributions(
    weights: &ValidatedWeights,
    covariance: &CovarianceMatrix,
) -> RiskResult<Vec<f64>> {
    check_size(weights, covariance)?;
    let sigma_w = covariance.mul_vec(weights.values())?;
    Ok(weights
        .values()
        .iter()
        .zip(&sigma_w)
        .map(|(w, s)| w * s)
        .collect())
}

/// Fractional risk contributions `wᵢ(Σw)ᵢ / σ²ₚ`.
///
/// A single asset contributes exactly 1.
///
/// # Errors
/// `DegenerateInput` if the portfolio variance is zero with two or more
/// assets.
pub fn risk_contribution(
    weights: &ValidatedWeights,
    covariance: &CovarianceMatrix,
) -> RiskResult<Vec<f64>> {
    check_size(weights, covariance)?;
    if weights.is_single_asset() {
        return Ok(vec![1.0]);
    }
    let contributions = variance_contributions(weights, covariance)?;
    let variance: f64 = contributions.iter().sum();
    if !(variance > 0.0) {
        return Err(RiskError::degenerate(
            "portfolio variance is zero; risk contributions undefined",
        ));
    }
    Ok(contributions.iter().map(|c| c / variance).collect())
}

/// Diversification benefit `Σ|wᵢ|σᵢ - σₚ`.
///
/// A single asset has no benefit by definition.
///
/// # Errors
/// - `DimensionMismatch` if `volatilities` does not match the weights
/// - `DegenerateInput` if the benefit is negative beyond round-off
pub fn diversification_benefit(
    weights: &ValidatedWeights,
    volatilities: &[f64],
    portfolio_volatility: f64,
) -> RiskResult<f64> {
    if volatilities.len() != weights.len() {
        return Err(RiskError::dimension_mismatch(
            "diversification volatilities",
            weights.len(),
            volatilities.len(),
        ));
    }
    if weights.is_single_asset() {
        return Ok(0.0);
    }
    let weighted: f64 = weights
        .values()
        .iter()
        .zip(volatilities)
        .map(|(w, s)| w.abs() * s)
        .sum();
    let benefit = weighted - portfolio_volatility;
    if benefit >= 0.0 {
        Ok(benefit)
    } else if benefit >= -DIVERSIFICATION_TOLERANCE {
        Ok(0.0)
    } else {
        Err(RiskError::degenerate(format!(
            "portfolio volatility {} exceeds weighted volatility {}",
            portfolio_volatility, weighted
        )))
    }
}

/// Combines per-asset inputs and validated weights into [`PortfolioRisk`].
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use finrisk_core::types::{PriceSeries, PriceTable, ReturnMode};
/// use finrisk_portfolio::{validate_weights, PortfolioAggregator, PortfolioWeights, RiskInputs, WeightPolicy};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let table = PriceTable::new(vec![
///     PriceSeries::with_daily_index("A", start, vec![100.0, 101.0, 99.0, 102.0]).unwrap(),
///     PriceSeries::with_daily_index("B", start, vec![20.0, 19.5, 20.5, 20.0]).unwrap(),
/// ]).unwrap();
/// let inputs = RiskInputs::from_prices(&table, ReturnMode::Simple).unwrap();
///
/// let weights = PortfolioWeights::new().with("A", 0.5).with("B", 0.5);
/// let weights = validate_weights(&weights, inputs.assets(), &WeightPolicy::default()).unwrap();
///
/// let risk = PortfolioAggregator::new().aggregate(&inputs, &weights).unwrap();
/// let total: f64 = risk.risk_contributions.iter().sum();
/// assert!((total - 1.0).abs() < 1e-9);
/// assert!(risk.diversification_benefit >= 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct PortfolioAggregator;

impl PortfolioAggregator {
    /// Create an aggregator.
    pub fn new() -> Self {
        Self
    }

    /// Aggregate portfolio risk.
    pub fn aggregate(
        &self,
        inputs: &RiskInputs,
        weights: &ValidatedWeights,
    ) -> RiskResult<PortfolioRisk> {
        weights.ensure_aligned(inputs.assets())?;
        let covariance = inputs.covariance();

        let total_volatility = portfolio_volatility(weights, covariance)?;
        let variance_contributions = if weights.is_single_asset() {
            vec![covariance.variance(0)]
        } else {
            variance_contributions(weights, covariance)?
        };
        let total_variance = total_volatility * total_volatility;
        let risk_contributions = risk_contribution(weights, covariance)?;
        let diversification_benefit =
            diversification_benefit(weights, inputs.volatilities(), total_volatility)?;
        let expected_return = weights
            .values()
            .iter()
            .zip(inputs.mean_returns())
            .map(|(w, m)| w * m)
            .sum();

        debug!(
            assets = weights.len(),
            total_volatility,
            diversification_benefit,
            "portfolio risk aggregated"
        );

        Ok(PortfolioRisk {
            assets: weights.assets().to_vec(),
            total_volatility,
            total_variance,
            expected_return,
            risk_contributions,
            variance_contributions,
            diversification_benefit,
        })
    }
}
