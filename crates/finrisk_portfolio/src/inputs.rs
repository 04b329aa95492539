//! Immutable risk inputs consumed by the aggregator.
//!
//! A [`RiskInputs`] snapshot bundles everything the portfolio math needs
//! for one aligned return table. Stress scenarios never edit a snapshot;
//! they derive a new one with [`RiskInputs::with_returns`] or
//! [`RiskInputs::with_correlation`].

use finrisk_core::returns::compute_return_table;
use finrisk_core::stats::{
    correlation_matrix, covariance_matrix, mean, volatility, CorrelationMatrix, CovarianceMatrix,
};
use finrisk_core::types::{AssetId, PriceTable, ReturnMode, ReturnTable, RiskResult};
use tracing::{debug, warn};

/// Snapshot of per-asset statistics and the dependence structure.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RiskInputs {
    returns: ReturnTable,
    volatilities: Vec<f64>,
    mean_returns: Vec<f64>,
    correlation: CorrelationMatrix,
    covariance: CovarianceMatrix,
}

impl RiskInputs {
    /// Build inputs from an aligned return table.
    ///
    /// Zero-variance assets are allowed; their correlations carry the
    /// degenerate sentinel and are logged.
    ///
    /// # Errors
    /// `InsufficientData` if the table has fewer than two periods.
    pub fn from_returns(returns: ReturnTable) -> RiskResult<Self> {
        let mut volatilities = Vec::with_capacity(returns.n_assets());
        let mut mean_returns = Vec::with_capacity(returns.n_assets());
        for (i, asset) in returns.assets().iter().enumerate() {
            let column = returns.column(i);
            volatilities.push(volatility(column).map_err(|e| e.for_asset(asset.as_str()))?);
            mean_returns.push(mean(column).map_err(|e| e.for_asset(asset.as_str()))?);
        }

        let correlation = correlation_matrix(&returns)?;
        for asset in correlation.degenerate_assets() {
            warn!(asset = %asset, "zero-variance returns; correlations set to sentinel");
        }
        let covariance = covariance_matrix(&volatilities, &correlation)?;

        debug!(
            assets = returns.n_assets(),
            periods = returns.len(),
            "risk inputs built"
        );

        Ok(Self {
            returns,
            volatilities,
            mean_returns,
            correlation,
            covariance,
        })
    }

    /// Build inputs from an aligned price table.
    pub fn from_prices(prices: &PriceTable, mode: ReturnMode) -> RiskResult<Self> {
        Self::from_returns(compute_return_table(prices, mode)?)
    }

    /// New snapshot with replaced returns; every statistic is recomputed.
    pub fn with_returns(&self, returns: ReturnTable) -> RiskResult<Self> {
        Self::from_returns(returns)
    }

    /// New snapshot with an overridden correlation matrix.
    ///
    /// Returns and volatilities are kept; covariance is rebuilt from the
    /// new correlation.
    pub fn with_correlation(&self, correlation: CorrelationMatrix) -> RiskResult<Self> {
        let covariance = covariance_matrix(&self.volatilities, &correlation)?;
        Ok(Self {
            returns: self.returns.clone(),
            volatilities: self.volatilities.clone(),
            mean_returns: self.mean_returns.clone(),
            correlation,
            covariance,
        })
    }

    /// Asset order shared by every field.
    pub fn assets(&self) -> &[AssetId] {
        self.correlation.assets()
    }

    /// Number of assets.
    pub fn n_assets(&self) -> usize {
        self.volatilities.len()
    }

    /// Position of an asset.
    pub fn position(&self, asset: &str) -> Option<usize> {
        self.assets().iter().position(|a| a.as_str() == asset)
    }

    /// Underlying return table.
    pub fn returns(&self) -> &ReturnTable {
        &self.returns
    }

    /// Per-period volatilities.
    pub fn volatilities(&self) -> &[f64] {
        &self.volatilities
    }

    /// Per-period mean returns.
    pub fn mean_returns(&self) -> &[f64] {
        &self.mean_returns
    }

    /// Correlation matrix.
    pub fn correlation(&self) -> &CorrelationMatrix {
        &self.correlation
    }

    /// Covariance matrix.
    pub fn covariance(&self) -> &CovarianceMatrix {
        &self.covariance
    }
}
