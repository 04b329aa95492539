//! Per-asset statistics.
//!
//! [`AssetStatsCalculator`] turns one price series (or every column of an
//! aligned table) into an [`AssetStats`] record. Each asset is computed
//! independently, so whole tables can be fanned out across threads.

use crate::beta::beta;
use crate::drawdown::max_drawdown;
use crate::parallel::ParallelConfig;
use crate::sharpe::{annualised_sharpe_ratio, sharpe_ratio, SharpeRatio};
use finrisk_core::returns::compute_returns;
use finrisk_core::stats::{mean, rolling_volatility, volatility, Annualisation};
use finrisk_core::types::{
    AssetId, PriceSeries, PriceTable, ReturnMode, ReturnSeries, RiskError, RiskResult,
};

/// Default rolling window (one trading month).
pub const DEFAULT_ROLLING_WINDOW: usize = 21;

/// Statistics of a single asset.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetStats {
    /// Asset identifier
    pub asset: AssetId,
    /// Number of return observations
    pub observations: usize,
    /// Per-period volatility (`>= 0`)
    pub volatility: f64,
    /// Rolling per-period volatility, one value per full window
    pub rolling_volatility: Vec<f64>,
    /// Per-period mean return
    pub mean_return: f64,
    /// Maximum drawdown of the price path (`<= 0`)
    pub max_drawdown: f64,
    /// Per-period Sharpe ratio
    pub sharpe_ratio: SharpeRatio,
    /// Annualised volatility
    pub annualised_volatility: f64,
    /// Annualised mean return
    pub annualised_return: f64,
    /// Annualised Sharpe ratio
    pub annualised_sharpe: SharpeRatio,
    /// Beta against the configured benchmark, if any
    pub beta: Option<f64>,
}

/// Analysis parameters passed explicitly to the calculator.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisConfig {
    /// Simple or log returns
    pub return_mode: ReturnMode,
    /// Rolling volatility window
    pub rolling_window: usize,
    /// Risk-free rate per period
    pub risk_free_rate: f64,
    /// Annualisation convention
    pub annualisation: Annualisation,
    /// Parallel execution policy for whole tables
    pub parallel: ParallelConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            return_mode: ReturnMode::Simple,
            rolling_window: DEFAULT_ROLLING_WINDOW,
            risk_free_rate: 0.0,
            annualisation: Annualisation::default(),
            parallel: ParallelConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Set the return mode.
    pub fn with_return_mode(mut self, mode: ReturnMode) -> Self {
        self.return_mode = mode;
        self
    }

    /// Set the rolling window.
    pub fn with_rolling_window(mut self, window: usize) -> Self {
        self.rolling_window = window;
        self
    }

    /// Set the per-period risk-free rate.
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// Set the annualisation convention.
    pub fn with_annualisation(mut self, annualisation: Annualisation) -> Self {
        self.annualisation = annualisation;
        self
    }

    /// Set the parallel execution policy.
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Computes [`AssetStats`] under a fixed [`AnalysisConfig`].
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use finrisk_core::types::PriceSeries;
/// use finrisk_metrics::asset_stats::{AnalysisConfig, AssetStatsCalculator};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let prices = PriceSeries::with_daily_index("A", start, vec![100.0, 90.0, 95.0, 80.0]).unwrap();
///
/// let calc = AssetStatsCalculator::new(AnalysisConfig::default().with_rolling_window(2));
/// let stats = calc.compute(&prices, None).unwrap();
/// assert!((stats.max_drawdown + 0.2).abs() < 1e-12);
/// assert_eq!(stats.rolling_volatility.len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct AssetStatsCalculator {
    config: AnalysisConfig,
}

impl AssetStatsCalculator {
    /// Create a calculator.
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Statistics for one asset.
    ///
    /// Errors are tagged with the asset id.
    pub fn compute(
        &self,
        prices: &PriceSeries,
        benchmark: Option<&ReturnSeries>,
    ) -> RiskResult<AssetStats> {
        let returns = compute_returns(prices, self.config.return_mode)?;
        self.compute_from_returns(prices, &returns, benchmark)
            .map_err(|e| e.for_asset(prices.asset().as_str()))
    }

    fn compute_from_returns(
        &self,
        prices: &PriceSeries,
        returns: &ReturnSeries,
        benchmark: Option<&ReturnSeries>,
    ) -> RiskResult<AssetStats> {
        let values = returns.values();
        let vol = volatility(values)?;
        let mean_return = mean(values)?;
        let rolling = rolling_volatility(values, self.config.rolling_window)?.to_vec();
        let mdd = max_drawdown(prices.prices())?;
        let beta = benchmark.map(|b| beta(values, b.values())).transpose()?;

        let ann = &self.config.annualisation;
        let rf = self.config.risk_free_rate;

        Ok(AssetStats {
            asset: prices.asset().clone(),
            observations: returns.len(),
            volatility: vol,
            rolling_volatility: rolling,
            mean_return,
            max_drawdown: mdd,
            sharpe_ratio: sharpe_ratio(mean_return, vol, rf),
            annualised_volatility: ann.volatility(vol),
            annualised_return: ann.mean_return(mean_return),
            annualised_sharpe: annualised_sharpe_ratio(mean_return, vol, rf, ann),
            beta,
        })
    }

    /// Statistics for every asset of a table, in table order.
    ///
    /// When `benchmark` names a column, every asset also gets its beta
    /// against that column.
    ///
    /// # Errors
    /// - `UnknownAsset` if the benchmark is not in the table
    /// - The first per-asset error in table order
    pub fn compute_all(
        &self,
        table: &PriceTable,
        benchmark: Option<&str>,
    ) -> RiskResult<Vec<AssetStats>> {
        let benchmark_returns = match benchmark {
            Some(name) => {
                let series = table
                    .get(name)
                    .ok_or_else(|| RiskError::UnknownAsset(name.to_string()))?;
                Some(compute_returns(series, self.config.return_mode)?)
            }
            None => None,
        };

        self.config
            .parallel
            .try_map(table.series(), |series| {
                self.compute(series, benchmark_returns.as_ref())
            })
    }
}
