//! Beta against a benchmark.

use finrisk_core::stats::{sample_covariance, sample_variance};
use finrisk_core::types::{RiskError, RiskResult};

/// `cov(asset, benchmark) / var(benchmark)`.
///
/// # Errors
/// - `DimensionMismatch` if the series lengths differ
/// - `InsufficientData` for fewer than two observations
/// - `DegenerateInput` if the benchmark has zero variance
///
/// # Examples
/// ```
/// use finrisk_metrics::beta::beta;
///
/// let market = [0.01, -0.02, 0.015, 0.005];
/// let levered: Vec<f64> = market.iter().map(|r| 2.0 * r).collect();
/// assert!((beta(&levered, &market).unwrap() - 2.0).abs() < 1e-12);
/// ```
pub fn beta(asset: &[f64], benchmark: &[f64]) -> RiskResult<f64> {
    let cov = sample_covariance(asset, benchmark)?;
    let var = sample_variance(benchmark)?;
    if var == 0.0 {
        return Err(RiskError::degenerate("benchmark returns have zero variance"));
    }
    Ok(cov / var)
}
