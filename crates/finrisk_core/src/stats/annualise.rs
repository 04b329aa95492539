//! Annualisation of per-period statistics.

use crate::types::{RiskError, RiskResult};

/// Trading days per year used when no other frequency is configured.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Scales per-period statistics to annual figures.
///
/// Volatility scales with `√P`, mean return with `P`.
///
/// # Examples
/// ```
/// use finrisk_core::stats::Annualisation;
///
/// let ann = Annualisation::default();
/// assert_eq!(ann.periods_per_year(), 252.0);
/// assert!((ann.mean_return(0.001) - 0.252).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Annualisation {
    periods_per_year: f64,
}

impl Annualisation {
    /// Create with a custom number of periods per year.
    ///
    /// # Errors
    /// `DegenerateInput` if `periods_per_year` is not a positive finite number.
    pub fn new(periods_per_year: f64) -> RiskResult<Self> {
        if !periods_per_year.is_finite() || periods_per_year <= 0.0 {
            return Err(RiskError::degenerate(format!(
                "periods per year must be positive, got {}",
                periods_per_year
            )));
        }
        Ok(Self { periods_per_year })
    }

    /// Number of periods per year.
    pub fn periods_per_year(&self) -> f64 {
        self.periods_per_year
    }

    /// `√P`.
    #[inline]
    pub fn sqrt_factor(&self) -> f64 {
        self.periods_per_year.sqrt()
    }

    /// Annualise a per-period volatility.
    #[inline]
    pub fn volatility(&self, vol: f64) -> f64 {
        vol * self.sqrt_factor()
    }

    /// Annualise a per-period mean return.
    #[inline]
    pub fn mean_return(&self, mean: f64) -> f64 {
        mean * self.periods_per_year
    }

    /// Annualise a series of per-period volatilities.
    pub fn volatility_series(&self, values: &[f64]) -> Vec<f64> {
        let f = self.sqrt_factor();
        values.iter().map(|v| v * f).collect()
    }
}

impl Default for Annualisation {
    fn default() -> Self {
        Self {
            periods_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}
