//! Sharpe ratio.
//!
//! A zero (or otherwise unusable) volatility makes the ratio undefined. The
//! undefined state is an explicit variant rather than `0`, `inf` or NaN.

use finrisk_core::stats::Annualisation;
use finrisk_core::types::{RiskError, RiskResult};
use std::fmt;

/// Risk-adjusted excess return.
///
/// # Examples
/// ```
/// use finrisk_metrics::sharpe::{sharpe_ratio, SharpeRatio};
///
/// assert_eq!(sharpe_ratio(0.5, 0.25, 0.0), SharpeRatio::Defined(2.0));
/// assert!(!sharpe_ratio(0.5, 0.0, 0.0).is_defined());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "state", content = "value", rename_all = "lowercase"))]
pub enum SharpeRatio {
    /// Finite ratio
    Defined(f64),
    /// Volatility was zero
    Undefined,
}

impl SharpeRatio {
    /// Check whether the ratio has a value.
    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Defined(_))
    }

    /// The ratio as an option.
    pub fn as_option(&self) -> Option<f64> {
        match self {
            Self::Defined(v) => Some(*v),
            Self::Undefined => None,
        }
    }

    /// The ratio, or `UndefinedMetric` for callers that must fail.
    pub fn value(&self) -> RiskResult<f64> {
        self.as_option().ok_or_else(|| {
            RiskError::undefined_metric("sharpe_ratio", "volatility is zero")
        })
    }
}

impl fmt::Display for SharpeRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defined(v) => write!(f, "{:.4}", v),
            Self::Undefined => write!(f, "undefined"),
        }
    }
}

/// `(mean - risk_free) / volatility`, all per period.
pub fn sharpe_ratio(mean_return: f64, volatility: f64, risk_free: f64) -> SharpeRatio {
    if !(volatility > 0.0) || !volatility.is_finite() {
        return SharpeRatio::Undefined;
    }
    let ratio = (mean_return - risk_free) / volatility;
    if ratio.is_finite() {
        SharpeRatio::Defined(ratio)
    } else {
        SharpeRatio::Undefined
    }
}

/// Annualised Sharpe ratio from per-period inputs.
///
/// Equals the per-period ratio scaled by `√P`.
pub fn annualised_sharpe_ratio(
    mean_return: f64,
    volatility: f64,
    risk_free: f64,
    annualisation: &Annualisation,
) -> SharpeRatio {
    sharpe_ratio(
        annualisation.mean_return(mean_return),
        annualisation.volatility(volatility),
        annualisation.mean_return(risk_free),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defined_ratio() {
        let s = sharpe_ratio(0.03, 0.1, 0.01);
        assert_relative_eq!(s.value().unwrap(), 0.2, epsilon = 1e-12);
        assert_eq!(s.to_string(), "0.2000");
    }

    #[test]
    fn test_zero_volatility_is_undefined() {
        let s = sharpe_ratio(0.03, 0.0, 0.0);
        assert_eq!(s, SharpeRatio::Undefined);
        assert_eq!(s.as_option(), None);
        assert!(matches!(s.value(), Err(RiskError::UndefinedMetric { .. })));
        assert_eq!(s.to_string(), "undefined");
    }

    #[test]
    fn test_annualised_scales_with_sqrt_periods() {
        let ann = Annualisation::default();
        let per_period = sharpe_ratio(0.001, 0.01, 0.0).value().unwrap();
        let annual = annualised_sharpe_ratio(0.001, 0.01, 0.0, &ann).value().unwrap();
        assert_relative_eq!(annual, per_period * 252.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_annualised_zero_volatility_is_undefined() {
        let ann = Annualisation::default();
        assert!(!annualised_sharpe_ratio(0.001, 0.0, 0.0, &ann).is_defined());
    }
}
