//! Drawdown extraction from price paths.
//!
//! The drawdown at point `t` is `price[t] / max(price[0..=t]) - 1`. The
//! running peak never resets, so the series is always `<= 0`.

use finrisk_core::traits::Float;
use finrisk_core::types::{RiskError, RiskResult};

/// Location and depth of the worst drawdown.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawdownPeriod {
    /// Index of the running peak preceding the trough
    pub peak: usize,
    /// Index of the trough
    pub trough: usize,
    /// Drawdown at the trough (`<= 0`)
    pub depth: f64,
}

fn check_path<T: Float>(prices: &[T]) -> RiskResult<()> {
    if prices.is_empty() {
        return Err(RiskError::insufficient_data("drawdown", 0, 1));
    }
    if let Some(i) = prices.iter().position(|p| !(*p > T::zero()) || !p.is_finite()) {
        return Err(RiskError::degenerate(format!(
            "non-positive value at index {} in drawdown path",
            i
        )));
    }
    Ok(())
}

/// Drawdown relative to the running maximum, one value per point.
///
/// The first value is always 0.
///
/// # Errors
/// - `InsufficientData` for an empty path
/// - `DegenerateInput` if a value is not strictly positive
///
/// # Examples
/// ```
/// use finrisk_metrics::drawdown::drawdown_series;
///
/// let dd = drawdown_series(&[100.0_f64, 90.0, 95.0, 80.0]).unwrap();
/// assert_eq!(dd[0], 0.0);
/// assert!((dd[3] + 0.2).abs() < 1e-12);
/// ```
pub fn drawdown_series<T: Float>(prices: &[T]) -> RiskResult<Vec<T>> {
    check_path(prices)?;
    let mut peak = prices[0];
    Ok(prices
        .iter()
        .map(|&p| {
            peak = peak.max(p);
            p / peak - T::one()
        })
        .collect())
}

/// Maximum drawdown: the minimum of [`drawdown_series`].
///
/// Zero exactly when the path never falls below a previous peak.
pub fn max_drawdown<T: Float>(prices: &[T]) -> RiskResult<T> {
    Ok(drawdown_series(prices)?
        .into_iter()
        .fold(T::zero(), |acc, d| acc.min(d)))
}

/// Peak and trough of the worst drawdown.
///
/// For a non-decreasing path the period is `(0, 0)` with depth 0.
pub fn max_drawdown_period<T: Float>(prices: &[T]) -> RiskResult<DrawdownPeriod> {
    check_path(prices)?;
    let mut peak_idx = 0;
    let mut worst = DrawdownPeriod {
        peak: 0,
        trough: 0,
        depth: 0.0,
    };
    for (i, &p) in prices.iter().enumerate() {
        if p > prices[peak_idx] {
            peak_idx = i;
        }
        let depth = (p / prices[peak_idx] - T::one()).to_f64().unwrap_or(f64::NAN);
        if depth < worst.depth {
            worst = DrawdownPeriod {
                peak: peak_idx,
                trough: i,
                depth,
            };
        }
    }
    Ok(worst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_path() {
        let prices = [100.0_f64, 90.0, 95.0, 80.0];
        let dd = drawdown_series(&prices).unwrap();
        assert_eq!(dd.len(), 4);
        assert_relative_eq!(dd[1], -0.10, epsilon = 1e-12);
        assert_relative_eq!(dd[2], -0.05, epsilon = 1e-12);
        assert_relative_eq!(max_drawdown(&prices).unwrap(), -0.20, epsilon = 1e-12);

        let period = max_drawdown_period(&prices).unwrap();
        assert_eq!((period.peak, period.trough), (0, 3));
        assert_relative_eq!(period.depth, -0.20, epsilon = 1e-12);
    }

    #[test]
    fn test_peak_does_not_reset() {
        let prices = [100.0_f64, 120.0, 60.0, 110.0, 90.0];
        let dd = drawdown_series(&prices).unwrap();
        assert_relative_eq!(dd[3], 110.0 / 120.0 - 1.0, epsilon = 1e-12);
        let period = max_drawdown_period(&prices).unwrap();
        assert_eq!((period.peak, period.trough), (1, 2));
    }

    #[test]
    fn test_non_decreasing_path_has_zero_drawdown() {
        let prices = [1.0_f64, 1.0, 2.0, 3.0];
        assert_eq!(max_drawdown(&prices).unwrap(), 0.0);
        let period = max_drawdown_period(&prices).unwrap();
        assert_eq!(period.depth, 0.0);
    }

    #[test]
    fn test_single_point() {
        assert_eq!(drawdown_series(&[42.0_f64]).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_invalid_paths() {
        assert!(matches!(
            drawdown_series::<f64>(&[]),
            Err(RiskError::InsufficientData { .. })
        ));
        assert!(matches!(
            max_drawdown(&[1.0_f64, 0.0]),
            Err(RiskError::DegenerateInput(_))
        ));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            #[test]
            fn test_max_drawdown_non_positive(prices in prop::collection::vec(0.1_f64..1000.0, 1..200)) {
                let mdd = max_drawdown(&prices).unwrap();
                prop_assert!(mdd <= 0.0);
                prop_assert!(mdd >= -1.0);
            }

            #[test]
            fn test_zero_only_for_non_decreasing(mut prices in prop::collection::vec(0.1_f64..1000.0, 1..100)) {
                prices.sort_by(|a, b| a.partial_cmp(b).unwrap());
                prop_assert_eq!(max_drawdown(&prices).unwrap(), 0.0);
            }

            #[test]
            fn test_any_decline_is_negative(
                prices in prop::collection::vec(1.0_f64..1000.0, 2..100),
                drop in 0.01_f64..0.9,
            ) {
                let mut path = prices.clone();
                let last = *path.last().unwrap();
                let peak = path.iter().cloned().fold(f64::MIN, f64::max);
                path.push(peak.min(last) * (1.0 - drop));
                prop_assert!(max_drawdown(&path).unwrap() < 0.0);
            }
        }
    }
}
