//! Sample moments over return slices.
//!
//! All estimators use the `n - 1` denominator. A slice whose values are all
//! identical has a variance of exactly zero; this is checked explicitly so
//! round-off in the mean never leaks a spurious `1e-34` variance into the
//! zero-volatility guards downstream.

use crate::traits::Float;
use crate::types::{RiskError, RiskResult};

fn from_usize<T: Float>(n: usize) -> T {
    T::from(n).unwrap_or_else(T::nan)
}

fn is_constant<T: Float>(values: &[T]) -> bool {
    values.iter().all(|v| *v == values[0])
}

/// Arithmetic mean.
///
/// # Errors
/// `InsufficientData` for an empty slice.
pub fn mean<T: Float>(values: &[T]) -> RiskResult<T> {
    if values.is_empty() {
        return Err(RiskError::insufficient_data("mean", 0, 1));
    }
    let sum = values.iter().fold(T::zero(), |acc, v| acc + *v);
    Ok(sum / from_usize(values.len()))
}

/// Sample variance of a slice already known to hold at least two values.
pub(crate) fn sample_variance_unchecked<T: Float>(values: &[T]) -> T {
    if is_constant(values) {
        return T::zero();
    }
    let n = from_usize::<T>(values.len());
    let m = values.iter().fold(T::zero(), |acc, v| acc + *v) / n;
    let ss = values.iter().fold(T::zero(), |acc, v| {
        let d = *v - m;
        acc + d * d
    });
    ss / (n - T::one())
}

/// Sample variance (`n - 1` denominator).
///
/// # Errors
/// `InsufficientData` if fewer than two observations are supplied.
pub fn sample_variance<T: Float>(values: &[T]) -> RiskResult<T> {
    if values.len() < 2 {
        return Err(RiskError::insufficient_data("variance", values.len(), 2));
    }
    Ok(sample_variance_unchecked(values))
}

/// Volatility: the sample standard deviation of a return series.
///
/// # Errors
/// `InsufficientData` if fewer than two observations are supplied.
///
/// # Examples
/// ```
/// use finrisk_core::stats::volatility;
///
/// assert_eq!(volatility(&[0.01_f64, 0.01, 0.01]).unwrap(), 0.0);
/// assert!(volatility(&[0.01_f64]).is_err());
/// ```
pub fn volatility<T: Float>(values: &[T]) -> RiskResult<T> {
    if values.len() < 2 {
        return Err(RiskError::insufficient_data("volatility", values.len(), 2));
    }
    Ok(sample_variance_unchecked(values).sqrt())
}

/// Sample covariance of two equally long series.
///
/// # Errors
/// - `DimensionMismatch` if the lengths differ
/// - `InsufficientData` if fewer than two observations are supplied
pub fn sample_covariance<T: Float>(x: &[T], y: &[T]) -> RiskResult<T> {
    if x.len() != y.len() {
        return Err(RiskError::dimension_mismatch("covariance", x.len(), y.len()));
    }
    if x.len() < 2 {
        return Err(RiskError::insufficient_data("covariance", x.len(), 2));
    }
    let mx = mean(x)?;
    let my = mean(y)?;
    let n = from_usize::<T>(x.len());
    let sum = x
        .iter()
        .zip(y.iter())
        .fold(T::zero(), |acc, (xi, yi)| acc + (*xi - mx) * (*yi - my));
    Ok(sum / (n - T::one()))
}

/// Pearson correlation coefficient, clipped to `[-1, 1]`.
///
/// # Errors
/// - `DimensionMismatch` / `InsufficientData` as for [`sample_covariance`]
/// - `DegenerateInput` if either series has zero variance
pub fn pearson<T: Float>(x: &[T], y: &[T]) -> RiskResult<T> {
    let cov = sample_covariance(x, y)?;
    let vx = sample_variance_unchecked(x);
    let vy = sample_variance_unchecked(y);
    if vx == T::zero() || vy == T::zero() {
        return Err(RiskError::degenerate(
            "correlation undefined for a zero-variance series",
        ));
    }
    let rho = cov / (vx.sqrt() * vy.sqrt());
    Ok(rho.max(-T::one()).min(T::one()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        assert_relative_eq!(mean(&[1.0_f64, 2.0, 3.0, 4.0, 5.0]).unwrap(), 3.0);
        assert!(matches!(
            mean::<f64>(&[]),
            Err(RiskError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_sample_variance() {
        // Sample variance of 2,4,4,4,5,5,7,9 is 32/7
        let values = [2.0_f64, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(sample_variance(&values).unwrap(), 32.0 / 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_volatility_constant_series_is_exactly_zero() {
        let values = [0.1_f64; 7];
        assert_eq!(volatility(&values).unwrap(), 0.0);
    }

    #[test]
    fn test_volatility_requires_two_observations() {
        let err = volatility(&[0.5_f64]).unwrap_err();
        assert_eq!(err, RiskError::insufficient_data("volatility", 1, 2));
    }

    #[test]
    fn test_covariance_length_mismatch() {
        let err = sample_covariance(&[1.0_f64, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(err, RiskError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let x = [1.0_f64, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0_f64, 4.0, 6.0, 8.0, 10.0];
        assert_relative_eq!(pearson(&x, &y).unwrap(), 1.0, epsilon = 1e-12);

        let z = [5.0_f64, 4.0, 3.0, 2.0, 1.0];
        assert_relative_eq!(pearson(&x, &z).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_zero_variance_is_degenerate() {
        let x = [1.0_f64, 2.0, 3.0];
        let y = [0.0_f64, 0.0, 0.0];
        assert!(matches!(pearson(&x, &y), Err(RiskError::DegenerateInput(_))));
    }

    #[test]
    fn test_generic_over_f32() {
        let v = volatility(&[1.0_f32, 3.0]).unwrap();
        assert!((v - 2.0_f32.sqrt()).abs() < 1e-6);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            #[test]
            fn test_volatility_non_negative(values in prop::collection::vec(-0.5_f64..0.5, 2..200)) {
                let v = volatility(&values).unwrap();
                prop_assert!(v >= 0.0);
            }

            #[test]
            fn test_constant_series_zero_volatility(value in -1.0_f64..1.0, n in 2usize..100) {
                let values = vec![value; n];
                prop_assert_eq!(volatility(&values).unwrap(), 0.0);
            }

            #[test]
            fn test_pearson_bounded(
                pairs in prop::collection::vec((-1.0_f64..1.0, -1.0_f64..1.0), 3..100)
            ) {
                let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
                if let Ok(rho) = pearson(&x, &y) {
                    prop_assert!((-1.0..=1.0).contains(&rho));
                }
            }
        }
    }
}
