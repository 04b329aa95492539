//! Returns layer: converts aligned prices into period returns.
//!
//! Pure functions of their input; the source series are never modified.

use crate::traits::Float;
use crate::types::{
    PriceSeries, PriceTable, ReturnMode, ReturnSeries, ReturnTable, RiskError, RiskResult,
};

/// Compute period returns from a raw price slice.
///
/// # Errors
/// - `InsufficientData` if fewer than two prices are supplied
/// - `DegenerateInput` if a price is not strictly positive
///
/// # Examples
/// ```
/// use finrisk_core::returns::period_returns;
/// use finrisk_core::types::ReturnMode;
///
/// let r = period_returns(&[100.0_f64, 110.0], ReturnMode::Simple).unwrap();
/// assert!((r[0] - 0.1).abs() < 1e-12);
/// ```
pub fn period_returns<T: Float>(prices: &[T], mode: ReturnMode) -> RiskResult<Vec<T>> {
    if prices.len() < 2 {
        return Err(RiskError::insufficient_data("returns", prices.len(), 2));
    }

    prices
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            let (prev, curr) = (w[0], w[1]);
            if !(prev > T::zero()) || !(curr > T::zero()) {
                return Err(RiskError::degenerate(format!(
                    "non-positive price around index {}",
                    i + 1
                )));
            }
            let ratio = curr / prev;
            Ok(match mode {
                ReturnMode::Simple => ratio - T::one(),
                ReturnMode::Log => ratio.ln(),
            })
        })
        .collect()
}

/// Compute the return series of one asset.
///
/// Each return is dated with the closing date of its period.
pub fn compute_returns(prices: &PriceSeries, mode: ReturnMode) -> RiskResult<ReturnSeries> {
    let asset = prices.asset();
    let values = period_returns(prices.prices(), mode).map_err(|e| e.for_asset(asset.as_str()))?;
    ReturnSeries::new(asset.clone(), mode, prices.dates()[1..].to_vec(), values)
}

/// Compute returns for every asset of an aligned price table.
pub fn compute_return_table(prices: &PriceTable, mode: ReturnMode) -> RiskResult<ReturnTable> {
    let series = prices
        .series()
        .iter()
        .map(|s| compute_returns(s, mode))
        .collect::<RiskResult<Vec<_>>>()?;
    ReturnTable::new(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series(asset: &str, prices: Vec<f64>) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::with_daily_index(asset, start, prices).unwrap()
    }

    #[test]
    fn test_simple_returns_reference_example() {
        let r = compute_returns(&series("A", vec![100.0, 90.0, 95.0, 80.0]), ReturnMode::Simple)
            .unwrap();
        assert_eq!(r.len(), 3);
        assert_relative_eq!(r.values()[0], -0.10, epsilon = 1e-12);
        assert_relative_eq!(r.values()[1], 95.0 / 90.0 - 1.0, epsilon = 1e-12);
        assert_relative_eq!(r.values()[2], 80.0 / 95.0 - 1.0, epsilon = 1e-12);
        assert!((r.values()[1] - 0.0556).abs() < 1e-4);
        assert!((r.values()[2] + 0.1579).abs() < 1e-4);
    }

    #[test]
    fn test_log_returns() {
        let r = compute_returns(&series("A", vec![100.0, 110.0, 99.0]), ReturnMode::Log).unwrap();
        assert_relative_eq!(r.values()[0], (1.1_f64).ln(), epsilon = 1e-12);
        assert_relative_eq!(r.values()[1], (0.9_f64).ln(), epsilon = 1e-12);
        assert_eq!(r.mode(), ReturnMode::Log);
    }

    #[test]
    fn test_return_dates_are_period_ends() {
        let p = series("A", vec![1.0, 2.0, 3.0]);
        let r = compute_returns(&p, ReturnMode::Simple).unwrap();
        assert_eq!(r.dates(), &p.dates()[1..]);
    }

    #[test]
    fn test_insufficient_prices() {
        let err = compute_returns(&series("A", vec![100.0]), ReturnMode::Simple).unwrap_err();
        match err {
            RiskError::InsufficientData { context, got, need } => {
                assert!(context.contains('A'));
                assert_eq!(got, 1);
                assert_eq!(need, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_period_returns_rejects_zero_price() {
        let err = period_returns(&[1.0_f64, 0.0, 1.0], ReturnMode::Log).unwrap_err();
        assert!(matches!(err, RiskError::DegenerateInput(_)));
    }

    #[test]
    fn test_return_table() {
        let table = PriceTable::new(vec![
            series("A", vec![100.0, 101.0, 102.0]),
            series("B", vec![50.0, 49.0, 51.0]),
        ])
        .unwrap();
        let returns = compute_return_table(&table, ReturnMode::Simple).unwrap();
        assert_eq!(returns.n_assets(), 2);
        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns.column(1)[0], -0.02, epsilon = 1e-12);
    }
}
