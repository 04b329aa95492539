//! Integration tests for module exports.
//!
//! Verify that the public modules and types are reachable via absolute
//! paths and work together across module boundaries.

use chrono::NaiveDate;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Test that the returns layer is accessible via absolute path.
#[test]
fn test_returns_module_exports() {
    use finrisk_core::returns::{compute_return_table, compute_returns, period_returns};
    use finrisk_core::types::{PriceSeries, PriceTable, ReturnMode};

    let a = PriceSeries::with_daily_index("A", start(), vec![100.0, 90.0, 95.0, 80.0]).unwrap();
    let b = PriceSeries::with_daily_index("B", start(), vec![50.0, 51.0, 52.0, 50.0]).unwrap();

    assert_eq!(compute_returns(&a, ReturnMode::Simple).unwrap().len(), 3);
    assert_eq!(period_returns(&[1.0_f64, 2.0], ReturnMode::Log).unwrap().len(), 1);

    let table = PriceTable::new(vec![a, b]).unwrap();
    let returns = compute_return_table(&table, ReturnMode::Simple).unwrap();
    assert_eq!(returns.n_assets(), 2);
    assert_eq!(returns.dates(), &table.dates()[1..]);
}

/// Test that the statistics module is accessible via absolute path.
#[test]
fn test_stats_module_exports() {
    use finrisk_core::stats::{
        correlation_matrix, covariance_matrix, mean, pearson, rolling_volatility,
        sample_covariance, sample_variance, volatility, Annualisation,
    };
    use finrisk_core::types::{ReturnMode, ReturnSeries, ReturnTable};

    let x = [0.01_f64, -0.02, 0.03, 0.0, 0.01];
    let y = [0.02_f64, -0.01, 0.02, 0.01, 0.0];

    let _ = mean(&x).unwrap();
    let _ = sample_variance(&x).unwrap();
    let _ = sample_covariance(&x, &y).unwrap();
    let _ = pearson(&x, &y).unwrap();
    let vol = volatility(&x).unwrap();
    assert_eq!(rolling_volatility(&x, 2).unwrap().len(), 4);

    let dates: Vec<NaiveDate> = (0..5).map(|i| start() + chrono::Duration::days(i)).collect();
    let table = ReturnTable::new(vec![
        ReturnSeries::new("X", ReturnMode::Simple, dates.clone(), x.to_vec()).unwrap(),
        ReturnSeries::new("Y", ReturnMode::Simple, dates, y.to_vec()).unwrap(),
    ])
    .unwrap();
    let corr = correlation_matrix(&table).unwrap();
    let cov = covariance_matrix(&[vol, volatility(&y).unwrap()], &corr).unwrap();
    assert_eq!(cov.n(), 2);
    assert!(Annualisation::default().volatility(vol) > vol);
}

/// Test that the Float trait re-export works.
#[test]
fn test_traits_module_exports() {
    use finrisk_core::traits::Float;

    fn generic_sqrt<T: Float>(x: T) -> T {
        x.sqrt()
    }
    assert_eq!(generic_sqrt(4.0_f64), 2.0);
}

/// Test that the error taxonomy is accessible and displays context.
#[test]
fn test_error_exports() {
    use finrisk_core::types::{RiskError, RiskResult};

    fn fails() -> RiskResult<()> {
        Err(RiskError::insufficient_data("volatility", 1, 2))
    }
    let err = fails().unwrap_err().for_asset("ACME");
    assert!(err.to_string().contains("ACME"));
}
