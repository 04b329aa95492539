//! Statistics over return series.
//!
//! This module provides:
//! - `moments`: Mean, variance, volatility, covariance and Pearson correlation
//! - `rolling`: Lazy rolling-window volatility
//! - `correlation`: Correlation and covariance matrices over aligned tables
//! - `annualise`: Scaling per-period statistics to annual figures

pub mod annualise;
pub mod correlation;
pub mod moments;
pub mod rolling;

pub use annualise::{Annualisation, TRADING_DAYS_PER_YEAR};
pub use correlation::{
    correlation_matrix, covariance_matrix, CorrelationMatrix, CovarianceMatrix,
    DEGENERATE_CORRELATION,
};
pub use moments::{mean, pearson, sample_covariance, sample_variance, volatility};
pub use rolling::{rolling_volatility, RollingVolatility};
