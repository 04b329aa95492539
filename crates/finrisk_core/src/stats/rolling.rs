//! Rolling-window volatility.
//!
//! The rolling view borrows the return slice and computes each value from
//! its own fixed-size window, so it can be iterated any number of times,
//! indexed directly, or split across threads.

use super::moments::sample_variance_unchecked;
use crate::traits::Float;
use crate::types::{RiskError, RiskResult};

/// Lazy rolling volatility over a borrowed return slice.
///
/// Yields one value per index `i >= window - 1`; value `k` is the sample
/// standard deviation of `values[k..k + window]`.
///
/// # Examples
/// ```
/// use finrisk_core::stats::rolling_volatility;
///
/// let returns = [0.01_f64, -0.02, 0.015, 0.0, -0.01];
/// let rolling = rolling_volatility(&returns, 3).unwrap();
/// assert_eq!(rolling.len(), 3);
///
/// // Restartable: a second pass yields the same values.
/// let first: Vec<f64> = rolling.iter().collect();
/// let second: Vec<f64> = rolling.iter().collect();
/// assert_eq!(first, second);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct RollingVolatility<'a, T> {
    values: &'a [T],
    window: usize,
}

impl<'a, T: Float> RollingVolatility<'a, T> {
    /// Create a rolling view.
    ///
    /// # Errors
    /// `InvalidWindow` if `window < 2` or `window > values.len()`.
    pub fn new(values: &'a [T], window: usize) -> RiskResult<Self> {
        if window < 2 || window > values.len() {
            return Err(RiskError::invalid_window(
                "rolling volatility",
                window,
                values.len(),
            ));
        }
        Ok(Self { values, window })
    }

    /// Window length.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Number of values produced.
    pub fn len(&self) -> usize {
        self.values.len() - self.window + 1
    }

    /// Always false: a valid view yields at least one value.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Value for output position `k` (source index `k + window - 1`).
    pub fn get(&self, k: usize) -> Option<T> {
        self.values
            .get(k..k + self.window)
            .map(|w| sample_variance_unchecked(w).sqrt())
    }

    /// Iterate over all rolling values.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = T> + 'a {
        self.values
            .windows(self.window)
            .map(|w| sample_variance_unchecked(w).sqrt())
    }

    /// Collect all rolling values.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

/// Build a rolling volatility view over `values`.
///
/// # Errors
/// `InvalidWindow` if `window < 2` or `window > values.len()`.
pub fn rolling_volatility<T: Float>(
    values: &[T],
    window: usize,
) -> RiskResult<RollingVolatility<'_, T>> {
    RollingVolatility::new(values, window)
}
