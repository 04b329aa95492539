//! Return and correlation transforms applied by scenarios.
//!
//! Every function here builds new values; inputs are only read.

use super::scenario::CorrelationRule;
use finrisk_core::stats::CorrelationMatrix;
use finrisk_core::types::{ReturnMode, ReturnTable, RiskError, RiskResult};

/// Per-period gross factor `(1 + shock)^(1 / window)`.
///
/// Compounding it over `window` periods reproduces the full shock.
pub fn per_period_factor(shock: f64, window: usize) -> f64 {
    (1.0 + shock).powf(1.0 / window as f64)
}

/// Apply a compounded shock to the trailing `window` returns of the
/// selected columns.
///
/// Simple returns become `(1 + r) * f - 1`, log returns `r + ln f`.
///
/// # Errors
/// - `InvalidWindow` if `window` exceeds the number of periods
/// - `DegenerateInput` for a total-loss shock on log returns
pub fn shock_returns(
    returns: &ReturnTable,
    columns: &[usize],
    shock: f64,
    window: usize,
) -> RiskResult<ReturnTable> {
    let len = returns.len();
    if window == 0 || window > len {
        return Err(RiskError::invalid_window("shock", window, len));
    }
    let factor = per_period_factor(shock, window);
    if returns.mode() == ReturnMode::Log && factor <= 0.0 {
        return Err(RiskError::degenerate(
            "a total-loss shock cannot be expressed as log returns",
        ));
    }
    let start = len - window;

    let series = returns
        .series()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if !columns.contains(&i) {
                return Ok(s.clone());
            }
            let values = s
                .values()
                .iter()
                .enumerate()
                .map(|(t, &r)| {
                    if t < start {
                        r
                    } else {
                        match returns.mode() {
                            ReturnMode::Simple => (1.0 + r) * factor - 1.0,
                            ReturnMode::Log => r + factor.ln(),
                        }
                    }
                })
                .collect();
            s.with_values(values)
        })
        .collect::<RiskResult<Vec<_>>>()?;

    ReturnTable::new(series)
}

/// Rewrite the off-diagonal correlations by `rule`.
///
/// # Errors
/// - `ScenarioOutOfBounds` if a forced target is below `-1 / (n - 1)`, the
///   lowest value for which a uniform correlation matrix stays positive
///   semi-definite
/// - `DegenerateInput` if amplification leaves a matrix that is not
///   positive semi-definite (strongly negative pairs scaled together)
pub fn break_correlation(
    correlation: &CorrelationMatrix,
    rule: CorrelationRule,
) -> RiskResult<CorrelationMatrix> {
    match rule {
        CorrelationRule::ForceTo(target) => {
            let n = correlation.n();
            if n > 2 {
                let floor = -1.0 / (n - 1) as f64;
                if target < floor {
                    return Err(RiskError::ScenarioOutOfBounds {
                        parameter: "correlation_target".to_string(),
                        value: target,
                        min: floor,
                        max: 1.0,
                    });
                }
            }
            Ok(correlation.map_off_diagonal(|_| target))
        }
        CorrelationRule::Amplify(multiplier) => {
            let amplified = correlation.map_off_diagonal(|rho| rho * multiplier);
            if !amplified.is_positive_semi_definite() {
                return Err(RiskError::degenerate(format!(
                    "correlations amplified {}x are not positive semi-definite",
                    multiplier
                )));
            }
            Ok(amplified)
        }
    }
}
