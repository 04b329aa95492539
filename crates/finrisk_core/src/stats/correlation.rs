//! Correlation and covariance matrices.
//!
//! Both matrices are stored row-major in a flat `Vec<f64>` together with
//! the asset order they were built for. Zero-variance assets never produce
//! NaN: their off-diagonal correlations are set to
//! [`DEGENERATE_CORRELATION`] and the asset is flagged.

use super::moments::{pearson, sample_variance_unchecked};
use crate::types::{AssetId, ReturnTable, RiskError, RiskResult};

/// Correlation assigned to pairs involving a zero-variance asset.
pub const DEGENERATE_CORRELATION: f64 = 0.0;

/// Tolerance used when checking symmetry and the unit diagonal.
const MATRIX_TOLERANCE: f64 = 1e-10;

/// Symmetric correlation matrix with unit diagonal.
///
/// # Invariants
/// - Square, `n x n` with `n == assets.len()`
/// - Symmetric, diagonal 1, entries in `[-1, 1]`
/// - Never contains NaN
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawCorrelation")
)]
pub struct CorrelationMatrix {
    assets: Vec<AssetId>,
    values: Vec<f64>,
    degenerate: Vec<AssetId>,
}

/// Unchecked serialised form; deserialisation goes through
/// [`CorrelationMatrix::check_invariants`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCorrelation {
    assets: Vec<AssetId>,
    values: Vec<f64>,
    #[serde(default)]
    degenerate: Vec<AssetId>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCorrelation> for CorrelationMatrix {
    type Error = RiskError;

    fn try_from(raw: RawCorrelation) -> RiskResult<Self> {
        let n = raw.assets.len();
        if raw.values.len() != n * n {
            return Err(RiskError::dimension_mismatch(
                "correlation values",
                n * n,
                raw.values.len(),
            ));
        }
        if let Some(unknown) = raw.degenerate.iter().find(|a| !raw.assets.contains(a)) {
            return Err(RiskError::UnknownAsset(unknown.to_string()));
        }
        let matrix = Self {
            assets: raw.assets,
            values: raw.values,
            degenerate: raw.degenerate,
        };
        matrix.check_invariants()?;
        Ok(matrix)
    }
}

impl CorrelationMatrix {
    /// Identity matrix (all assets uncorrelated).
    pub fn identity(assets: Vec<AssetId>) -> Self {
        let n = assets.len();
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            values[i * n + i] = 1.0;
        }
        Self {
            assets,
            values,
            degenerate: Vec::new(),
        }
    }

    /// Build from explicit rows, validating every invariant.
    ///
    /// # Errors
    /// - `DimensionMismatch` if the rows are not `n x n`
    /// - `DegenerateInput` if the matrix is asymmetric, has a non-unit
    ///   diagonal, or holds entries outside `[-1, 1]`
    pub fn from_rows(assets: Vec<AssetId>, rows: Vec<Vec<f64>>) -> RiskResult<Self> {
        let n = assets.len();
        if rows.len() != n {
            return Err(RiskError::dimension_mismatch("correlation rows", n, rows.len()));
        }
        let mut values = Vec::with_capacity(n * n);
        for row in &rows {
            if row.len() != n {
                return Err(RiskError::dimension_mismatch(
                    "correlation columns",
                    n,
                    row.len(),
                ));
            }
            values.extend_from_slice(row);
        }
        let matrix = Self {
            assets,
            values,
            degenerate: Vec::new(),
        };
        matrix.check_invariants()?;
        Ok(matrix)
    }

    fn check_invariants(&self) -> RiskResult<()> {
        let n = self.n();
        for i in 0..n {
            if (self.get(i, i) - 1.0).abs() > MATRIX_TOLERANCE {
                return Err(RiskError::degenerate(format!(
                    "correlation diagonal for {} is {}, expected 1",
                    self.assets[i],
                    self.get(i, i)
                )));
            }
            for j in 0..n {
                let v = self.get(i, j);
                if !v.is_finite() || !(-1.0..=1.0).contains(&v) {
                    return Err(RiskError::degenerate(format!(
                        "correlation {} between {} and {} outside [-1, 1]",
                        v, self.assets[i], self.assets[j]
                    )));
                }
                if (v - self.get(j, i)).abs() > MATRIX_TOLERANCE {
                    return Err(RiskError::degenerate(format!(
                        "correlation matrix not symmetric at ({}, {})",
                        self.assets[i], self.assets[j]
                    )));
                }
            }
        }
        Ok(())
    }

    /// Number of assets.
    pub fn n(&self) -> usize {
        self.assets.len()
    }

    /// Asset order of rows and columns.
    pub fn assets(&self) -> &[AssetId] {
        &self.assets
    }

    /// Entry `(i, j)`.
    ///
    /// # Panics
    /// Panics if `i` or `j` is out of range.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n() + j]
    }

    /// Correlation between two named assets.
    pub fn pair(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.assets.iter().position(|x| x.as_str() == a)?;
        let j = self.assets.iter().position(|x| x.as_str() == b)?;
        Some(self.get(i, j))
    }

    /// Assets whose correlations were replaced by the degenerate sentinel.
    pub fn degenerate_assets(&self) -> &[AssetId] {
        &self.degenerate
    }

    /// Check whether any asset was flagged as degenerate.
    pub fn is_degenerate(&self) -> bool {
        !self.degenerate.is_empty()
    }

    /// Fail with `DegenerateInput` if any asset was flagged.
    pub fn require_well_formed(&self) -> RiskResult<&Self> {
        if self.is_degenerate() {
            let names: Vec<&str> = self.degenerate.iter().map(AssetId::as_str).collect();
            return Err(RiskError::degenerate(format!(
                "zero-variance returns for {}",
                names.join(", ")
            )));
        }
        Ok(self)
    }

    /// Check positive semi-definiteness with a Cholesky factorisation.
    ///
    /// Pivots within [`MATRIX_TOLERANCE`] of zero are accepted as rank
    /// deficiency (for example two perfectly correlated assets), provided
    /// the rest of their column is zero as well.
    pub fn is_positive_semi_definite(&self) -> bool {
        let n = self.n();
        let mut lower = vec![0.0; n * n];

        for j in 0..n {
            let mut sum = 0.0;
            for k in 0..j {
                sum += lower[j * n + k] * lower[j * n + k];
            }
            let diag = self.get(j, j) - sum;
            if diag < -MATRIX_TOLERANCE {
                return false;
            }
            let pivot = if diag > MATRIX_TOLERANCE { diag.sqrt() } else { 0.0 };
            lower[j * n + j] = pivot;

            for i in (j + 1)..n {
                let mut sum = 0.0;
                for k in 0..j {
                    sum += lower[i * n + k] * lower[j * n + k];
                }
                let residual = self.get(i, j) - sum;
                if pivot == 0.0 {
                    if residual.abs() > MATRIX_TOLERANCE.sqrt() {
                        return false;
                    }
                } else {
                    lower[i * n + j] = residual / pivot;
                }
            }
        }
        true
    }

    /// Mean of the off-diagonal entries, `None` for a single asset.
    pub fn average_off_diagonal(&self) -> Option<f64> {
        let n = self.n();
        if n < 2 {
            return None;
        }
        let mut sum = 0.0;
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    sum += self.get(i, j);
                }
            }
        }
        Some(sum / (n * (n - 1)) as f64)
    }

    /// Copy with every off-diagonal entry transformed by `f` and clipped to
    /// `[-1, 1]`. The diagonal and degenerate flags are kept.
    pub fn map_off_diagonal(&self, f: impl Fn(f64) -> f64) -> Self {
        let n = self.n();
        let mut values = self.values.clone();
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    values[i * n + j] = f(self.get(i, j)).clamp(-1.0, 1.0);
                }
            }
        }
        Self {
            assets: self.assets.clone(),
            values,
            degenerate: self.degenerate.clone(),
        }
    }

    /// Rows as nested vectors.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.values.chunks(self.n().max(1)).map(<[f64]>::to_vec).collect()
    }
}

/// Pairwise Pearson correlation of every column of an aligned return table.
///
/// Zero-variance columns get [`DEGENERATE_CORRELATION`] against every other
/// asset and are listed in [`CorrelationMatrix::degenerate_assets`].
///
/// # Errors
/// `InsufficientData` if the table has fewer than two periods.
pub fn correlation_matrix(returns: &ReturnTable) -> RiskResult<CorrelationMatrix> {
    if returns.len() < 2 {
        return Err(RiskError::insufficient_data(
            "correlation matrix",
            returns.len(),
            2,
        ));
    }

    let assets = returns.assets();
    let n = assets.len();
    let degenerate_flags: Vec<bool> = (0..n)
        .map(|i| sample_variance_unchecked(returns.column(i)) == 0.0)
        .collect();

    let mut values = vec![0.0; n * n];
    for i in 0..n {
        values[i * n + i] = 1.0;
        for j in (i + 1)..n {
            let rho = if degenerate_flags[i] || degenerate_flags[j] {
                DEGENERATE_CORRELATION
            } else {
                pearson(returns.column(i), returns.column(j))?
            };
            values[i * n + j] = rho;
            values[j * n + i] = rho;
        }
    }

    let degenerate = assets
        .iter()
        .zip(&degenerate_flags)
        .filter(|(_, flag)| **flag)
        .map(|(a, _)| a.clone())
        .collect();

    Ok(CorrelationMatrix {
        assets,
        values,
        degenerate,
    })
}

/// Symmetric covariance matrix.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CovarianceMatrix {
    assets: Vec<AssetId>,
    values: Vec<f64>,
}

impl CovarianceMatrix {
    /// Build `D * C * D` from per-asset volatilities and a correlation matrix.
    ///
    /// # Errors
    /// - `DimensionMismatch` if `volatilities` does not match the matrix size
    /// - `DegenerateInput` if a volatility is negative or non-finite
    pub fn from_correlation(
        volatilities: &[f64],
        correlation: &CorrelationMatrix,
    ) -> RiskResult<Self> {
        let n = correlation.n();
        if volatilities.len() != n {
            return Err(RiskError::dimension_mismatch(
                "covariance volatilities",
                n,
                volatilities.len(),
            ));
        }
        if let Some(i) = volatilities.iter().position(|v| !v.is_finite() || *v < 0.0) {
            return Err(RiskError::degenerate(format!(
                "volatility {} for {} is not a non-negative number",
                volatilities[i],
                correlation.assets()[i]
            )));
        }
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                values[i * n + j] = volatilities[i] * correlation.get(i, j) * volatilities[j];
            }
        }
        Ok(Self {
            assets: correlation.assets().to_vec(),
            values,
        })
    }

    /// Number of assets.
    pub fn n(&self) -> usize {
        self.assets.len()
    }

    /// Asset order of rows and columns.
    pub fn assets(&self) -> &[AssetId] {
        &self.assets
    }

    /// Entry `(i, j)`.
    ///
    /// # Panics
    /// Panics if `i` or `j` is out of range.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n() + j]
    }

    /// Variance of asset `i`.
    pub fn variance(&self, i: usize) -> f64 {
        self.get(i, i)
    }

    /// Matrix-vector product `Σ w`.
    ///
    /// # Errors
    /// `DimensionMismatch` if `w` does not match the matrix size.
    pub fn mul_vec(&self, w: &[f64]) -> RiskResult<Vec<f64>> {
        let n = self.n();
        if w.len() != n {
            return Err(RiskError::dimension_mismatch("covariance product", n, w.len()));
        }
        Ok((0..n)
            .map(|i| (0..n).map(|j| self.get(i, j) * w[j]).sum())
            .collect())
    }

    /// Quadratic form `wᵀ Σ w`.
    ///
    /// # Errors
    /// `DimensionMismatch` if `w` does not match the matrix size.
    pub fn quadratic_form(&self, w: &[f64]) -> RiskResult<f64> {
        let sigma_w = self.mul_vec(w)?;
        Ok(w.iter().zip(&sigma_w).map(|(a, b)| a * b).sum())
    }

    /// Rows as nested vectors.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.values.chunks(self.n().max(1)).map(<[f64]>::to_vec).collect()
    }
}

/// Covariance matrix `D * C * D` from per-asset volatilities.
///
/// Shorthand for [`CovarianceMatrix::from_correlation`].
pub fn covariance_matrix(
    volatilities: &[f64],
    correlation: &CorrelationMatrix,
) -> RiskResult<CovarianceMatrix> {
    CovarianceMatrix::from_correlation(volatilities, correlation)
}
