//! Portfolio weights and the validation gate.
//!
//! Raw [`PortfolioWeights`] are whatever the caller supplied. The only way
//! to obtain [`ValidatedWeights`] is [`validate_weights`], and every
//! aggregation function takes `ValidatedWeights`, so unvalidated weights
//! can never reach the risk math. Weights are never normalised.

use finrisk_core::types::{AssetId, RiskError, RiskResult};
use std::collections::HashSet;

/// Default tolerance on `|Σw - 1|`.
pub const DEFAULT_WEIGHT_TOLERANCE: f64 = 1e-6;

/// Raw asset to weight mapping, in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioWeights {
    entries: Vec<(AssetId, f64)>,
}

impl PortfolioWeights {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a weight.
    pub fn with(mut self, asset: impl Into<AssetId>, weight: f64) -> Self {
        self.entries.push((asset.into(), weight));
        self
    }

    /// Add a weight in place.
    pub fn insert(&mut self, asset: impl Into<AssetId>, weight: f64) {
        self.entries.push((asset.into(), weight));
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[(AssetId, f64)] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether no weights were supplied.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }
}

impl<A: Into<AssetId>> FromIterator<(A, f64)> for PortfolioWeights {
    fn from_iter<I: IntoIterator<Item = (A, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(a, w)| (a.into(), w)).collect(),
        }
    }
}

/// Validation rules for portfolio weights.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightPolicy {
    /// Maximum allowed `|Σw - 1|`
    pub tolerance: f64,
    /// Whether negative weights are accepted
    pub allow_short: bool,
}

impl Default for WeightPolicy {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_WEIGHT_TOLERANCE,
            allow_short: false,
        }
    }
}

impl WeightPolicy {
    /// Set the sum tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Allow or forbid short positions.
    pub fn with_short(mut self, allow_short: bool) -> Self {
        self.allow_short = allow_short;
        self
    }
}

/// Weights that passed [`validate_weights`], ordered like the universe.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValidatedWeights {
    assets: Vec<AssetId>,
    values: Vec<f64>,
}

impl ValidatedWeights {
    /// Asset order.
    pub fn assets(&self) -> &[AssetId] {
        &self.assets
    }

    /// Weights in asset order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Weight of a named asset.
    pub fn get(&self, asset: &str) -> Option<f64> {
        self.assets
            .iter()
            .position(|a| a.as_str() == asset)
            .map(|i| self.values[i])
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Always false: validation rejects empty weights.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Check whether the portfolio holds a single asset.
    pub fn is_single_asset(&self) -> bool {
        self.assets.len() == 1
    }

    /// Asset with the largest weight; ties go to the first in order.
    pub fn largest(&self) -> (&AssetId, f64) {
        let mut best = 0;
        for (i, w) in self.values.iter().enumerate() {
            if *w > self.values[best] {
                best = i;
            }
        }
        (&self.assets[best], self.values[best])
    }

    /// Iterate over `(asset, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, f64)> + '_ {
        self.assets.iter().zip(self.values.iter().copied())
    }

    /// Check that these weights were validated against `assets`, in order.
    ///
    /// # Errors
    /// `DimensionMismatch` or `InvalidWeights` if the asset order differs.
    pub fn ensure_aligned(&self, assets: &[AssetId]) -> RiskResult<()> {
        if assets.len() != self.assets.len() {
            return Err(RiskError::dimension_mismatch(
                "portfolio weights",
                assets.len(),
                self.assets.len(),
            ));
        }
        if let Some((a, b)) = assets.iter().zip(&self.assets).find(|(a, b)| a != b) {
            return Err(RiskError::InvalidWeights(format!(
                "weights ordered for {} where inputs hold {}",
                b, a
            )));
        }
        Ok(())
    }
}

/// Validate raw weights against an asset universe.
///
/// # Errors
/// `InvalidWeights` when:
/// - no weights are supplied
/// - a weight is not finite
/// - an asset appears twice
/// - the weight keys differ from the universe
/// - a weight is negative and shorting is not allowed
/// - `|Σw - 1| > policy.tolerance`
///
/// # Examples
/// ```
/// use finrisk_core::types::AssetId;
/// use finrisk_portfolio::weights::{validate_weights, PortfolioWeights, WeightPolicy};
///
/// let universe = vec![AssetId::new("A"), AssetId::new("B")];
/// let bad = PortfolioWeights::new().with("A", 0.6).with("B", 0.5);
/// assert!(validate_weights(&bad, &universe, &WeightPolicy::default()).is_err());
///
/// let good = PortfolioWeights::new().with("B", 0.4).with("A", 0.6);
/// let validated = validate_weights(&good, &universe, &WeightPolicy::default()).unwrap();
/// assert_eq!(validated.values(), &[0.6, 0.4]);
/// ```
pub fn validate_weights(
    weights: &PortfolioWeights,
    universe: &[AssetId],
    policy: &WeightPolicy,
) -> RiskResult<ValidatedWeights> {
    if weights.is_empty() {
        return Err(RiskError::InvalidWeights("no weights supplied".to_string()));
    }

    let mut seen = HashSet::with_capacity(weights.len());
    for (asset, w) in weights.entries() {
        if !w.is_finite() {
            return Err(RiskError::InvalidWeights(format!(
                "weight for {} is not finite",
                asset
            )));
        }
        if !seen.insert(asset.as_str()) {
            return Err(RiskError::InvalidWeights(format!(
                "duplicate weight for {}",
                asset
            )));
        }
        if !policy.allow_short && *w < 0.0 {
            return Err(RiskError::InvalidWeights(format!(
                "negative weight {} for {} with shorting disabled",
                w, asset
            )));
        }
    }

    let missing: Vec<&str> = universe
        .iter()
        .map(AssetId::as_str)
        .filter(|a| !seen.contains(a))
        .collect();
    if !missing.is_empty() {
        return Err(RiskError::InvalidWeights(format!(
            "missing weights for {}",
            missing.join(", ")
        )));
    }
    let known: HashSet<&str> = universe.iter().map(AssetId::as_str).collect();
    let extra: Vec<&str> = weights
        .entries()
        .iter()
        .map(|(a, _)| a.as_str())
        .filter(|a| !known.contains(a))
        .collect();
    if !extra.is_empty() {
        return Err(RiskError::InvalidWeights(format!(
            "weights for assets outside the universe: {}",
            extra.join(", ")
        )));
    }

    let sum = weights.sum();
    if (sum - 1.0).abs() > policy.tolerance {
        return Err(RiskError::InvalidWeights(format!(
            "weights sum to {:.8}, expected 1 within {:e}",
            sum, policy.tolerance
        )));
    }

    let values = universe
        .iter()
        .map(|asset| {
            weights
                .entries()
                .iter()
                .find(|(a, _)| a == asset)
                .map(|(_, w)| *w)
                .unwrap_or(0.0)
        })
        .collect();

    Ok(ValidatedWeights {
        assets: universe.to_vec(),
        values,
    })
}
