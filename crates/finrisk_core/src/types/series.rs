//! Price and return series.
//!
//! Both series types are immutable once constructed. Construction
//! validates ordering and finiteness so downstream statistics never see a
//! poisoned observation.

use super::error::{RiskError, RiskResult};
use super::ids::AssetId;
use chrono::{Duration, NaiveDate};

/// How period returns are derived from prices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ReturnMode {
    /// `p[t] / p[t-1] - 1`
    #[default]
    Simple,
    /// `ln(p[t] / p[t-1])`
    Log,
}

impl ReturnMode {
    /// Get the mode name.
    pub fn name(&self) -> &'static str {
        match self {
            ReturnMode::Simple => "simple",
            ReturnMode::Log => "log",
        }
    }
}

fn check_dates(dates: &[NaiveDate]) -> RiskResult<()> {
    for (i, pair) in dates.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(RiskError::InvalidSeries(format!(
                "dates not strictly increasing at index {}: {} -> {}",
                i + 1,
                pair[0],
                pair[1]
            )));
        }
    }
    Ok(())
}

/// Ordered `(date, price)` observations for one asset.
///
/// # Invariants
/// - Dates strictly increasing
/// - Prices finite and strictly positive
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use finrisk_core::types::PriceSeries;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let series = PriceSeries::with_daily_index("AAPL", start, vec![100.0, 90.0, 95.0]).unwrap();
/// assert_eq!(series.len(), 3);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PriceSeries {
    asset: AssetId,
    dates: Vec<NaiveDate>,
    prices: Vec<f64>,
}

impl PriceSeries {
    /// Create a validated price series.
    pub fn new(
        asset: impl Into<AssetId>,
        dates: Vec<NaiveDate>,
        prices: Vec<f64>,
    ) -> RiskResult<Self> {
        let asset = asset.into();
        if dates.len() != prices.len() {
            return Err(RiskError::dimension_mismatch(
                format!("price series {}", asset),
                dates.len(),
                prices.len(),
            ));
        }
        check_dates(&dates).map_err(|e| e.for_asset(asset.as_str()))?;
        if let Some((i, p)) = prices
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || **p <= 0.0)
        {
            return Err(RiskError::InvalidSeries(format!(
                "price {} at index {} is not a positive finite number ({})",
                p, i, asset
            )));
        }
        Ok(Self {
            asset,
            dates,
            prices,
        })
    }

    /// Create a price series from `(date, price)` points.
    pub fn from_points(
        asset: impl Into<AssetId>,
        points: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> RiskResult<Self> {
        let (dates, prices) = points.into_iter().unzip();
        Self::new(asset, dates, prices)
    }

    /// Create a price series indexed by consecutive calendar days.
    pub fn with_daily_index(
        asset: impl Into<AssetId>,
        start: NaiveDate,
        prices: Vec<f64>,
    ) -> RiskResult<Self> {
        let dates = (0..prices.len())
            .map(|i| start + Duration::days(i as i64))
            .collect();
        Self::new(asset, dates, prices)
    }

    /// Asset this series belongs to.
    pub fn asset(&self) -> &AssetId {
        &self.asset
    }

    /// Observation dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Observed prices.
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Check whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Period returns derived from a [`PriceSeries`].
///
/// Each return is stamped with the date of the period's closing price, so a
/// series built from `n` prices holds `n - 1` returns.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReturnSeries {
    asset: AssetId,
    mode: ReturnMode,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Create a validated return series.
    ///
    /// Used directly when the caller already holds clean returns rather
    /// than prices.
    pub fn new(
        asset: impl Into<AssetId>,
        mode: ReturnMode,
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
    ) -> RiskResult<Self> {
        let asset = asset.into();
        if dates.len() != values.len() {
            return Err(RiskError::dimension_mismatch(
                format!("return series {}", asset),
                dates.len(),
                values.len(),
            ));
        }
        check_dates(&dates).map_err(|e| e.for_asset(asset.as_str()))?;
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(RiskError::InvalidSeries(format!(
                "non-finite return at index {} ({})",
                i, asset
            )));
        }
        Ok(Self {
            asset,
            mode,
            dates,
            values,
        })
    }

    /// Build a copy of this series with replaced values on the same index.
    pub fn with_values(&self, values: Vec<f64>) -> RiskResult<Self> {
        Self::new(self.asset.clone(), self.mode, self.dates.clone(), values)
    }

    /// Asset this series belongs to.
    pub fn asset(&self) -> &AssetId {
        &self.asset
    }

    /// Return convention.
    pub fn mode(&self) -> ReturnMode {
        self.mode
    }

    /// Period end dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Period returns.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the series has no periods.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
