//! Aligned multi-asset tables.
//!
//! The engine never aligns data itself: a table can only be built from
//! series that already share one date index.

use super::error::{RiskError, RiskResult};
use super::ids::AssetId;
use super::series::{PriceSeries, ReturnMode, ReturnSeries};
use chrono::NaiveDate;
use std::collections::HashSet;

fn check_alignment<'a>(
    kind: &str,
    columns: impl Iterator<Item = (&'a AssetId, &'a [NaiveDate])>,
) -> RiskResult<()> {
    let mut seen = HashSet::new();
    let mut reference: Option<(&AssetId, &[NaiveDate])> = None;

    for (asset, dates) in columns {
        if !seen.insert(asset.clone()) {
            return Err(RiskError::InvalidSeries(format!(
                "duplicate asset {} in {} table",
                asset, kind
            )));
        }
        match reference {
            None => reference = Some((asset, dates)),
            Some((first, ref_dates)) => {
                if dates.len() != ref_dates.len() {
                    return Err(RiskError::dimension_mismatch(
                        format!("{} table column {} (aligned to {})", kind, asset, first),
                        ref_dates.len(),
                        dates.len(),
                    ));
                }
                if dates != ref_dates {
                    return Err(RiskError::InvalidSeries(format!(
                        "{} table column {} is not aligned to {}",
                        kind, asset, first
                    )));
                }
            }
        }
    }

    if reference.is_none() {
        return Err(RiskError::insufficient_data(
            format!("{} table assets", kind),
            0,
            1,
        ));
    }
    Ok(())
}

/// Aligned price series for an asset universe.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PriceTable {
    series: Vec<PriceSeries>,
}

impl PriceTable {
    /// Build a table from aligned series, preserving their order.
    pub fn new(series: Vec<PriceSeries>) -> RiskResult<Self> {
        check_alignment("price", series.iter().map(|s| (s.asset(), s.dates())))?;
        Ok(Self { series })
    }

    /// Assets in column order.
    pub fn assets(&self) -> Vec<AssetId> {
        self.series.iter().map(|s| s.asset().clone()).collect()
    }

    /// All columns.
    pub fn series(&self) -> &[PriceSeries] {
        &self.series
    }

    /// Look up one asset's series.
    pub fn get(&self, asset: &str) -> Option<&PriceSeries> {
        self.series.iter().find(|s| s.asset().as_str() == asset)
    }

    /// Shared date index.
    pub fn dates(&self) -> &[NaiveDate] {
        self.series[0].dates()
    }

    /// Number of assets.
    pub fn n_assets(&self) -> usize {
        self.series.len()
    }

    /// Number of observations per asset.
    pub fn len(&self) -> usize {
        self.series[0].len()
    }

    /// Check whether the table has no observations.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Aligned return series for an asset universe.
///
/// All columns share one date index and one [`ReturnMode`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReturnTable {
    series: Vec<ReturnSeries>,
}

impl ReturnTable {
    /// Build a table from aligned series, preserving their order.
    pub fn new(series: Vec<ReturnSeries>) -> RiskResult<Self> {
        check_alignment("return", series.iter().map(|s| (s.asset(), s.dates())))?;
        let mode = series[0].mode();
        if let Some(odd) = series.iter().find(|s| s.mode() != mode) {
            return Err(RiskError::InvalidSeries(format!(
                "return table mixes {} and {} returns ({})",
                mode.name(),
                odd.mode().name(),
                odd.asset()
            )));
        }
        Ok(Self { series })
    }

    /// Assets in column order.
    pub fn assets(&self) -> Vec<AssetId> {
        self.series.iter().map(|s| s.asset().clone()).collect()
    }

    /// All columns.
    pub fn series(&self) -> &[ReturnSeries] {
        &self.series
    }

    /// Look up one asset's series.
    pub fn get(&self, asset: &str) -> Option<&ReturnSeries> {
        self.series.iter().find(|s| s.asset().as_str() == asset)
    }

    /// Column index of an asset.
    pub fn position(&self, asset: &str) -> Option<usize> {
        self.series.iter().position(|s| s.asset().as_str() == asset)
    }

    /// Return values of the column at `index`.
    pub fn column(&self, index: usize) -> &[f64] {
        self.series[index].values()
    }

    /// Shared date index.
    pub fn dates(&self) -> &[NaiveDate] {
        self.series[0].dates()
    }

    /// Return convention shared by all columns.
    pub fn mode(&self) -> ReturnMode {
        self.series[0].mode()
    }

    /// Number of assets.
    pub fn n_assets(&self) -> usize {
        self.series.len()
    }

    /// Number of periods per asset.
    pub fn len(&self) -> usize {
        self.series[0].len()
    }

    /// Check whether the table has no periods.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
