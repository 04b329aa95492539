//! Price data sources.
//!
//! - `csv_loader`: aligned price tables from `date,<asset>...` CSV files
//! - `synthetic`: seeded one-factor GBM paths

mod csv_loader;
mod synthetic;

pub use csv_loader::{load_price_table, read_price_table};
pub use synthetic::{RandomWalkModel, SyntheticMarket};

use crate::config::{DataMode, LabConfig};
use crate::error::LabError;
use finrisk_core::types::PriceTable;
use tracing::info;

/// Load the price table described by `config`.
///
/// In synthetic mode the universe is the weighted assets plus the
/// benchmark, if one is configured and not already held.
pub fn load_prices(config: &LabConfig) -> Result<PriceTable, LabError> {
    let table = match config.mode {
        DataMode::Csv => load_price_table(&config.prices_path())?,
        DataMode::Synthetic => {
            let mut assets: Vec<String> = config.weights.keys().cloned().collect();
            if let Some(benchmark) = &config.benchmark {
                if !config.weights.contains_key(benchmark) {
                    assets.push(benchmark.clone());
                }
            }
            SyntheticMarket::new(config.synthetic.clone(), config.periods_per_year)
                .generate(&assets)?
        }
    };

    info!(
        mode = ?config.mode,
        assets = table.n_assets(),
        periods = table.len(),
        "price table loaded"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_universe_includes_benchmark() {
        let mut config = LabConfig::default();
        config.benchmark = Some("MKT".to_string());
        config.synthetic.periods = 40;

        let table = load_prices(&config).unwrap();
        assert_eq!(table.n_assets(), 5);
        assert!(table.get("MKT").is_some());
        assert_eq!(table.len(), 40);
    }

    #[test]
    fn test_csv_mode_missing_file() {
        let mut config = LabConfig::default();
        config.mode = DataMode::Csv;
        config.data_dir = std::env::temp_dir().join("finrisk_lab_no_such_dir");

        let err = load_prices(&config).unwrap_err();
        assert!(matches!(err, LabError::DataLoad(_)));
    }
}
