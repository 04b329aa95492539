//! Lab configuration management.
//!
//! Handles loading of the lab configuration from TOML files with
//! environment variable override support. The engine never reads this
//! type directly: it receives the immutable values produced by
//! [`LabConfig::analysis_config`], [`LabConfig::weight_policy`] and
//! [`LabConfig::portfolio_weights`].

use chrono::NaiveDate;
use finrisk_core::stats::Annualisation;
use finrisk_core::types::{ReturnMode, RiskResult};
use finrisk_metrics::parallel::{ParallelConfig, DEFAULT_PARALLEL_THRESHOLD};
use finrisk_metrics::AnalysisConfig;
use finrisk_portfolio::{PortfolioWeights, WeightPolicy};
use finrisk_stress::scenarios::{PresetScenarioType, ScenarioBounds, StressScenario};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "demo/finrisk_lab/data/config/lab_config.toml";

/// Where price data comes from
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    /// Aligned price table read from `prices_file`
    Csv,
    /// Seeded synthetic price paths
    #[default]
    Synthetic,
}

/// Parameters of the synthetic price generator.
///
/// Every asset follows a geometric Brownian motion driven by one common
/// factor, so `correlation` is the pairwise correlation of the shocks.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyntheticConfig {
    /// RNG seed
    pub seed: u64,
    /// Number of prices per asset
    pub periods: usize,
    /// Date of the first price
    pub start_date: NaiveDate,
    /// Price at `start_date`
    pub initial_price: f64,
    /// Annual drift
    pub drift: f64,
    /// Annual volatility
    pub volatility: f64,
    /// Pairwise shock correlation in `[0, 1)`
    pub correlation: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            periods: 252,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            initial_price: 100.0,
            drift: 0.05,
            volatility: 0.20,
            correlation: 0.3,
        }
    }
}

/// Lab configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LabConfig {
    /// Data source
    #[serde(default)]
    pub mode: DataMode,

    /// Data directory path
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Price table, relative to `data_dir`
    #[serde(default = "default_prices_file")]
    pub prices_file: PathBuf,

    /// Report directory, relative to `data_dir`
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Return convention
    #[serde(default)]
    pub return_mode: ReturnMode,

    /// Rolling volatility window in periods
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,

    /// Risk-free rate per period
    #[serde(default)]
    pub risk_free_rate: f64,

    /// Return periods per year
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,

    /// Accept negative weights
    #[serde(default)]
    pub allow_short: bool,

    /// Maximum allowed `|Σw - 1|`
    #[serde(default = "default_weight_tolerance")]
    pub weight_tolerance: f64,

    /// Item count from which tables and scenarios are processed in parallel
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// Price column used as the beta benchmark
    pub benchmark: Option<String>,

    /// Portfolio weights by asset
    #[serde(default = "default_weights")]
    pub weights: BTreeMap<String, f64>,

    /// Preset scenarios to run
    #[serde(default = "default_presets")]
    pub presets: Vec<PresetScenarioType>,

    /// Additional user-defined scenarios
    #[serde(default)]
    pub scenarios: Vec<StressScenario>,

    /// Shock applied to each holding in turn, if set
    pub sweep_shock: Option<f64>,

    /// Synthetic generator parameters
    #[serde(default)]
    pub synthetic: SyntheticConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("demo/finrisk_lab/data")
}

fn default_prices_file() -> PathBuf {
    PathBuf::from("input/prices.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_rolling_window() -> usize {
    21
}

fn default_periods_per_year() -> f64 {
    252.0
}

fn default_weight_tolerance() -> f64 {
    1e-6
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

fn default_weights() -> BTreeMap<String, f64> {
    [("EQ_US", 0.4), ("EQ_EU", 0.3), ("BOND", 0.2), ("GOLD", 0.1)]
        .into_iter()
        .map(|(asset, w)| (asset.to_string(), w))
        .collect()
}

fn default_presets() -> Vec<PresetScenarioType> {
    PresetScenarioType::all()
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            mode: DataMode::default(),
            data_dir: default_data_dir(),
            prices_file: default_prices_file(),
            output_dir: default_output_dir(),
            log_level: default_log_level(),
            return_mode: ReturnMode::default(),
            rolling_window: default_rolling_window(),
            risk_free_rate: 0.0,
            periods_per_year: default_periods_per_year(),
            allow_short: false,
            weight_tolerance: default_weight_tolerance(),
            parallel_threshold: default_parallel_threshold(),
            benchmark: None,
            weights: default_weights(),
            presets: default_presets(),
            scenarios: Vec::new(),
            sweep_shock: None,
            synthetic: SyntheticConfig::default(),
        }
    }
}

impl LabConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from default path or return default config
    pub fn load_or_default() -> Self {
        Self::load(Path::new(DEFAULT_CONFIG_PATH)).unwrap_or_default()
    }

    /// Apply environment variable overrides
    pub fn with_env_override(mut self) -> Self {
        if let Ok(mode) = std::env::var("FINRISK_MODE") {
            self.mode = match mode.to_lowercase().as_str() {
                "csv" => DataMode::Csv,
                "synthetic" => DataMode::Synthetic,
                _ => self.mode,
            };
        }

        if let Ok(data_dir) = std::env::var("FINRISK_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(prices_file) = std::env::var("FINRISK_PRICES_FILE") {
            self.prices_file = PathBuf::from(prices_file);
        }

        if let Ok(output_dir) = std::env::var("FINRISK_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(output_dir);
        }

        if let Ok(log_level) = std::env::var("FINRISK_LOG_LEVEL") {
            self.log_level = log_level;
        }

        if let Ok(rate) = std::env::var("FINRISK_RISK_FREE_RATE") {
            if let Ok(rate) = rate.parse() {
                self.risk_free_rate = rate;
            }
        }

        if let Ok(window) = std::env::var("FINRISK_ROLLING_WINDOW") {
            if let Ok(window) = window.parse() {
                self.rolling_window = window;
            }
        }

        if let Ok(seed) = std::env::var("FINRISK_SEED") {
            if let Ok(seed) = seed.parse() {
                self.synthetic.seed = seed;
            }
        }

        self
    }

    /// Validate the configuration
    ///
    /// Every problem found is reported, not just the first. Weight sums are
    /// left to the engine, which knows the asset universe.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, valid_log_levels
            ));
        }

        if self.data_dir.as_os_str().is_empty() {
            errors.push("data_dir cannot be empty".to_string());
        }

        if self.rolling_window < 2 {
            errors.push(format!(
                "rolling_window must be at least 2, got {}",
                self.rolling_window
            ));
        }

        if !self.risk_free_rate.is_finite() {
            errors.push("risk_free_rate must be finite".to_string());
        }

        if !(self.periods_per_year.is_finite() && self.periods_per_year > 0.0) {
            errors.push(format!(
                "periods_per_year must be positive, got {}",
                self.periods_per_year
            ));
        }

        if !(self.weight_tolerance.is_finite() && self.weight_tolerance > 0.0) {
            errors.push(format!(
                "weight_tolerance must be positive, got {}",
                self.weight_tolerance
            ));
        }

        if self.weights.is_empty() {
            errors.push("weights cannot be empty".to_string());
        }
        for (asset, w) in &self.weights {
            if !w.is_finite() {
                errors.push(format!("weight for {} is not finite", asset));
            }
        }

        if let Some(benchmark) = &self.benchmark {
            if benchmark.trim().is_empty() {
                errors.push("benchmark cannot be an empty name".to_string());
            }
        }

        let bounds = ScenarioBounds::default();
        for scenario in &self.scenarios {
            if let Err(e) = scenario.configure(&bounds) {
                errors.push(format!("scenario '{}': {}", scenario.name, e));
            }
        }

        if let Some(shock) = self.sweep_shock {
            if !(bounds.min_shock..=bounds.max_shock).contains(&shock) {
                errors.push(format!(
                    "sweep_shock must lie in [{}, {}], got {}",
                    bounds.min_shock, bounds.max_shock, shock
                ));
            }
        }

        if self.mode == DataMode::Synthetic {
            self.validate_synthetic(&mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn validate_synthetic(&self, errors: &mut Vec<String>) {
        let synthetic = &self.synthetic;
        if synthetic.periods <= self.rolling_window {
            errors.push(format!(
                "synthetic periods ({}) must exceed rolling_window ({})",
                synthetic.periods, self.rolling_window
            ));
        }
        if !(synthetic.initial_price.is_finite() && synthetic.initial_price > 0.0) {
            errors.push("synthetic initial_price must be positive".to_string());
        }
        if !(synthetic.volatility.is_finite() && synthetic.volatility >= 0.0) {
            errors.push("synthetic volatility must be non-negative".to_string());
        }
        if !synthetic.drift.is_finite() {
            errors.push("synthetic drift must be finite".to_string());
        }
        if !(0.0..1.0).contains(&synthetic.correlation) {
            errors.push(format!(
                "synthetic correlation must lie in [0, 1), got {}",
                synthetic.correlation
            ));
        }
    }

    /// Load configuration from file and validate
    pub fn load_and_validate(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file with environment overrides and validate
    pub fn load_with_env_and_validate(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(path)?.with_env_override();
        config.validate()?;
        Ok(config)
    }

    /// Full path of the price table
    pub fn prices_path(&self) -> PathBuf {
        self.data_dir.join(&self.prices_file)
    }

    /// Full path of the report directory
    pub fn output_path(&self) -> PathBuf {
        self.data_dir.join(&self.output_dir)
    }

    /// Parallel execution policy
    pub fn parallel_config(&self) -> ParallelConfig {
        ParallelConfig::new(self.parallel_threshold)
    }

    /// Per-asset analysis settings
    ///
    /// # Errors
    /// `InsufficientData` if `periods_per_year` is not positive.
    pub fn analysis_config(&self) -> RiskResult<AnalysisConfig> {
        Ok(AnalysisConfig::default()
            .with_return_mode(self.return_mode)
            .with_rolling_window(self.rolling_window)
            .with_risk_free_rate(self.risk_free_rate)
            .with_annualisation(self.annualisation()?)
            .with_parallel(self.parallel_config()))
    }

    /// Annualisation convention
    pub fn annualisation(&self) -> RiskResult<Annualisation> {
        Annualisation::new(self.periods_per_year)
    }

    /// Weight validation rules
    pub fn weight_policy(&self) -> WeightPolicy {
        WeightPolicy::default()
            .with_tolerance(self.weight_tolerance)
            .with_short(self.allow_short)
    }

    /// Raw portfolio weights
    pub fn portfolio_weights(&self) -> PortfolioWeights {
        self.weights
            .iter()
            .map(|(asset, w)| (asset.as_str(), *w))
            .collect()
    }
}

/// Configuration error type
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error reading config file
    Io(String),
    /// Parse error in config file
    Parse(String),
    /// Validation error
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {}", msg),
            Self::Parse(msg) => write!(f, "Parse error: {}", msg),
            Self::Validation(errors) => write!(f, "Validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {}
