//! Error taxonomy for the risk engine.
//!
//! Every failure is detected at the point where a poisoned value would
//! otherwise be produced, and returned immediately. Nothing here is
//! transient, so nothing is retried.

use thiserror::Error;

/// Result alias used throughout the engine.
pub type RiskResult<T> = Result<T, RiskError>;

/// Categorised risk engine errors.
///
/// # Variants
/// - `InsufficientData`: Too few observations for a statistic
/// - `InvalidWindow`: Rolling window outside `[2, len]`
/// - `InvalidWeights`: Portfolio weights failed validation
/// - `UndefinedMetric`: Metric has no defined value (e.g. Sharpe at zero volatility)
/// - `ScenarioOutOfBounds`: Stress parameter outside realistic bounds
/// - `DegenerateInput`: Zero-variance or otherwise degenerate data
/// - `DimensionMismatch`: Series or matrices of incompatible shape
/// - `InvalidSeries`: Price series violating ordering or positivity
/// - `UnknownAsset`: Asset not present in the inputs
///
/// # Examples
/// ```
/// use finrisk_core::types::RiskError;
///
/// let err = RiskError::invalid_window("rolling volatility", 1, 10);
/// assert_eq!(format!("{}", err), "Invalid window 1 for rolling volatility of length 10");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RiskError {
    /// Too few observations for the requested statistic.
    #[error("Insufficient data for {context}: got {got}, need at least {need}")]
    InsufficientData {
        /// What was being computed
        context: String,
        /// Number of observations provided
        got: usize,
        /// Minimum number of observations required
        need: usize,
    },

    /// Rolling or shock window outside the series.
    #[error("Invalid window {window} for {context} of length {len}")]
    InvalidWindow {
        /// What the window was applied to
        context: String,
        /// Requested window
        window: usize,
        /// Series length
        len: usize,
    },

    /// Portfolio weights failed validation.
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    /// Metric is undefined for the given inputs.
    #[error("Undefined metric {metric}: {context}")]
    UndefinedMetric {
        /// Metric name
        metric: String,
        /// Why the metric is undefined
        context: String,
    },

    /// Stress scenario parameter outside its realistic range.
    #[error("Scenario parameter {parameter} = {value} outside [{min}, {max}]")]
    ScenarioOutOfBounds {
        /// Parameter name
        parameter: String,
        /// Supplied value
        value: f64,
        /// Lower bound (inclusive)
        min: f64,
        /// Upper bound (inclusive)
        max: f64,
    },

    /// Degenerate input such as a zero-variance series.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Inputs of incompatible shape.
    #[error("Dimension mismatch in {context}: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Where the mismatch was detected
        context: String,
        /// Expected size
        expected: usize,
        /// Actual size
        got: usize,
    },

    /// Series violates ordering or value constraints.
    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    /// Asset not present in the inputs.
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),
}

impl RiskError {
    /// Create an insufficient data error.
    pub fn insufficient_data(context: impl Into<String>, got: usize, need: usize) -> Self {
        Self::InsufficientData {
            context: context.into(),
            got,
            need,
        }
    }

    /// Create an invalid window error.
    pub fn invalid_window(context: impl Into<String>, window: usize, len: usize) -> Self {
        Self::InvalidWindow {
            context: context.into(),
            window,
            len,
        }
    }

    /// Create an undefined metric error.
    pub fn undefined_metric(metric: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UndefinedMetric {
            metric: metric.into(),
            context: context.into(),
        }
    }

    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(context: impl Into<String>, expected: usize, got: usize) -> Self {
        Self::DimensionMismatch {
            context: context.into(),
            expected,
            got,
        }
    }

    /// Create a degenerate input error.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateInput(msg.into())
    }

    /// Attach the failing asset to the error context.
    ///
    /// Variants without a free-form context are returned unchanged.
    pub fn for_asset(self, asset: &str) -> Self {
        match self {
            Self::InsufficientData { context, got, need } => Self::InsufficientData {
                context: format!("{} ({})", context, asset),
                got,
                need,
            },
            Self::InvalidWindow {
                context,
                window,
                len,
            } => Self::InvalidWindow {
                context: format!("{} ({})", context, asset),
                window,
                len,
            },
            Self::UndefinedMetric { metric, context } => Self::UndefinedMetric {
                metric,
                context: format!("{} ({})", context, asset),
            },
            Self::DegenerateInput(msg) => Self::DegenerateInput(format!("{} ({})", msg, asset)),
            Self::InvalidSeries(msg) => Self::InvalidSeries(format!("{} ({})", msg, asset)),
            Self::DimensionMismatch {
                context,
                expected,
                got,
            } => Self::DimensionMismatch {
                context: format!("{} ({})", context, asset),
                expected,
                got,
            },
            other => other,
        }
    }
}
