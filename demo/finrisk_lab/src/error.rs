//! Error types for the FinRisk lab.

use finrisk_core::types::RiskError;
use thiserror::Error;

/// Lab error type
#[derive(Debug, Error)]
pub enum LabError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Engine rejected its inputs
    #[error("Risk engine error: {0}")]
    Risk(#[from] RiskError),

    /// Data loading error
    #[error("Data loading error: {0}")]
    DataLoad(String),

    /// CSV decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Report serialisation error
    #[error("Serialisation error: {0}")]
    Serialise(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Workflow execution error
    #[error("Workflow execution error: {0}")]
    Workflow(String),

    /// Workflow cancelled
    #[error("Workflow cancelled")]
    Cancelled,
}

impl LabError {
    /// Create a data loading error
    pub fn data_load(msg: impl Into<String>) -> Self {
        Self::DataLoad(msg.into())
    }

    /// Create a workflow error
    pub fn workflow(msg: impl Into<String>) -> Self {
        Self::Workflow(msg.into())
    }
}
