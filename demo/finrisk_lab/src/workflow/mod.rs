//! Lab workflow definitions and implementations.
//!
//! Provides the trait interface and implementations for lab workflows:
//! - Risk analysis (per-asset statistics, correlation, portfolio risk)
//! - Stress testing (preset and configured scenarios)

mod analysis;

pub use analysis::AnalysisWorkflow;
pub use stress_test::StressTestWorkflow;

use crate::config::LabConfig;
use crate::error::LabError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// Workflow processing step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    /// Loading price data
    LoadingPrices,
    /// Computing per-asset statistics
    AssetStatistics,
    /// Aggregating portfolio risk
    PortfolioRisk,
    /// Running stress scenarios
    StressTesting,
    /// Generating reports
    GeneratingReports,
    /// Workflow completed
    Completed,
}

impl WorkflowStep {
    /// Get the step name for display
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadingPrices => "Loading Prices",
            Self::AssetStatistics => "Asset Statistics",
            Self::PortfolioRisk => "Portfolio Risk",
            Self::StressTesting => "Stress Testing",
            Self::GeneratingReports => "Generating Reports",
            Self::Completed => "Completed",
        }
    }
}

/// Progress callback type for reporting workflow progress
pub type ProgressCallback = Arc<dyn Fn(WorkflowStep, f64) + Send + Sync>;

pub(crate) fn report_progress(progress: &Option<ProgressCallback>, step: WorkflowStep, pct: f64) {
    if let Some(cb) = progress {
        cb(step, pct);
    }
}

/// Workflow execution result
#[derive(Debug, Clone, Default)]
pub struct WorkflowResult {
    /// Whether the workflow completed successfully
    pub success: bool,
    /// Execution duration in milliseconds
    pub duration_ms: u64,
    /// Number of assets analysed
    pub assets_processed: usize,
    /// Number of stress scenarios evaluated
    pub scenarios_run: usize,
    /// Written report, if any
    pub report_path: Option<PathBuf>,
    /// List of non-fatal errors encountered
    pub errors: Vec<String>,
}

impl WorkflowResult {
    /// Create a successful result
    pub fn success(duration_ms: u64, assets_processed: usize) -> Self {
        Self {
            success: true,
            duration_ms,
            assets_processed,
            ..Self::default()
        }
    }

    /// Create a failure result
    pub fn failure(duration_ms: u64, errors: Vec<String>) -> Self {
        Self {
            success: false,
            duration_ms,
            errors,
            ..Self::default()
        }
    }

    /// Create the result of a workflow stopped by [`RiskWorkflow::cancel`]
    pub fn cancelled(duration_ms: u64) -> Self {
        Self::failure(duration_ms, vec![LabError::Cancelled.to_string()])
    }

    /// Record the number of scenarios evaluated
    pub fn with_scenarios(mut self, scenarios_run: usize) -> Self {
        self.scenarios_run = scenarios_run;
        self
    }

    /// Record the written report
    pub fn with_report(mut self, path: PathBuf) -> Self {
        self.report_path = Some(path);
        self
    }

    /// Add an error to the result
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }

    /// Check whether the workflow stopped on cancellation
    pub fn was_cancelled(&self) -> bool {
        !self.success && self.errors.iter().any(|e| e.contains("cancelled"))
    }
}

/// Lab workflow trait
///
/// All lab workflows implement this trait for unified execution. Engine
/// failures are returned as `Err`; cancellation is reported as a failed
/// [`WorkflowResult`]. A cancelled workflow stays cancelled until
/// [`RiskWorkflow::reset`] is called.
#[async_trait]
pub trait RiskWorkflow: Send + Sync {
    /// Get the workflow name
    fn name(&self) -> &str;

    /// Execute the workflow
    async fn run(
        &self,
        config: &LabConfig,
        progress: Option<ProgressCallback>,
    ) -> Result<WorkflowResult, LabError>;

    /// Cancel the workflow
    async fn cancel(&self);

    /// Clear a previous cancellation
    fn reset(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_step_names() {
        assert_eq!(WorkflowStep::LoadingPrices.name(), "Loading Prices");
        assert_eq!(WorkflowStep::Completed.name(), "Completed");
    }

    #[test]
    fn test_workflow_result() {
        let result = WorkflowResult::success(1000, 4).with_scenarios(5);
        assert!(result.success);
        assert_eq!(result.assets_processed, 4);
        assert_eq!(result.scenarios_run, 5);

        let result = WorkflowResult::failure(500, vec!["error".to_string()]);
        assert!(!result.success);
        assert_eq!(result.errors.len(), 1);
        assert!(!result.was_cancelled());

        assert!(WorkflowResult::cancelled(10).was_cancelled());
    }
}
