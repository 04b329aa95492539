//! Risk analysis workflow.
//!
//! Loads prices, computes per-asset statistics and correlations, aggregates
//! portfolio risk and realised performance, then writes a JSON report.

use super::{report_progress, ProgressCallback, RiskWorkflow, WorkflowResult, WorkflowStep};
use crate::config::LabConfig;
use crate::error::LabError;
use crate::report::{AnalysisSection, FileWriter, RiskReport};
use crate::session::PortfolioSession;
use async_trait::async_trait;
use finrisk_metrics::AssetStatsCalculator;
use finrisk_portfolio::{portfolio_performance, PortfolioAggregator};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Risk analysis workflow
pub struct AnalysisWorkflow {
    /// Cancellation flag
    cancelled: Arc<AtomicBool>,
}

impl AnalysisWorkflow {
    /// Create a new analysis workflow
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Run every analysis step on a loaded session.
    pub fn analyse(
        config: &LabConfig,
        session: &PortfolioSession,
    ) -> Result<AnalysisSection, LabError> {
        let calculator = AssetStatsCalculator::new(config.analysis_config()?);
        let asset_stats = calculator.compute_all(session.prices(), session.benchmark())?;

        for stats in &asset_stats {
            tracing::debug!(
                asset = %stats.asset,
                volatility = stats.volatility,
                max_drawdown = stats.max_drawdown,
                sharpe = %stats.sharpe_ratio,
                "asset statistics"
            );
            if !stats.sharpe_ratio.is_defined() {
                tracing::warn!(asset = %stats.asset, "zero volatility; Sharpe ratio undefined");
            }
        }

        let portfolio = PortfolioAggregator::new().aggregate(session.inputs(), session.weights())?;
        let performance = portfolio_performance(
            session.weights(),
            session.inputs().returns(),
            config.risk_free_rate,
            &config.annualisation()?,
        )?;

        tracing::info!(
            volatility = portfolio.total_volatility,
            diversification_benefit = portfolio.diversification_benefit,
            max_drawdown = performance.max_drawdown.depth,
            "portfolio risk aggregated"
        );

        Ok(AnalysisSection {
            asset_stats,
            correlation: session.inputs().correlation().clone(),
            portfolio,
            performance,
        })
    }
}

impl Default for AnalysisWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RiskWorkflow for AnalysisWorkflow {
    fn name(&self) -> &str {
        "Risk Analysis"
    }

    async fn run(
        &self,
        config: &LabConfig,
        progress: Option<ProgressCallback>,
    ) -> Result<WorkflowResult, LabError> {
        let start = Instant::now();
        let elapsed = || start.elapsed().as_millis() as u64;
        let mut errors: Vec<String> = Vec::new();

        tracing::info!(mode = ?config.mode, "Starting Risk Analysis workflow");

        // Step 1: Load prices and validate weights
        report_progress(&progress, WorkflowStep::LoadingPrices, 0.0);
        let session = PortfolioSession::load(config)?;
        report_progress(&progress, WorkflowStep::LoadingPrices, 1.0);

        if self.is_cancelled() {
            return Ok(WorkflowResult::cancelled(elapsed()));
        }

        // Step 2-3: Per-asset statistics, then portfolio aggregation
        report_progress(&progress, WorkflowStep::AssetStatistics, 0.0);
        let section = Self::analyse(config, &session)?;
        report_progress(&progress, WorkflowStep::AssetStatistics, 1.0);
        report_progress(&progress, WorkflowStep::PortfolioRisk, 1.0);

        if self.is_cancelled() {
            return Ok(WorkflowResult::cancelled(elapsed()));
        }

        // Step 4: Write report
        report_progress(&progress, WorkflowStep::GeneratingReports, 0.0);
        let assets_processed = section.asset_stats.len();
        let report = RiskReport::new("ANALYSIS", "Risk Analysis", config).with_analysis(section);
        let report_path = match FileWriter::new(config.output_path()).write(&report) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("Failed to write analysis report: {}", e);
                errors.push(format!("Failed to write analysis report: {}", e));
                None
            }
        };
        report_progress(&progress, WorkflowStep::GeneratingReports, 1.0);
        report_progress(&progress, WorkflowStep::Completed, 1.0);

        let duration_ms = elapsed();
        tracing::info!(
            assets = assets_processed,
            duration_ms,
            "Risk Analysis completed"
        );

        let mut result = WorkflowResult::success(duration_ms, assets_processed);
        result.report_path = report_path;
        result.errors = errors;
        Ok(result)
    }

    async fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        tracing::info!("Risk Analysis workflow cancelled");
    }

    fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataMode;

    fn test_config(dir: &std::path::Path) -> LabConfig {
        let mut config = LabConfig::default();
        config.data_dir = dir.to_path_buf();
        config.synthetic.periods = 60;
        config
    }

    #[tokio::test]
    async fn test_analysis_workflow() {
        let dir = tempfile::tempdir().unwrap();
        let workflow = AnalysisWorkflow::new();

        let result = workflow.run(&test_config(dir.path()), None).await.unwrap();
        assert!(result.success);
        assert_eq!(result.assets_processed, 4);
        assert!(result.errors.is_empty());
        assert!(result.report_path.unwrap().exists());
    }

    #[test]
    fn test_analyse_risk_contributions_sum_to_one() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let session = PortfolioSession::load(&config).unwrap();

        let section = AnalysisWorkflow::analyse(&config, &session).unwrap();
        let total: f64 = section.portfolio.risk_contributions.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(section.portfolio.diversification_benefit >= 0.0);
        assert!(section.performance.max_drawdown.depth <= 0.0);
    }

    #[tokio::test]
    async fn test_invalid_weights_fail_the_workflow() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.weights.insert("EQ_US".to_string(), 0.9);

        let err = AnalysisWorkflow::new().run(&config, None).await.unwrap_err();
        assert!(matches!(err, LabError::Risk(_)));
    }

    #[tokio::test]
    async fn test_missing_csv_fails_the_workflow() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.mode = DataMode::Csv;

        let err = AnalysisWorkflow::new().run(&config, None).await.unwrap_err();
        assert!(matches!(err, LabError::DataLoad(_)));
    }

    #[tokio::test]
    async fn test_cancelled_before_run() {
        let dir = tempfile::tempdir().unwrap();
        let workflow = AnalysisWorkflow::new();
        workflow.cancel().await;

        let result = workflow.run(&test_config(dir.path()), None).await.unwrap();
        assert!(result.was_cancelled());
        assert!(result.report_path.is_none());

        workflow.reset();
        let result = workflow.run(&test_config(dir.path()), None).await.unwrap();
        assert!(result.success);
    }
}
