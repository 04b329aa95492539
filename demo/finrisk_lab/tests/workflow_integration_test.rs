//! Workflow Integration Tests
//!
//! Runs the workflows end to end against the shipped configuration and
//! sample price table, and against small hand-written CSV fixtures.

use approx::assert_relative_eq;
use finrisk_core::types::RiskError;
use finrisk_lab::config::{DataMode, LabConfig};
use finrisk_lab::error::LabError;
use finrisk_lab::session::PortfolioSession;
use finrisk_lab::workflow::{AnalysisWorkflow, RiskWorkflow, StressTestWorkflow, WorkflowStep};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

fn lab_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Shipped configuration, redirected to the crate's data and a temp output dir.
fn shipped_config(output: &Path) -> LabConfig {
    let mut config = LabConfig::load(&lab_dir().join("data/config/lab_config.toml")).unwrap();
    config.data_dir = lab_dir().join("data");
    config.output_dir = output.to_path_buf();
    config
}

fn csv_config(dir: &Path, csv: &str, weights: &[(&str, f64)]) -> LabConfig {
    std::fs::write(dir.join("prices.csv"), csv).unwrap();
    let mut config = LabConfig::default();
    config.mode = DataMode::Csv;
    config.data_dir = dir.to_path_buf();
    config.prices_file = PathBuf::from("prices.csv");
    config.rolling_window = 2;
    config.weights = weights.iter().map(|(a, w)| (a.to_string(), *w)).collect();
    config
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_shipped_config_validates() {
    let dir = tempfile::tempdir().unwrap();
    let config = shipped_config(dir.path());
    assert!(config.validate().is_ok());
    assert_eq!(config.mode, DataMode::Csv);
    assert_eq!(config.scenarios.len(), 3);
    assert_eq!(config.benchmark.as_deref(), Some("MKT"));
}

#[tokio::test]
async fn test_analysis_with_progress() {
    let dir = tempfile::tempdir().unwrap();
    let config = shipped_config(dir.path());

    let steps = Arc::new(Mutex::new(Vec::new()));
    let steps_clone = steps.clone();
    let progress = Arc::new(move |step: WorkflowStep, pct: f64| {
        steps_clone.lock().unwrap().push((step, pct));
    });

    let result = AnalysisWorkflow::new()
        .run(&config, Some(progress))
        .await
        .unwrap();
    assert!(result.success);
    // Four holdings plus the benchmark column.
    assert_eq!(result.assets_processed, 5);

    let recorded: Vec<_> = steps.lock().unwrap().iter().map(|(s, _)| *s).collect();
    assert!(recorded.contains(&WorkflowStep::LoadingPrices));
    assert!(recorded.contains(&WorkflowStep::AssetStatistics));
    assert_eq!(recorded.last(), Some(&WorkflowStep::Completed));

    let report = read_json(&result.report_path.unwrap());
    let stats = report["analysis"]["asset_stats"].as_array().unwrap();
    assert_eq!(stats.len(), 5);
    let mkt = stats.iter().find(|s| s["asset"] == "MKT").unwrap();
    assert_relative_eq!(mkt["beta"].as_f64().unwrap(), 1.0, epsilon = 1e-9);

    let contributions = report["analysis"]["portfolio"]["risk_contributions"]
        .as_array()
        .unwrap();
    let total: f64 = contributions.iter().map(|c| c.as_f64().unwrap()).sum();
    assert_relative_eq!(total, 1.0, epsilon = 1e-9);
    assert!(report["analysis"]["portfolio"]["diversification_benefit"].as_f64().unwrap() >= 0.0);
    assert!(report.get("stress").is_none());
}

#[tokio::test]
async fn test_stress_with_shipped_scenarios() {
    let dir = tempfile::tempdir().unwrap();
    let config = shipped_config(dir.path());

    let result = StressTestWorkflow::new().run(&config, None).await.unwrap();
    assert!(result.success);
    // Five presets, three configured scenarios, one sweep entry per holding.
    assert_eq!(result.scenarios_run, 5 + 3 + 4);

    let report = read_json(&result.report_path.unwrap());
    let stress = &report["stress"];
    assert_eq!(stress["results"].as_array().unwrap().len(), 8);
    assert_eq!(stress["sweep"].as_array().unwrap().len(), 4);
    assert!(stress["worst_case"].is_string());
    assert!(stress["worst_case_return"].as_f64().unwrap() < 0.0);
}

#[test]
fn test_reference_prices_through_csv() {
    let dir = tempfile::tempdir().unwrap();
    let config = csv_config(
        dir.path(),
        "date,A\n2024-01-01,100\n2024-01-02,90\n2024-01-03,95\n2024-01-04,80\n",
        &[("A", 1.0)],
    );
    let session = PortfolioSession::load(&config).unwrap();

    let returns = session.inputs().returns().column(0);
    assert_relative_eq!(returns[0], -0.10, epsilon = 1e-12);
    assert!((returns[1] - 0.0556).abs() < 1e-4);
    assert!((returns[2] + 0.1579).abs() < 1e-4);

    let section = AnalysisWorkflow::analyse(&config, &session).unwrap();
    assert_relative_eq!(section.asset_stats[0].max_drawdown, -0.20, epsilon = 1e-12);
    // Single asset: all risk is its own and nothing is diversified away.
    assert_eq!(section.portfolio.risk_contributions, vec![1.0]);
    assert_eq!(section.portfolio.diversification_benefit, 0.0);
}

#[test]
fn test_market_shock_through_csv() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = csv_config(
        dir.path(),
        "date,A,B\n2024-01-01,100,50\n2024-01-02,101,50.5\n2024-01-03,99,50.2\n2024-01-04,102,49.9\n",
        &[("A", 0.5), ("B", 0.5)],
    );
    config.presets = vec![finrisk_stress::scenarios::PresetScenarioType::MarketDown30Pct];
    let session = PortfolioSession::load(&config).unwrap();
    let before = session.inputs().clone();

    let section = StressTestWorkflow::new().stress(&config, &session).unwrap();
    let result = &section.results[0];
    assert_relative_eq!(result.shock_return, -0.3, epsilon = 1e-12);
    for (_, shock) in &result.asset_shock_returns {
        assert_relative_eq!(*shock, -0.3, epsilon = 1e-12);
    }
    assert_eq!(session.inputs(), &before);
}

#[tokio::test]
async fn test_invalid_weights_reported_as_engine_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = csv_config(
        dir.path(),
        "date,A,B\n2024-01-01,100,50\n2024-01-02,101,51\n2024-01-03,102,50\n",
        &[("A", 0.6), ("B", 0.5)],
    );

    let err = AnalysisWorkflow::new().run(&config, None).await.unwrap_err();
    assert!(matches!(err, LabError::Risk(RiskError::InvalidWeights(_))));
}

#[tokio::test]
async fn test_workflows_as_trait_objects() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = LabConfig::default();
    config.data_dir = dir.path().to_path_buf();
    config.synthetic.periods = 40;

    let workflows: Vec<Box<dyn RiskWorkflow>> = vec![
        Box::new(AnalysisWorkflow::new()),
        Box::new(StressTestWorkflow::new()),
    ];
    for workflow in &workflows {
        let result = workflow.run(&config, None).await.unwrap();
        assert!(result.success, "{} failed", workflow.name());
    }
    assert_eq!(std::fs::read_dir(config.output_path()).unwrap().count(), 2);
}
