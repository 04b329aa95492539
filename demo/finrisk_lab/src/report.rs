//! Risk reports and their file sink.

use crate::config::LabConfig;
use crate::error::LabError;
use finrisk_core::stats::CorrelationMatrix;
use finrisk_core::types::ReturnMode;
use finrisk_metrics::AssetStats;
use finrisk_portfolio::{PortfolioPerformance, PortfolioRisk};
use finrisk_stress::StressResult;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Settings a report was produced under.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSettings {
    /// Return convention
    pub return_mode: ReturnMode,
    /// Rolling volatility window
    pub rolling_window: usize,
    /// Risk-free rate per period
    pub risk_free_rate: f64,
    /// Return periods per year
    pub periods_per_year: f64,
    /// Beta benchmark
    pub benchmark: Option<String>,
}

impl From<&LabConfig> for ReportSettings {
    fn from(config: &LabConfig) -> Self {
        Self {
            return_mode: config.return_mode,
            rolling_window: config.rolling_window,
            risk_free_rate: config.risk_free_rate,
            periods_per_year: config.periods_per_year,
            benchmark: config.benchmark.clone(),
        }
    }
}

/// Per-asset and portfolio-level analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSection {
    /// Statistics of every loaded price column
    pub asset_stats: Vec<AssetStats>,
    /// Correlations of the held assets
    pub correlation: CorrelationMatrix,
    /// Aggregated portfolio risk
    pub portfolio: PortfolioRisk,
    /// Realised performance of the weighted portfolio
    pub performance: PortfolioPerformance,
}

/// Stress scenario outcomes.
#[derive(Debug, Clone, Serialize)]
pub struct StressSection {
    /// One result per scenario, in registration order
    pub results: Vec<StressResult>,
    /// Scenario with the most negative shock return
    pub worst_case: Option<String>,
    /// Shock return of `worst_case`
    pub worst_case_return: Option<f64>,
    /// Scenario with the highest stressed volatility
    pub worst_case_by_volatility: Option<String>,
    /// Concentration sweep, one result per holding
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sweep: Vec<StressResult>,
}

/// A complete risk report.
#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    /// Unique report identifier, also the file stem
    pub report_id: String,
    /// Human-readable title
    pub title: String,
    /// RFC 3339 timestamp
    pub generated_at: String,
    /// Settings in effect
    pub settings: ReportSettings,
    /// Analysis results, if the analysis ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisSection>,
    /// Stress results, if scenarios ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stress: Option<StressSection>,
}

impl RiskReport {
    /// Create an empty report stamped with the current time.
    pub fn new(prefix: &str, title: impl Into<String>, config: &LabConfig) -> Self {
        let now = chrono::Utc::now();
        Self {
            report_id: format!("{}_{}", prefix, now.format("%Y%m%d_%H%M%S_%3f")),
            title: title.into(),
            generated_at: now.to_rfc3339(),
            settings: ReportSettings::from(config),
            analysis: None,
            stress: None,
        }
    }

    /// Attach the analysis section.
    pub fn with_analysis(mut self, analysis: AnalysisSection) -> Self {
        self.analysis = Some(analysis);
        self
    }

    /// Attach the stress section.
    pub fn with_stress(mut self, stress: StressSection) -> Self {
        self.stress = Some(stress);
        self
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, LabError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Writes reports as JSON files into one directory.
#[derive(Debug, Clone)]
pub struct FileWriter {
    output_dir: PathBuf,
}

impl FileWriter {
    /// Create a writer for `output_dir`.
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Target directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write `report` to `<output_dir>/<report_id>.json`, creating the
    /// directory if needed.
    pub fn write(&self, report: &RiskReport) -> Result<PathBuf, LabError> {
        fs::create_dir_all(&self.output_dir)?;
        let content = report.to_json()?;
        let path = self.output_dir.join(format!("{}.json", report.report_id));
        fs::write(&path, &content)?;

        info!(
            path = %path.display(),
            report_id = %report.report_id,
            size = content.len(),
            "Report written to file"
        );

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_id_prefix() {
        let report = RiskReport::new("STRESS", "Stress Test Results", &LabConfig::default());
        assert!(report.report_id.starts_with("STRESS_"));
        assert_eq!(report.settings.rolling_window, 21);
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let report = RiskReport::new("ANALYSIS", "Risk Analysis", &LabConfig::default());
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert!(json.get("analysis").is_none());
        assert!(json.get("stress").is_none());
        assert_eq!(json["settings"]["return_mode"], "simple");
    }

    #[test]
    fn test_file_writer_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path().join("nested/output"));
        let report = RiskReport::new("ANALYSIS", "Risk Analysis", &LabConfig::default());

        let path = writer.write(&report).unwrap();
        assert!(path.exists());
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            format!("{}.json", report.report_id)
        );

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("Risk Analysis"));
    }
}
