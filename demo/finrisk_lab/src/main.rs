//! FinRisk Lab CLI
//!
//! Entry point for running the analysis and stress workflows.
//!
//! # Commands
//!
//! - `finrisk-lab analyse` - Per-asset and portfolio risk analysis
//! - `finrisk-lab stress` - Stress scenarios against the portfolio
//! - `finrisk-lab run` - Both, in that order

use anyhow::Result;
use clap::{Parser, Subcommand};
use finrisk_lab::config::{ConfigError, DEFAULT_CONFIG_PATH};
use finrisk_lab::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// FinRisk portfolio risk lab
#[derive(Parser)]
#[command(name = "finrisk-lab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Log workflow progress
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute asset statistics and portfolio risk
    Analyse,
    /// Run stress scenarios
    Stress,
    /// Run the analysis, then the stress test
    Run,
}

fn load_config(path: &Path) -> Result<LabConfig, ConfigError> {
    if path.exists() {
        LabConfig::load_with_env_and_validate(path)
    } else {
        let config = LabConfig::default().with_env_override();
        config.validate()?;
        Ok(config)
    }
}

async fn execute(
    workflow: &dyn RiskWorkflow,
    config: &LabConfig,
    progress: Option<ProgressCallback>,
) -> Result<()> {
    let result = workflow.run(config, progress).await?;
    if !result.success {
        anyhow::bail!("{} failed: {}", workflow.name(), result.errors.join("; "));
    }
    for error in &result.errors {
        tracing::warn!(workflow = workflow.name(), "{}", error);
    }
    if let Some(path) = &result.report_path {
        println!("{}: {}", workflow.name(), path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config);

    let level = config
        .as_ref()
        .map(|c| c.log_level.to_lowercase())
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(format!("finrisk_lab={}", level).parse()?))
        .init();

    if !cli.config.exists() {
        tracing::warn!(
            path = %cli.config.display(),
            "Configuration file not found, using defaults"
        );
    }
    let config = config?;
    tracing::info!(mode = ?config.mode, "FinRisk Lab starting");

    let progress: Option<ProgressCallback> = cli.verbose.then(|| {
        Arc::new(|step: WorkflowStep, pct: f64| {
            tracing::info!(step = step.name(), progress = pct, "Workflow progress");
        }) as ProgressCallback
    });

    match cli.command {
        Commands::Analyse => execute(&AnalysisWorkflow::new(), &config, progress).await?,
        Commands::Stress => execute(&StressTestWorkflow::new(), &config, progress).await?,
        Commands::Run => {
            execute(&AnalysisWorkflow::new(), &config, progress.clone()).await?;
            execute(&StressTestWorkflow::new(), &config, progress).await?;
        }
    }

    Ok(())
}
