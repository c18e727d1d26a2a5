//! f2sweep command-line entry point

use anyhow::{Context, Result};
use clap::Parser;
use f2sweep_cli::{Cli, Driver, DriverOptions, ResultLog};
use f2sweep_solver::{ExternalSolver, HealthStatus, Solver};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    let config = cli.into_config()?;
    config.validate()?;

    let solver = ExternalSolver::with_config(config.solver.clone());
    if let HealthStatus::Unavailable { reason } = solver.health_check().await {
        warn!(solver = solver.name(), %reason, "Solver unavailable, candidates will be indeterminate");
    }

    let mut log = ResultLog::create(&config.output)
        .with_context(|| format!("failed to create result log {}", config.output.display()))?;
    info!(
        output = %config.output.display(),
        variable_counts = ?config.variable_counts,
        subset_sizes = ?config.subset_sizes(),
        "Starting run"
    );

    let driver = Driver::new(&solver, DriverOptions::from(&config));
    let stdout = std::io::stdout();
    let summary = driver
        .run_all(&config.variable_counts, &mut log, &mut stdout.lock())
        .await?;
    log.finish().context("failed to flush result log")?;

    info!(output = %config.output.display(), entries = summary.candidates(), "Result log written");

    if let Some(path) = &config.summary {
        summary.write_json(path)?;
        info!(path = %path.display(), "Wrote run summary");
    }
    Ok(())
}
