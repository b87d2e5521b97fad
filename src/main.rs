use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use colony_tnr::{
    report::{project, ProjectionReport},
    scenario::ScenarioLoader,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Colony projection under trap-neuter-return")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/riverside_colony.yaml")]
    scenario: PathBuf,

    /// Override the projection horizon in months
    #[arg(long)]
    months: Option<u32>,

    /// Run a perturbed Monte Carlo ensemble
    #[arg(long)]
    monte_carlo: bool,

    /// Override the number of Monte Carlo simulations
    #[arg(long)]
    simulations: Option<u32>,

    /// Override the variation coefficient used for perturbation
    #[arg(long)]
    variation: Option<f64>,

    /// Override the master seed
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads for the ensemble (defaults to available cores)
    #[arg(long)]
    workers: Option<usize>,

    /// Write the report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct Envelope<'a> {
    scenario: &'a str,
    generated_at: DateTime<Utc>,
    report: &'a ProjectionReport,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let scenario = ScenarioLoader::new(".").load(&cli.scenario)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&scenario.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut control = scenario.control;
    if let Some(months) = cli.months {
        control.months = months;
    }
    if cli.monte_carlo {
        control.use_monte_carlo = true;
    }
    if let Some(simulations) = cli.simulations {
        control.num_simulations = simulations;
    }
    if let Some(variation) = cli.variation {
        control.variation_coefficient = variation;
    }
    let params = scenario
        .builder()
        .control(control)
        .build()
        .with_context(|| format!("Invalid parameters in scenario '{}'", scenario.name))?;

    let mut settings = scenario.settings();
    if let Some(seed) = cli.seed {
        settings.seed = seed;
    }
    if cli.workers.is_some() {
        settings.workers = cli.workers;
    }

    tracing::info!(scenario = %scenario.name, "loaded scenario");
    let report = project(&params, settings)
        .with_context(|| format!("Projection of '{}' failed", scenario.name))?;

    let envelope = Envelope {
        scenario: &scenario.name,
        generated_at: Utc::now(),
        report: &report,
    };
    let json = if cli.pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
