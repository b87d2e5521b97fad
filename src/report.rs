//! Result records handed back to callers.

use std::time::Instant;

use serde::Serialize;

use crate::aggregate::{AggregateResult, ResultAggregator};
use crate::colony::RunResult;
use crate::error::{Result, SimError};
use crate::monte_carlo::{MonteCarloOrchestrator, OrchestratorSettings};
use crate::params::ParameterSet;

/// Flat totals and monthly series of one unperturbed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleRunReport {
    pub final_population: f64,
    pub final_sterilized: f64,
    pub total_cost: f64,
    pub total_deaths: f64,
    pub total_births: f64,
    pub kitten_deaths: f64,
    pub adult_deaths: f64,
    pub natural_deaths: f64,
    pub urban_deaths: f64,
    pub disease_deaths: f64,
    pub population_growth: f64,
    pub monthly_populations: Vec<f64>,
    pub monthly_sterilized: Vec<f64>,
    pub monthly_sterile_adults: Vec<f64>,
    pub monthly_reproductive: Vec<f64>,
    pub monthly_kittens: Vec<f64>,
    pub monthly_costs: Vec<f64>,
    pub monthly_births: Vec<f64>,
}

impl SingleRunReport {
    pub fn from_run(run: &RunResult) -> Result<Self> {
        let last = run
            .final_state()
            .ok_or_else(|| SimError::invalid("months", "run produced no snapshots"))?;
        Ok(Self {
            final_population: run.final_population,
            final_sterilized: last.sterilized_count,
            total_cost: run.total_cost,
            total_deaths: run.total_deaths,
            total_births: last.cumulative_births,
            kitten_deaths: last.deaths.kitten,
            adult_deaths: last.deaths.adult,
            natural_deaths: last.deaths.natural,
            urban_deaths: last.deaths.urban,
            disease_deaths: last.deaths.disease,
            population_growth: run.population_growth,
            monthly_populations: run.series(|s| s.current_size),
            monthly_sterilized: run.series(|s| s.sterilized_count),
            monthly_sterile_adults: run.series(|s| s.sterile_adults),
            monthly_reproductive: run.series(|s| s.reproductive_count),
            monthly_kittens: run.series(|s| s.kitten_count),
            monthly_costs: run.series(|s| s.cumulative_cost),
            monthly_births: run.monthly_births(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonteCarloReport {
    pub num_simulations: usize,
    pub variation_coefficient: f64,
    #[serde(flatten)]
    pub aggregate: AggregateResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProjectionReport {
    SingleRun(SingleRunReport),
    MonteCarlo(MonteCarloReport),
}

impl ProjectionReport {
    pub fn is_monte_carlo(&self) -> bool {
        matches!(self, ProjectionReport::MonteCarlo(_))
    }
}

/// Run a full projection: one deterministic run, or a perturbed ensemble
/// reduced to percentile summaries.
pub fn project(params: &ParameterSet, settings: OrchestratorSettings) -> Result<ProjectionReport> {
    let orchestrator = MonteCarloOrchestrator::new(settings)?;
    project_with(&orchestrator, params)
}

/// Same as [`project`], reusing an existing orchestrator and its pool.
pub fn project_with(
    orchestrator: &MonteCarloOrchestrator,
    params: &ParameterSet,
) -> Result<ProjectionReport> {
    let started = Instant::now();
    let control = params.control();
    tracing::info!(
        months = control.months,
        monte_carlo = params.is_monte_carlo(),
        simulations = control.num_simulations,
        "projection started"
    );

    let runs = orchestrator.run(params)?;
    let report = if params.is_monte_carlo() {
        let aggregate = ResultAggregator::new().aggregate(&runs)?;
        ProjectionReport::MonteCarlo(MonteCarloReport {
            num_simulations: runs.len(),
            variation_coefficient: control.variation_coefficient,
            aggregate,
        })
    } else {
        let run = runs
            .first()
            .ok_or_else(|| SimError::invalid("num_simulations", "no run was produced"))?;
        ProjectionReport::SingleRun(SingleRunReport::from_run(run)?)
    };

    tracing::info!(
        runs = runs.len(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1_000.0,
        "projection finished"
    );
    Ok(report)
}
