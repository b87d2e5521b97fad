//! Reduction of a Monte Carlo ensemble to percentile summaries.
//!
//! Confidence bounds are the empirical 2.5th and 97.5th percentiles of the
//! sorted run values, taken at index `floor(N × p)`. Time series are reduced
//! independently at every month. The ensemble is treated as an unordered
//! multiset: every reduction sorts its own copy of the values.

use serde::Serialize;

use crate::colony::{ColonyState, RunResult};
use crate::error::{Result, SimError};

pub const CI_LOWER_PERCENTILE: f64 = 0.025;
pub const CI_UPPER_PERCENTILE: f64 = 0.975;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSummary {
    pub mean: f64,
    pub std: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl MetricSummary {
    /// Summary of a non-empty sample; `None` when `values` is empty.
    ///
    /// A constant sample reports its value exactly with zero spread. The mean
    /// never leaves `[ci_lower, ci_upper]`.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let (&lowest, &highest) = (sorted.first()?, sorted.last()?);
        if lowest == highest {
            return Some(Self {
                mean: lowest,
                std: 0.0,
                ci_lower: lowest,
                ci_upper: lowest,
            });
        }

        let n = sorted.len() as f64;
        let ci_lower = percentile(&sorted, CI_LOWER_PERCENTILE);
        let ci_upper = percentile(&sorted, CI_UPPER_PERCENTILE);
        let mean = compensated_sum(sorted.iter().copied()) / n;
        let squares = compensated_sum(sorted.iter().map(|v| (v - mean).powi(2)));
        Some(Self {
            mean: mean.clamp(ci_lower, ci_upper),
            std: (squares / (n - 1.0)).sqrt(),
            ci_lower,
            ci_upper,
        })
    }

    pub fn ci_width(&self) -> f64 {
        self.ci_upper - self.ci_lower
    }
}

/// Value at index `floor(len × p)` of an ascending, non-empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let index = (sorted.len() as f64 * p.clamp(0.0, 1.0)).floor() as usize;
    sorted[index.min(sorted.len() - 1)]
}

/// Neumaier summation; keeps long sums of near-equal values exact to the last
/// bit or two.
fn compensated_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut compensation = 0.0;
    for value in values {
        let total = sum + value;
        if sum.abs() >= value.abs() {
            compensation += (sum - total) + value;
        } else {
            compensation += (value - total) + sum;
        }
        sum = total;
    }
    sum + compensation
}

/// Per-run share of deaths by cause and by age class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MortalityBreakdown {
    pub natural_share: MetricSummary,
    pub urban_share: MetricSummary,
    pub disease_share: MetricSummary,
    pub kitten_share: MetricSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub num_runs: usize,
    pub final_population: MetricSummary,
    pub final_sterilized: MetricSummary,
    pub total_cost: MetricSummary,
    pub total_deaths: MetricSummary,
    pub total_births: MetricSummary,
    pub kitten_deaths: MetricSummary,
    pub adult_deaths: MetricSummary,
    pub natural_deaths: MetricSummary,
    pub urban_deaths: MetricSummary,
    pub disease_deaths: MetricSummary,
    pub population_growth: MetricSummary,
    pub monthly_populations: Vec<MetricSummary>,
    pub monthly_sterilized: Vec<MetricSummary>,
    pub monthly_sterile_adults: Vec<MetricSummary>,
    pub monthly_reproductive: Vec<MetricSummary>,
    pub monthly_kittens: Vec<MetricSummary>,
    pub monthly_costs: Vec<MetricSummary>,
    pub monthly_births: Vec<MetricSummary>,
    pub mortality: MortalityBreakdown,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ResultAggregator;

impl ResultAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(&self, runs: &[RunResult]) -> Result<AggregateResult> {
        let months = match runs.first() {
            Some(run) => run.snapshots.len(),
            None => {
                return Err(SimError::invalid(
                    "num_simulations",
                    "cannot aggregate an empty ensemble",
                ))
            }
        };
        if months == 0 || runs.iter().any(|run| run.snapshots.len() != months) {
            return Err(SimError::invalid(
                "months",
                "runs in one ensemble must share a non-empty horizon",
            ));
        }

        let finals: Vec<&ColonyState> = runs
            .iter()
            .filter_map(|run| run.final_state())
            .collect();
        let births: Vec<Vec<f64>> = runs.iter().map(RunResult::monthly_births).collect();

        Ok(AggregateResult {
            num_runs: runs.len(),
            final_population: summarize(runs.iter().map(|r| r.final_population).collect()),
            final_sterilized: at_end(&finals, |s| s.sterilized_count),
            total_cost: summarize(runs.iter().map(|r| r.total_cost).collect()),
            total_deaths: summarize(runs.iter().map(|r| r.total_deaths).collect()),
            total_births: at_end(&finals, |s| s.cumulative_births),
            kitten_deaths: at_end(&finals, |s| s.deaths.kitten),
            adult_deaths: at_end(&finals, |s| s.deaths.adult),
            natural_deaths: at_end(&finals, |s| s.deaths.natural),
            urban_deaths: at_end(&finals, |s| s.deaths.urban),
            disease_deaths: at_end(&finals, |s| s.deaths.disease),
            population_growth: summarize(runs.iter().map(|r| r.population_growth).collect()),
            monthly_populations: envelope(runs, months, |s| s.current_size),
            monthly_sterilized: envelope(runs, months, |s| s.sterilized_count),
            monthly_sterile_adults: envelope(runs, months, |s| s.sterile_adults),
            monthly_reproductive: envelope(runs, months, |s| s.reproductive_count),
            monthly_kittens: envelope(runs, months, |s| s.kitten_count),
            monthly_costs: envelope(runs, months, |s| s.cumulative_cost),
            monthly_births: (0..months)
                .map(|month| summarize(births.iter().map(|run| run[month]).collect()))
                .collect(),
            mortality: MortalityBreakdown {
                natural_share: death_share(&finals, |s| s.deaths.natural),
                urban_share: death_share(&finals, |s| s.deaths.urban),
                disease_share: death_share(&finals, |s| s.deaths.disease),
                kitten_share: death_share(&finals, |s| s.deaths.kitten),
            },
        })
    }
}

fn summarize(values: Vec<f64>) -> MetricSummary {
    // Callers only pass samples drawn from a non-empty ensemble.
    MetricSummary::from_values(&values).unwrap_or(MetricSummary {
        mean: 0.0,
        std: 0.0,
        ci_lower: 0.0,
        ci_upper: 0.0,
    })
}

fn at_end(finals: &[&ColonyState], extract: impl Fn(&ColonyState) -> f64) -> MetricSummary {
    summarize(finals.iter().map(|state| extract(state)).collect())
}

fn death_share(finals: &[&ColonyState], part: impl Fn(&ColonyState) -> f64) -> MetricSummary {
    at_end(finals, |state| {
        let total = state.deaths.total();
        if total > 0.0 {
            part(state) / total
        } else {
            0.0
        }
    })
}

fn envelope(
    runs: &[RunResult],
    months: usize,
    extract: impl Fn(&ColonyState) -> f64,
) -> Vec<MetricSummary> {
    (0..months)
        .map(|month| {
            summarize(
                runs.iter()
                    .map(|run| extract(&run.snapshots[month]))
                    .collect(),
            )
        })
        .collect()
}
