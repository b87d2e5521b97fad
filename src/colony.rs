use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::params::ParameterSet;

/// Cumulative deaths, split once by cause and once by age class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeathTally {
    pub natural: f64,
    pub urban: f64,
    pub disease: f64,
    pub kitten: f64,
    pub adult: f64,
}

impl DeathTally {
    pub fn total(&self) -> f64 {
        self.kitten + self.adult
    }
}

/// Colony composition at the end of one month.
///
/// `current_size` always equals `sterile_adults + reproductive_count +
/// kitten_count`; the bookkeeping stage reassembles it after every step.
/// `sterilized_count` counts every cat sterilized in the colony so far, living
/// or dead, and never decreases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonyState {
    pub month: u32,
    pub current_size: f64,
    pub sterilized_count: f64,
    /// Living sterile adults.
    pub sterile_adults: f64,
    pub reproductive_count: f64,
    pub kitten_count: f64,
    /// Kittens by age in months; index 0 holds this month's newborns.
    pub kitten_cohorts: VecDeque<f64>,
    /// Conceptions awaiting delivery; the front is delivered next.
    pub gestating: VecDeque<f64>,
    pub deaths: DeathTally,
    pub cumulative_births: f64,
    pub cumulative_cost: f64,
}

impl ColonyState {
    /// The seeded month-0 snapshot.
    pub fn initial(params: &ParameterSet) -> Self {
        let seed = params.colony();
        let maturity = params.breeding().kitten_maturity_months as usize;
        let gestation = params.breeding().gestation_months as usize;

        let kitten_cohorts: VecDeque<f64> = if maturity == 0 {
            VecDeque::new()
        } else {
            let per_cohort = seed.kitten_count / maturity as f64;
            std::iter::repeat(per_cohort).take(maturity).collect()
        };
        let kitten_count = kitten_cohorts.iter().sum::<f64>();
        let reproductive_count =
            (seed.current_size - seed.sterilized_count - kitten_count).max(0.0);

        let mut state = Self {
            month: 0,
            current_size: 0.0,
            sterilized_count: seed.sterilized_count,
            sterile_adults: seed.sterilized_count,
            reproductive_count,
            kitten_count,
            kitten_cohorts,
            gestating: std::iter::repeat(0.0).take(gestation).collect(),
            deaths: DeathTally::default(),
            cumulative_births: 0.0,
            cumulative_cost: 0.0,
        };
        state.reassemble();
        state
    }

    pub fn adult_count(&self) -> f64 {
        self.sterile_adults + self.reproductive_count
    }

    /// Recompute the derived totals from the compartments.
    pub(crate) fn reassemble(&mut self) {
        self.kitten_count = self.kitten_cohorts.iter().sum();
        self.current_size = self.sterile_adults + self.reproductive_count + self.kitten_count;
    }
}

/// One complete trajectory plus run-level totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub snapshots: Vec<ColonyState>,
    pub final_population: f64,
    pub total_deaths: f64,
    pub total_cost: f64,
    /// Net change in head count over the horizon.
    pub population_growth: f64,
}

impl RunResult {
    pub(crate) fn from_snapshots(snapshots: Vec<ColonyState>) -> Self {
        let initial = snapshots.first().map(|s| s.current_size).unwrap_or(0.0);
        let (final_population, total_deaths, total_cost) = snapshots
            .last()
            .map(|s| (s.current_size, s.deaths.total(), s.cumulative_cost))
            .unwrap_or((0.0, 0.0, 0.0));
        Self {
            snapshots,
            final_population,
            total_deaths,
            total_cost,
            population_growth: final_population - initial,
        }
    }

    pub fn final_state(&self) -> Option<&ColonyState> {
        self.snapshots.last()
    }

    pub fn months_simulated(&self) -> usize {
        self.snapshots.len().saturating_sub(1)
    }

    /// One value per snapshot, in month order.
    pub fn series(&self, extract: impl Fn(&ColonyState) -> f64) -> Vec<f64> {
        self.snapshots.iter().map(extract).collect()
    }

    /// Kittens delivered during each month; zero for the seeded month.
    pub fn monthly_births(&self) -> Vec<f64> {
        let mut previous = 0.0;
        self.snapshots
            .iter()
            .map(|snapshot| {
                let delivered = snapshot.cumulative_births - previous;
                previous = snapshot.cumulative_births;
                delivered
            })
            .collect()
    }
}
