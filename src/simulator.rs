use crate::colony::{ColonyState, RunResult};
use crate::error::Result;
use crate::params::ParameterSet;
use crate::stepper::DemographicStepper;

/// Runs the stepper across the horizon, keeping every monthly snapshot.
///
/// Deterministic: identical parameters always produce an identical trajectory.
/// A horizon of one month or less yields only the seeded month-0 snapshot.
#[derive(Default)]
pub struct SingleRunSimulator {
    stepper: DemographicStepper,
}

impl SingleRunSimulator {
    pub fn new() -> Self {
        Self {
            stepper: DemographicStepper::new(),
        }
    }

    pub fn run(&self, params: &ParameterSet) -> Result<RunResult> {
        let months = params.control().months;
        let steps = if months <= 1 { 0 } else { months as usize };

        let mut snapshots = Vec::with_capacity(steps + 1);
        let mut state = ColonyState::initial(params);
        for _ in 0..steps {
            let next = self.stepper.step(&state, params)?;
            snapshots.push(state);
            state = next;
        }
        snapshots.push(state);
        Ok(RunResult::from_snapshots(snapshots))
    }
}
