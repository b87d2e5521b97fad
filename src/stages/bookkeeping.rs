use crate::colony::ColonyState;
use crate::error::{Result, SimError};
use crate::stepper::{MonthWork, Stage, StepContext};

/// Closes the month: clamps compartments at zero, rejects non-finite values
/// and reassembles `current_size`.
pub struct BookkeepingStage;

impl BookkeepingStage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BookkeepingStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for BookkeepingStage {
    fn name(&self) -> &'static str {
        "bookkeeping"
    }

    fn apply(&self, ctx: &StepContext<'_>, work: &mut MonthWork) -> Result<()> {
        let state = &mut work.state;
        ensure_finite(state, ctx.month)?;

        state.sterile_adults = state.sterile_adults.max(0.0);
        state.reproductive_count = state.reproductive_count.max(0.0);
        for cohort in state.kitten_cohorts.iter_mut() {
            *cohort = cohort.max(0.0);
        }
        for pending in state.gestating.iter_mut() {
            *pending = pending.max(0.0);
        }
        state.month = ctx.month + 1;
        state.reassemble();
        Ok(())
    }
}

fn ensure_finite(state: &ColonyState, month: u32) -> Result<()> {
    let checks = [
        ("sterilized_count", state.sterilized_count),
        ("sterile_adults", state.sterile_adults),
        ("reproductive_count", state.reproductive_count),
        ("kitten_count", state.kitten_cohorts.iter().sum::<f64>()),
        ("gestating", state.gestating.iter().sum::<f64>()),
        ("deaths", state.deaths.total()),
        ("cumulative_cost", state.cumulative_cost),
    ];
    for (quantity, value) in checks {
        if !value.is_finite() {
            return Err(SimError::degenerate(
                quantity,
                month,
                format!("evaluated to {value}"),
            ));
        }
    }
    Ok(())
}
