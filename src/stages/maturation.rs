use crate::error::Result;
use crate::stepper::{MonthWork, Stage, StepContext};

/// Ages every kitten cohort by one month. The cohort reaching
/// `kitten_maturity_months` joins the reproductive adults in bulk and this
/// month's newborns become the youngest cohort.
pub struct MaturationStage;

impl MaturationStage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MaturationStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for MaturationStage {
    fn name(&self) -> &'static str {
        "maturation"
    }

    fn apply(&self, _ctx: &StepContext<'_>, work: &mut MonthWork) -> Result<()> {
        let matured = match work.state.kitten_cohorts.pop_back() {
            Some(oldest) => {
                work.state.kitten_cohorts.push_front(work.births);
                oldest
            }
            // No kittenhood: newborns count as adults straight away.
            None => work.births,
        };
        work.matured = matured;
        work.state.reproductive_count += matured;
        work.state.kitten_count = work.state.kitten_cohorts.iter().sum();
        Ok(())
    }
}
