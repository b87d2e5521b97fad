use crate::error::{Result, SimError};
use crate::params::EnvironmentParams;
use crate::stepper::{MonthWork, Stage, StepContext};

/// Multiplicative dampening of births by care and habitat quality.
pub fn environment_factor(environment: &EnvironmentParams) -> f64 {
    environment.caretaker_support
        * environment.feeding_consistency
        * environment.water_availability
        * environment.shelter_quality
}

/// Computes this month's conceptions from unsterilized adults and delivers the
/// litters conceived `gestation_months` ago.
pub struct BirthStage;

impl BirthStage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BirthStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for BirthStage {
    fn name(&self) -> &'static str {
        "births"
    }

    fn apply(&self, ctx: &StepContext<'_>, work: &mut MonthWork) -> Result<()> {
        let breeding = ctx.params.breeding();
        let conceptions = work.state.reproductive_count
            * breeding.female_ratio
            * work.effective_breeding_rate
            * (breeding.litters_per_year / 12.0)
            * breeding.kittens_per_litter
            * environment_factor(ctx.params.environment());
        if !conceptions.is_finite() {
            return Err(SimError::degenerate(
                "births",
                ctx.month,
                format!("litter size evaluated to {conceptions}"),
            ));
        }

        let births = match work.state.gestating.pop_front() {
            Some(due) => {
                work.state.gestating.push_back(conceptions);
                due
            }
            None => conceptions,
        };
        work.births = births;
        work.state.cumulative_births += births;
        Ok(())
    }
}
