use crate::error::Result;
use crate::stepper::{MonthWork, Stage, StepContext};

/// Traps up to `monthly_sterilization_rate` unsterilized adults and bills each
/// procedure at `sterilization_cost`.
pub struct SterilizationStage;

impl SterilizationStage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SterilizationStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for SterilizationStage {
    fn name(&self) -> &'static str {
        "sterilization"
    }

    fn apply(&self, ctx: &StepContext<'_>, work: &mut MonthWork) -> Result<()> {
        let intervention = ctx.params.intervention();
        let state = &mut work.state;
        let procedures = intervention
            .monthly_sterilization_rate
            .min(state.reproductive_count)
            .max(0.0);
        state.reproductive_count -= procedures;
        state.sterile_adults += procedures;
        state.sterilized_count += procedures;
        state.cumulative_cost += procedures * intervention.sterilization_cost;
        work.sterilized = procedures;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ColonySeed, InterventionParams, ParameterSet};
    use crate::stages::testing::work_for;

    #[test]
    fn sterilizes_at_most_the_reproductive_pool() {
        let params = ParameterSet::builder()
            .colony(ColonySeed::new(12.0, 8.0))
            .intervention(InterventionParams {
                sterilization_cost: 50.0,
                monthly_sterilization_rate: 10.0,
            })
            .build()
            .unwrap();
        let (ctx, mut work) = work_for(&params);
        SterilizationStage::new().apply(&ctx, &mut work).unwrap();
        assert_eq!(work.sterilized, 4.0);
        assert_eq!(work.state.reproductive_count, 0.0);
        assert_eq!(work.state.sterilized_count, 12.0);
        assert_eq!(work.state.sterile_adults, 12.0);
        assert_eq!(work.state.cumulative_cost, 200.0);

        SterilizationStage::new().apply(&ctx, &mut work).unwrap();
        assert_eq!(work.sterilized, 0.0);
        assert_eq!(work.state.cumulative_cost, 200.0);
    }

    #[test]
    fn partial_rate_moves_exact_count() {
        let params = ParameterSet::builder()
            .colony(ColonySeed::new(30.0, 0.0))
            .monthly_sterilization_rate(2.5)
            .build()
            .unwrap();
        let (ctx, mut work) = work_for(&params);
        SterilizationStage::new().apply(&ctx, &mut work).unwrap();
        assert_eq!(work.state.reproductive_count, 27.5);
        assert_eq!(work.state.sterilized_count, 2.5);
        assert_eq!(work.state.sterile_adults, 2.5);
    }
}
