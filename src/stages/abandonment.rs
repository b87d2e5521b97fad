use crate::error::Result;
use crate::stepper::{MonthWork, Stage, StepContext};

pub struct AbandonmentStage;

impl AbandonmentStage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AbandonmentStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for AbandonmentStage {
    fn name(&self) -> &'static str {
        "abandonment"
    }

    fn apply(&self, ctx: &StepContext<'_>, work: &mut MonthWork) -> Result<()> {
        let inflow = ctx.params.inflow();
        let arrivals = inflow.monthly_abandonment;
        let already_sterile = arrivals * inflow.abandoned_sterilized_ratio;
        let state = &mut work.state;
        state.sterile_adults += already_sterile;
        state.sterilized_count += already_sterile;
        state.reproductive_count += arrivals - already_sterile;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ColonySeed, InflowParams, ParameterSet};
    use crate::stages::testing::work_for;

    #[test]
    fn arrivals_split_by_sterilized_ratio() {
        let params = ParameterSet::builder()
            .colony(ColonySeed::new(10.0, 2.0))
            .inflow(InflowParams {
                monthly_abandonment: 4.0,
                abandoned_sterilized_ratio: 0.25,
            })
            .build()
            .unwrap();
        let (ctx, mut work) = work_for(&params);
        AbandonmentStage::new().apply(&ctx, &mut work).unwrap();
        assert_eq!(work.state.sterilized_count, 3.0);
        assert_eq!(work.state.sterile_adults, 3.0);
        assert_eq!(work.state.reproductive_count, 11.0);
        assert_eq!(work.state.cumulative_cost, 0.0);
    }
}
