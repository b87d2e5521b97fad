use crate::error::{Result, SimError};
use crate::params::SurvivalParams;
use crate::stepper::{MonthWork, Stage, StepContext};

/// Crowding signal in [0, 1): zero up to the threshold ratio, then
/// `excess / (1 + excess)`.
pub fn density_pressure(density_ratio: f64, threshold: f64) -> f64 {
    let excess = (density_ratio - threshold).max(0.0);
    excess / (1.0 + excess)
}

/// Monthly death probability after crowding lowers survival and raises
/// mortality. Monotonic in `pressure` and always within [0, 1].
pub fn pressured_death_probability(
    monthly_survival: f64,
    survival: &SurvivalParams,
    pressure: f64,
) -> f64 {
    let adjusted_survival =
        monthly_survival * (1.0 - survival.survival_density_factor * pressure);
    let base_death = (1.0 - adjusted_survival).clamp(0.0, 1.0);
    let death = base_death + (1.0 - base_death) * survival.density_mortality_factor * pressure;
    death.clamp(0.0, 1.0)
}

pub struct DensityStage;

impl DensityStage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DensityStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for DensityStage {
    fn name(&self) -> &'static str {
        "density"
    }

    fn apply(&self, ctx: &StepContext<'_>, work: &mut MonthWork) -> Result<()> {
        let capacity = ctx.params.environment().carrying_capacity();
        if !capacity.is_finite() || capacity <= 0.0 {
            return Err(SimError::degenerate(
                "carrying_capacity",
                ctx.month,
                format!("capacity {capacity} cannot normalise density"),
            ));
        }
        let ratio = work.starting_size / capacity;
        if !ratio.is_finite() {
            return Err(SimError::degenerate(
                "density_ratio",
                ctx.month,
                format!("{} cats over capacity {capacity}", work.starting_size),
            ));
        }
        work.density_ratio = ratio;
        work.density_pressure =
            density_pressure(ratio, ctx.params.survival().mortality_threshold);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ColonySeed, ParameterSet};
    use crate::stages::testing::work_for;

    #[test]
    fn pressure_is_zero_below_threshold_and_saturates() {
        assert_eq!(density_pressure(0.5, 0.8), 0.0);
        assert_eq!(density_pressure(0.8, 0.8), 0.0);
        assert!((density_pressure(1.8, 0.8) - 0.5).abs() < 1e-12);
        let mut previous = 0.0;
        for step in 1..200 {
            let pressure = density_pressure(0.8 + step as f64 * 0.5, 0.8);
            assert!(pressure > previous);
            assert!(pressure < 1.0);
            previous = pressure;
        }
    }

    #[test]
    fn death_probability_grows_with_pressure_and_stays_in_unit_interval() {
        let survival = SurvivalParams {
            density_mortality_factor: 1.0,
            survival_density_factor: 1.0,
            ..Default::default()
        };
        let baseline = pressured_death_probability(0.98, &survival, 0.0);
        assert!((baseline - 0.02).abs() < 1e-12);
        let mut previous = baseline;
        for step in 1..=10 {
            let death = pressured_death_probability(0.98, &survival, step as f64 / 10.0);
            assert!(death >= previous);
            assert!((0.0..=1.0).contains(&death));
            previous = death;
        }
    }

    #[test]
    fn stage_measures_crowding_against_capacity() {
        let params = ParameterSet::builder()
            .colony(ColonySeed::new(180.0, 0.0))
            .build()
            .unwrap();
        let (ctx, mut work) = work_for(&params);
        DensityStage::new().apply(&ctx, &mut work).unwrap();
        assert!((work.density_ratio - 1.8).abs() < 1e-12);
        assert!((work.density_pressure - 0.5).abs() < 1e-12);
    }
}
