use crate::error::Result;
use crate::params::SurvivalParams;
use crate::stages::density::pressured_death_probability;
use crate::stepper::{MonthWork, Stage, StepContext};

/// Monthly survival equivalent to an annual survival rate.
pub fn monthly_survival(annual_rate: f64) -> f64 {
    annual_rate.clamp(0.0, 1.0).powf(1.0 / 12.0)
}

/// Fractions of deaths attributed to (natural, urban, disease). With no
/// recorded risk every death counts as natural.
pub fn cause_shares(survival: &SurvivalParams) -> (f64, f64, f64) {
    let total = survival.natural_risk + survival.urban_risk + survival.disease_risk;
    if total <= 0.0 {
        return (1.0, 0.0, 0.0);
    }
    (
        survival.natural_risk / total,
        survival.urban_risk / total,
        survival.disease_risk / total,
    )
}

pub struct MortalityStage;

impl MortalityStage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MortalityStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for MortalityStage {
    fn name(&self) -> &'static str {
        "mortality"
    }

    fn apply(&self, ctx: &StepContext<'_>, work: &mut MonthWork) -> Result<()> {
        let survival = ctx.params.survival();
        let pressure = work.density_pressure;
        let kitten_death = pressured_death_probability(
            monthly_survival(survival.kitten_survival_rate),
            survival,
            pressure,
        );
        let adult_death = pressured_death_probability(
            monthly_survival(survival.adult_survival_rate),
            survival,
            pressure,
        );

        let state = &mut work.state;
        let mut kitten_deaths = 0.0;
        for cohort in state.kitten_cohorts.iter_mut() {
            let deaths = *cohort * kitten_death;
            *cohort -= deaths;
            kitten_deaths += deaths;
        }
        state.kitten_count = state.kitten_cohorts.iter().sum();

        let reproductive_deaths = state.reproductive_count * adult_death;
        let sterile_deaths = state.sterile_adults * adult_death;
        state.reproductive_count -= reproductive_deaths;
        state.sterile_adults -= sterile_deaths;
        let adult_deaths = reproductive_deaths + sterile_deaths;

        let total = kitten_deaths + adult_deaths;
        let (natural, urban, disease) = cause_shares(survival);
        state.deaths.kitten += kitten_deaths;
        state.deaths.adult += adult_deaths;
        state.deaths.natural += total * natural;
        state.deaths.urban += total * urban;
        state.deaths.disease += total * disease;
        Ok(())
    }
}
