//! Randomized copies of a base parameter set for Monte Carlo runs.
//!
//! Every uncertain field gets its own multiplicative factor drawn from
//! `Normal(1, variation_coefficient)` and is clamped back into its domain.
//! Structural fields (horizon, ensemble size, calendar, cohort lengths), the
//! colony seed, the intervention policy and the carrying-capacity terms are
//! copied unchanged.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{Result, SimError};
use crate::params::ParameterSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Probability-like value in [0, 1].
    Unit,
    /// Any finite value >= 0.
    NonNegative,
}

impl Domain {
    pub fn clamp(self, value: f64) -> f64 {
        match self {
            Domain::Unit => value.clamp(0.0, 1.0),
            Domain::NonNegative => value.max(0.0),
        }
    }
}

/// Mutable handles on every perturbed field, with the field name and domain.
fn perturbable_fields(params: &mut ParameterSet) -> Vec<(&'static str, Domain, &mut f64)> {
    let ParameterSet {
        breeding,
        survival,
        environment,
        inflow,
        ..
    } = params;
    vec![
        ("breeding_rate", Domain::Unit, &mut breeding.breeding_rate),
        (
            "kittens_per_litter",
            Domain::NonNegative,
            &mut breeding.kittens_per_litter,
        ),
        (
            "litters_per_year",
            Domain::NonNegative,
            &mut breeding.litters_per_year,
        ),
        ("female_ratio", Domain::Unit, &mut breeding.female_ratio),
        (
            "seasonal_breeding_amplitude",
            Domain::Unit,
            &mut breeding.seasonal_breeding_amplitude,
        ),
        (
            "kitten_survival_rate",
            Domain::Unit,
            &mut survival.kitten_survival_rate,
        ),
        (
            "adult_survival_rate",
            Domain::Unit,
            &mut survival.adult_survival_rate,
        ),
        ("urban_risk", Domain::Unit, &mut survival.urban_risk),
        ("disease_risk", Domain::Unit, &mut survival.disease_risk),
        ("natural_risk", Domain::Unit, &mut survival.natural_risk),
        (
            "density_mortality_factor",
            Domain::Unit,
            &mut survival.density_mortality_factor,
        ),
        (
            "survival_density_factor",
            Domain::Unit,
            &mut survival.survival_density_factor,
        ),
        (
            "mortality_threshold",
            Domain::Unit,
            &mut survival.mortality_threshold,
        ),
        (
            "water_availability",
            Domain::Unit,
            &mut environment.water_availability,
        ),
        (
            "shelter_quality",
            Domain::Unit,
            &mut environment.shelter_quality,
        ),
        (
            "caretaker_support",
            Domain::Unit,
            &mut environment.caretaker_support,
        ),
        (
            "feeding_consistency",
            Domain::Unit,
            &mut environment.feeding_consistency,
        ),
        (
            "monthly_abandonment",
            Domain::NonNegative,
            &mut inflow.monthly_abandonment,
        ),
        (
            "abandoned_sterilized_ratio",
            Domain::Unit,
            &mut inflow.abandoned_sterilized_ratio,
        ),
    ]
}

/// Names of the fields a sampler perturbs, in draw order.
pub fn perturbed_field_names() -> Vec<&'static str> {
    let mut scratch = ParameterSet::default();
    perturbable_fields(&mut scratch)
        .into_iter()
        .map(|(name, _, _)| name)
        .collect()
}

#[derive(Debug, Clone)]
pub struct PerturbationSampler {
    variation_coefficient: f64,
    noise: Normal<f64>,
}

impl PerturbationSampler {
    pub fn new(variation_coefficient: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&variation_coefficient) {
            return Err(SimError::invalid(
                "variation_coefficient",
                format!("{variation_coefficient} is outside [0, 1]"),
            ));
        }
        let noise = Normal::new(1.0, variation_coefficient)
            .map_err(|err| SimError::invalid("variation_coefficient", err.to_string()))?;
        Ok(Self {
            variation_coefficient,
            noise,
        })
    }

    pub fn variation_coefficient(&self) -> f64 {
        self.variation_coefficient
    }

    /// Draw one perturbed copy of `base`. Fields draw in a fixed order, one
    /// independent factor each. The copy is validated like any built set.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        base: &ParameterSet,
        rng: &mut R,
    ) -> Result<ParameterSet> {
        let mut perturbed = base.clone();
        if self.variation_coefficient == 0.0 {
            return Ok(perturbed);
        }
        for (_, domain, value) in perturbable_fields(&mut perturbed) {
            let factor = self.noise.sample(rng).max(0.0);
            *value = domain.clamp(*value * factor);
        }
        perturbed.validate()?;
        Ok(perturbed)
    }
}
