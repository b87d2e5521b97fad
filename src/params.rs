//! Validated, immutable configuration of a colony projection.
//!
//! Parameters are grouped the way caretakers reason about them (breeding,
//! survival, environment, intervention, inflow, control). Every group has
//! documented defaults and deserializes with per-field fallbacks, so a scenario
//! file only names what it overrides. A [`ParameterSet`] can only be obtained
//! from [`ParameterSetBuilder::build`], which validates everything once.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Upper bound on the projection horizon, in months.
pub const MAX_MONTHS: u32 = 120;
/// Longest supported kittenhood, in months.
pub const MAX_KITTEN_MATURITY_MONTHS: u32 = 24;
/// Longest supported gestation, in months.
pub const MAX_GESTATION_MONTHS: u32 = 12;

fn default_current_size() -> f64 {
    50.0
}

fn default_breeding_rate() -> f64 {
    0.85
}

fn default_kittens_per_litter() -> f64 {
    4.0
}

fn default_litters_per_year() -> f64 {
    2.0
}

fn default_female_ratio() -> f64 {
    0.5
}

fn default_kitten_maturity_months() -> u32 {
    6
}

fn default_seasonal_amplitude() -> f64 {
    0.3
}

fn default_peak_breeding_month() -> u32 {
    4
}

fn default_gestation_months() -> u32 {
    2
}

fn default_kitten_survival_rate() -> f64 {
    0.5
}

fn default_adult_survival_rate() -> f64 {
    0.8
}

fn default_urban_risk() -> f64 {
    0.2
}

fn default_disease_risk() -> f64 {
    0.15
}

fn default_natural_risk() -> f64 {
    0.1
}

fn default_density_mortality_factor() -> f64 {
    0.5
}

fn default_survival_density_factor() -> f64 {
    0.3
}

fn default_mortality_threshold() -> f64 {
    0.8
}

fn default_territory_size() -> f64 {
    1_000.0
}

fn default_base_food_capacity() -> f64 {
    40.0
}

fn default_food_scaling_factor() -> f64 {
    0.06
}

fn default_water_availability() -> f64 {
    0.9
}

fn default_shelter_quality() -> f64 {
    0.8
}

fn default_caretaker_support() -> f64 {
    0.8
}

fn default_feeding_consistency() -> f64 {
    0.8
}

fn default_sterilization_cost() -> f64 {
    75.0
}

fn default_abandoned_sterilized_ratio() -> f64 {
    0.1
}

fn default_months() -> u32 {
    24
}

fn default_num_simulations() -> u32 {
    1
}

fn default_variation_coefficient() -> f64 {
    0.1
}

fn default_start_month() -> u32 {
    1
}

/// Month-0 composition of the colony.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColonySeed {
    #[serde(default = "default_current_size")]
    pub current_size: f64,
    #[serde(default)]
    pub sterilized_count: f64,
    /// Kittens present at month 0, spread evenly across the age cohorts.
    #[serde(default)]
    pub kitten_count: f64,
}

impl ColonySeed {
    pub fn new(current_size: f64, sterilized_count: f64) -> Self {
        Self {
            current_size,
            sterilized_count,
            kitten_count: 0.0,
        }
    }
}

impl Default for ColonySeed {
    fn default() -> Self {
        Self::new(default_current_size(), 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreedingParams {
    /// Probability that a reproductive female breeds in a breeding window.
    #[serde(default = "default_breeding_rate")]
    pub breeding_rate: f64,
    #[serde(default = "default_kittens_per_litter")]
    pub kittens_per_litter: f64,
    #[serde(default = "default_litters_per_year")]
    pub litters_per_year: f64,
    #[serde(default = "default_female_ratio")]
    pub female_ratio: f64,
    #[serde(default = "default_kitten_maturity_months")]
    pub kitten_maturity_months: u32,
    /// Relative swing of the breeding rate over the year, in [0, 1].
    #[serde(default = "default_seasonal_amplitude")]
    pub seasonal_breeding_amplitude: f64,
    /// Calendar month (1-12) at which breeding peaks.
    #[serde(default = "default_peak_breeding_month")]
    pub peak_breeding_month: u32,
    #[serde(default = "default_gestation_months")]
    pub gestation_months: u32,
}

impl Default for BreedingParams {
    fn default() -> Self {
        Self {
            breeding_rate: default_breeding_rate(),
            kittens_per_litter: default_kittens_per_litter(),
            litters_per_year: default_litters_per_year(),
            female_ratio: default_female_ratio(),
            kitten_maturity_months: default_kitten_maturity_months(),
            seasonal_breeding_amplitude: default_seasonal_amplitude(),
            peak_breeding_month: default_peak_breeding_month(),
            gestation_months: default_gestation_months(),
        }
    }
}

/// Survival rates are annual; the stepper converts them to monthly baselines.
/// The three risks only apportion deaths across causes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurvivalParams {
    #[serde(default = "default_kitten_survival_rate")]
    pub kitten_survival_rate: f64,
    #[serde(default = "default_adult_survival_rate")]
    pub adult_survival_rate: f64,
    #[serde(default = "default_urban_risk")]
    pub urban_risk: f64,
    #[serde(default = "default_disease_risk")]
    pub disease_risk: f64,
    #[serde(default = "default_natural_risk")]
    pub natural_risk: f64,
    #[serde(default = "default_density_mortality_factor")]
    pub density_mortality_factor: f64,
    #[serde(default = "default_survival_density_factor")]
    pub survival_density_factor: f64,
    /// Density ratio above which crowding raises mortality.
    #[serde(default = "default_mortality_threshold")]
    pub mortality_threshold: f64,
}

impl Default for SurvivalParams {
    fn default() -> Self {
        Self {
            kitten_survival_rate: default_kitten_survival_rate(),
            adult_survival_rate: default_adult_survival_rate(),
            urban_risk: default_urban_risk(),
            disease_risk: default_disease_risk(),
            natural_risk: default_natural_risk(),
            density_mortality_factor: default_density_mortality_factor(),
            survival_density_factor: default_survival_density_factor(),
            mortality_threshold: default_mortality_threshold(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentParams {
    #[serde(default = "default_territory_size")]
    pub territory_size: f64,
    /// Cats supported by the baseline food supply regardless of territory.
    #[serde(default = "default_base_food_capacity")]
    pub base_food_capacity: f64,
    /// Additional cats supported per unit of territory.
    #[serde(default = "default_food_scaling_factor")]
    pub food_scaling_factor: f64,
    #[serde(default = "default_water_availability")]
    pub water_availability: f64,
    #[serde(default = "default_shelter_quality")]
    pub shelter_quality: f64,
    #[serde(default = "default_caretaker_support")]
    pub caretaker_support: f64,
    #[serde(default = "default_feeding_consistency")]
    pub feeding_consistency: f64,
}

impl EnvironmentParams {
    pub fn carrying_capacity(&self) -> f64 {
        self.base_food_capacity + self.territory_size * self.food_scaling_factor
    }
}

impl Default for EnvironmentParams {
    fn default() -> Self {
        Self {
            territory_size: default_territory_size(),
            base_food_capacity: default_base_food_capacity(),
            food_scaling_factor: default_food_scaling_factor(),
            water_availability: default_water_availability(),
            shelter_quality: default_shelter_quality(),
            caretaker_support: default_caretaker_support(),
            feeding_consistency: default_feeding_consistency(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterventionParams {
    #[serde(default = "default_sterilization_cost")]
    pub sterilization_cost: f64,
    /// Cats trapped and sterilized per month.
    #[serde(default)]
    pub monthly_sterilization_rate: f64,
}

impl Default for InterventionParams {
    fn default() -> Self {
        Self {
            sterilization_cost: default_sterilization_cost(),
            monthly_sterilization_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InflowParams {
    /// Adult cats abandoned into the colony per month.
    #[serde(default)]
    pub monthly_abandonment: f64,
    #[serde(default = "default_abandoned_sterilized_ratio")]
    pub abandoned_sterilized_ratio: f64,
}

impl Default for InflowParams {
    fn default() -> Self {
        Self {
            monthly_abandonment: 0.0,
            abandoned_sterilized_ratio: default_abandoned_sterilized_ratio(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlParams {
    #[serde(default = "default_months")]
    pub months: u32,
    #[serde(default)]
    pub use_monte_carlo: bool,
    #[serde(default = "default_num_simulations")]
    pub num_simulations: u32,
    #[serde(default = "default_variation_coefficient")]
    pub variation_coefficient: f64,
    /// Calendar month (1-12) of month 0.
    #[serde(default = "default_start_month")]
    pub start_month: u32,
}

impl Default for ControlParams {
    fn default() -> Self {
        Self {
            months: default_months(),
            use_monte_carlo: false,
            num_simulations: default_num_simulations(),
            variation_coefficient: default_variation_coefficient(),
            start_month: default_start_month(),
        }
    }
}

/// Validated parameters for one projection. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSet {
    pub(crate) colony: ColonySeed,
    pub(crate) breeding: BreedingParams,
    pub(crate) survival: SurvivalParams,
    pub(crate) environment: EnvironmentParams,
    pub(crate) intervention: InterventionParams,
    pub(crate) inflow: InflowParams,
    pub(crate) control: ControlParams,
}

impl ParameterSet {
    pub fn builder() -> ParameterSetBuilder {
        ParameterSetBuilder::default()
    }

    pub fn colony(&self) -> &ColonySeed {
        &self.colony
    }

    pub fn breeding(&self) -> &BreedingParams {
        &self.breeding
    }

    pub fn survival(&self) -> &SurvivalParams {
        &self.survival
    }

    pub fn environment(&self) -> &EnvironmentParams {
        &self.environment
    }

    pub fn intervention(&self) -> &InterventionParams {
        &self.intervention
    }

    pub fn inflow(&self) -> &InflowParams {
        &self.inflow
    }

    pub fn control(&self) -> &ControlParams {
        &self.control
    }

    /// True when the projection should run a perturbed ensemble.
    pub fn is_monte_carlo(&self) -> bool {
        self.control.use_monte_carlo && self.control.num_simulations > 1
    }

    /// Reopen the set as a builder, e.g. to derive a variant scenario.
    pub fn to_builder(&self) -> ParameterSetBuilder {
        ParameterSetBuilder {
            colony: self.colony,
            breeding: self.breeding,
            survival: self.survival,
            environment: self.environment,
            intervention: self.intervention,
            inflow: self.inflow,
            control: self.control,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        validate_colony(&self.colony, &self.breeding)?;
        validate_breeding(&self.breeding)?;
        validate_survival(&self.survival)?;
        validate_environment(&self.environment)?;
        validate_intervention(&self.intervention)?;
        validate_inflow(&self.inflow)?;
        validate_control(&self.control)
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            colony: ColonySeed::default(),
            breeding: BreedingParams::default(),
            survival: SurvivalParams::default(),
            environment: EnvironmentParams::default(),
            intervention: InterventionParams::default(),
            inflow: InflowParams::default(),
            control: ControlParams::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParameterSetBuilder {
    colony: ColonySeed,
    breeding: BreedingParams,
    survival: SurvivalParams,
    environment: EnvironmentParams,
    intervention: InterventionParams,
    inflow: InflowParams,
    control: ControlParams,
}

impl ParameterSetBuilder {
    pub fn colony(mut self, colony: ColonySeed) -> Self {
        self.colony = colony;
        self
    }

    pub fn breeding(mut self, breeding: BreedingParams) -> Self {
        self.breeding = breeding;
        self
    }

    pub fn survival(mut self, survival: SurvivalParams) -> Self {
        self.survival = survival;
        self
    }

    pub fn environment(mut self, environment: EnvironmentParams) -> Self {
        self.environment = environment;
        self
    }

    pub fn intervention(mut self, intervention: InterventionParams) -> Self {
        self.intervention = intervention;
        self
    }

    pub fn inflow(mut self, inflow: InflowParams) -> Self {
        self.inflow = inflow;
        self
    }

    pub fn control(mut self, control: ControlParams) -> Self {
        self.control = control;
        self
    }

    pub fn months(mut self, months: u32) -> Self {
        self.control.months = months;
        self
    }

    pub fn monthly_sterilization_rate(mut self, rate: f64) -> Self {
        self.intervention.monthly_sterilization_rate = rate;
        self
    }

    /// Enable the perturbed ensemble with the given size and spread.
    pub fn monte_carlo(mut self, num_simulations: u32, variation_coefficient: f64) -> Self {
        self.control.use_monte_carlo = true;
        self.control.num_simulations = num_simulations;
        self.control.variation_coefficient = variation_coefficient;
        self
    }

    pub fn build(self) -> Result<ParameterSet> {
        let params = ParameterSet {
            colony: self.colony,
            breeding: self.breeding,
            survival: self.survival,
            environment: self.environment,
            intervention: self.intervention,
            inflow: self.inflow,
            control: self.control,
        };
        params.validate()?;
        Ok(params)
    }
}

fn check_unit(field: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SimError::invalid(
            field,
            format!("{value} is outside [0, 1]"),
        ));
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(SimError::invalid(
            field,
            format!("{value} must be a finite value >= 0"),
        ));
    }
    Ok(())
}

fn check_calendar_month(field: &'static str, value: u32) -> Result<()> {
    if !(1..=12).contains(&value) {
        return Err(SimError::invalid(
            field,
            format!("{value} is not a calendar month (1-12)"),
        ));
    }
    Ok(())
}

fn validate_colony(colony: &ColonySeed, breeding: &BreedingParams) -> Result<()> {
    check_non_negative("current_size", colony.current_size)?;
    check_non_negative("sterilized_count", colony.sterilized_count)?;
    check_non_negative("kitten_count", colony.kitten_count)?;
    if colony.sterilized_count > colony.current_size {
        return Err(SimError::invalid(
            "sterilized_count",
            format!(
                "{} exceeds current_size {}",
                colony.sterilized_count, colony.current_size
            ),
        ));
    }
    if colony.sterilized_count + colony.kitten_count > colony.current_size {
        return Err(SimError::invalid(
            "kitten_count",
            format!(
                "sterilized_count + kitten_count exceeds current_size {}",
                colony.current_size
            ),
        ));
    }
    if colony.kitten_count > 0.0 && breeding.kitten_maturity_months == 0 {
        return Err(SimError::invalid(
            "kitten_count",
            "kittens cannot be seeded when kitten_maturity_months is 0",
        ));
    }
    Ok(())
}

fn validate_breeding(breeding: &BreedingParams) -> Result<()> {
    check_unit("breeding_rate", breeding.breeding_rate)?;
    check_non_negative("kittens_per_litter", breeding.kittens_per_litter)?;
    check_non_negative("litters_per_year", breeding.litters_per_year)?;
    check_unit("female_ratio", breeding.female_ratio)?;
    check_unit(
        "seasonal_breeding_amplitude",
        breeding.seasonal_breeding_amplitude,
    )?;
    check_calendar_month("peak_breeding_month", breeding.peak_breeding_month)?;
    if breeding.kitten_maturity_months > MAX_KITTEN_MATURITY_MONTHS {
        return Err(SimError::invalid(
            "kitten_maturity_months",
            format!("must be at most {MAX_KITTEN_MATURITY_MONTHS}"),
        ));
    }
    if breeding.gestation_months > MAX_GESTATION_MONTHS {
        return Err(SimError::invalid(
            "gestation_months",
            format!("must be at most {MAX_GESTATION_MONTHS}"),
        ));
    }
    Ok(())
}

fn validate_survival(survival: &SurvivalParams) -> Result<()> {
    check_unit("kitten_survival_rate", survival.kitten_survival_rate)?;
    check_unit("adult_survival_rate", survival.adult_survival_rate)?;
    check_unit("urban_risk", survival.urban_risk)?;
    check_unit("disease_risk", survival.disease_risk)?;
    check_unit("natural_risk", survival.natural_risk)?;
    check_unit("density_mortality_factor", survival.density_mortality_factor)?;
    check_unit("survival_density_factor", survival.survival_density_factor)?;
    check_unit("mortality_threshold", survival.mortality_threshold)
}

fn validate_environment(environment: &EnvironmentParams) -> Result<()> {
    if !environment.territory_size.is_finite() || environment.territory_size <= 0.0 {
        return Err(SimError::invalid(
            "territory_size",
            format!("{} must be greater than zero", environment.territory_size),
        ));
    }
    check_non_negative("base_food_capacity", environment.base_food_capacity)?;
    check_non_negative("food_scaling_factor", environment.food_scaling_factor)?;
    let capacity = environment.carrying_capacity();
    if !capacity.is_finite() || capacity <= 0.0 {
        return Err(SimError::invalid(
            "base_food_capacity",
            "base_food_capacity and food_scaling_factor leave no carrying capacity",
        ));
    }
    check_unit("water_availability", environment.water_availability)?;
    check_unit("shelter_quality", environment.shelter_quality)?;
    check_unit("caretaker_support", environment.caretaker_support)?;
    check_unit("feeding_consistency", environment.feeding_consistency)
}

fn validate_intervention(intervention: &InterventionParams) -> Result<()> {
    check_non_negative("sterilization_cost", intervention.sterilization_cost)?;
    check_non_negative(
        "monthly_sterilization_rate",
        intervention.monthly_sterilization_rate,
    )
}

fn validate_inflow(inflow: &InflowParams) -> Result<()> {
    check_non_negative("monthly_abandonment", inflow.monthly_abandonment)?;
    check_unit(
        "abandoned_sterilized_ratio",
        inflow.abandoned_sterilized_ratio,
    )
}

fn validate_control(control: &ControlParams) -> Result<()> {
    if !(1..=MAX_MONTHS).contains(&control.months) {
        return Err(SimError::invalid(
            "months",
            format!("{} is outside [1, {MAX_MONTHS}]", control.months),
        ));
    }
    if control.num_simulations == 0 {
        return Err(SimError::invalid(
            "num_simulations",
            "at least one simulation is required",
        ));
    }
    check_unit("variation_coefficient", control.variation_coefficient)?;
    check_calendar_month("start_month", control.start_month)
}
