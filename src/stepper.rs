//! One-month demographic transition.
//!
//! The stepper clones the previous snapshot into a [`MonthWork`] and lets a
//! fixed sequence of [`Stage`]s rewrite it. Stages only see the parameters,
//! the month being advanced and the work-in-progress; nothing outlives a step.

use crate::colony::ColonyState;
use crate::error::Result;
use crate::params::ParameterSet;
use crate::stages::{
    AbandonmentStage, BirthStage, BookkeepingStage, DensityStage, MaturationStage,
    MortalityStage, SeasonalStage, SterilizationStage,
};

pub struct StepContext<'a> {
    pub params: &'a ParameterSet,
    /// Absolute month index being advanced (the month of the input snapshot).
    pub month: u32,
}

/// Scratch values shared between stages while one month is computed.
#[derive(Debug, Clone)]
pub struct MonthWork {
    pub state: ColonyState,
    /// Colony size at the start of the month, before any stage ran.
    pub starting_size: f64,
    pub effective_breeding_rate: f64,
    pub density_ratio: f64,
    /// Saturating crowding signal in [0, 1).
    pub density_pressure: f64,
    pub births: f64,
    pub matured: f64,
    pub sterilized: f64,
}

impl MonthWork {
    pub fn new(previous: &ColonyState) -> Self {
        Self {
            state: previous.clone(),
            starting_size: previous.current_size,
            effective_breeding_rate: 0.0,
            density_ratio: 0.0,
            density_pressure: 0.0,
            births: 0.0,
            matured: 0.0,
            sterilized: 0.0,
        }
    }
}

pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, ctx: &StepContext<'_>, work: &mut MonthWork) -> Result<()>;
}

/// Pure function from `state_t` to `state_{t+1}` given the parameters.
pub struct DemographicStepper {
    stages: Vec<Box<dyn Stage>>,
}

impl DemographicStepper {
    pub fn new() -> Self {
        Self {
            stages: vec![
                Box::new(SeasonalStage::new()),
                Box::new(DensityStage::new()),
                Box::new(BirthStage::new()),
                Box::new(MaturationStage::new()),
                Box::new(MortalityStage::new()),
                Box::new(SterilizationStage::new()),
                Box::new(AbandonmentStage::new()),
                Box::new(BookkeepingStage::new()),
            ],
        }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn step(&self, previous: &ColonyState, params: &ParameterSet) -> Result<ColonyState> {
        let ctx = StepContext {
            params,
            month: previous.month,
        };
        let mut work = MonthWork::new(previous);
        for stage in &self.stages {
            stage.apply(&ctx, &mut work)?;
        }
        tracing::trace!(
            month = ctx.month,
            births = work.births,
            matured = work.matured,
            sterilized = work.sterilized,
            size = work.state.current_size,
            "stepped colony"
        );
        Ok(work.state)
    }
}

impl Default for DemographicStepper {
    fn default() -> Self {
        Self::new()
    }
}
