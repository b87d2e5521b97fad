use std::f64::consts::TAU;

use crate::error::Result;
use crate::stepper::{MonthWork, Stage, StepContext};

/// Calendar month (1-12) of an absolute month index. A `start_month` of 0
/// counts as January; values past 12 wrap.
pub fn calendar_month(start_month: u32, month: u32) -> u32 {
    (start_month.saturating_sub(1) % 12 + month % 12) % 12 + 1
}

/// Multiplier on the base breeding rate; stays within `1 ± amplitude`.
pub fn seasonal_factor(amplitude: f64, peak_month: u32, calendar_month: u32) -> f64 {
    let offset = calendar_month as f64 - peak_month as f64;
    1.0 + amplitude * (TAU * offset / 12.0).cos()
}

pub struct SeasonalStage;

impl SeasonalStage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SeasonalStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for SeasonalStage {
    fn name(&self) -> &'static str {
        "seasonal"
    }

    fn apply(&self, ctx: &StepContext<'_>, work: &mut MonthWork) -> Result<()> {
        let breeding = ctx.params.breeding();
        let calendar = calendar_month(ctx.params.control().start_month, ctx.month);
        let factor = seasonal_factor(
            breeding.seasonal_breeding_amplitude,
            breeding.peak_breeding_month,
            calendar,
        );
        work.effective_breeding_rate = breeding.breeding_rate * factor;
        Ok(())
    }
}
