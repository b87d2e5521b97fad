use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::monte_carlo::{
    OrchestratorSettings, DEFAULT_MAX_SIMULATED_MONTHS, DEFAULT_PARALLEL_THRESHOLD,
};
use crate::params::{
    BreedingParams, ColonySeed, ControlParams, EnvironmentParams, InflowParams,
    InterventionParams, ParameterSet, ParameterSetBuilder, SurvivalParams,
};

fn default_seed() -> u64 {
    2024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

fn default_max_simulated_months() -> u64 {
    DEFAULT_MAX_SIMULATED_MONTHS
}

/// A colony projection described in YAML. Every parameter group is optional
/// and falls back to its documented defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub colony: ColonySeed,
    #[serde(default)]
    pub breeding: BreedingParams,
    #[serde(default)]
    pub survival: SurvivalParams,
    #[serde(default)]
    pub environment: EnvironmentParams,
    #[serde(default)]
    pub intervention: InterventionParams,
    #[serde(default)]
    pub inflow: InflowParams,
    #[serde(default)]
    pub control: ControlParams,
    #[serde(default)]
    pub monte_carlo: MonteCarloSection,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ensemble execution knobs. The master seed lives at the scenario root.
#[derive(Debug, Clone, Deserialize)]
pub struct MonteCarloSection {
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    #[serde(default = "default_max_simulated_months")]
    pub max_simulated_months: u64,
}

impl Default for MonteCarloSection {
    fn default() -> Self {
        Self {
            workers: None,
            parallel_threshold: default_parallel_threshold(),
            max_simulated_months: default_max_simulated_months(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    /// Builder pre-filled with every group, for callers that apply overrides.
    pub fn builder(&self) -> ParameterSetBuilder {
        ParameterSet::builder()
            .colony(self.colony)
            .breeding(self.breeding)
            .survival(self.survival)
            .environment(self.environment)
            .intervention(self.intervention)
            .inflow(self.inflow)
            .control(self.control)
    }

    pub fn parameters(&self) -> crate::error::Result<ParameterSet> {
        self.builder().build()
    }

    pub fn settings(&self) -> OrchestratorSettings {
        OrchestratorSettings {
            seed: self.seed,
            workers: self.monte_carlo.workers,
            parallel_threshold: self.monte_carlo.parallel_threshold,
            max_simulated_months: self.monte_carlo.max_simulated_months,
        }
    }
}
