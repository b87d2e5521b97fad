//! Ensemble execution.
//!
//! Runs are independent: each owns its perturbed parameters, its random
//! stream and its trajectory. Large ensembles are spread over a fixed-size
//! rayon pool; small ones run inline where pool overhead would dominate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::colony::RunResult;
use crate::error::{Result, SimError};
use crate::params::ParameterSet;
use crate::perturbation::PerturbationSampler;
use crate::rng::RunStreams;
use crate::simulator::SingleRunSimulator;

/// Largest `num_simulations × months` accepted for one projection.
pub const DEFAULT_MAX_SIMULATED_MONTHS: u64 = 120_000;
/// Ensembles smaller than this run on the calling thread.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 32;

fn default_seed() -> u64 {
    2024
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

fn default_max_simulated_months() -> u64 {
    DEFAULT_MAX_SIMULATED_MONTHS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorSettings {
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Worker threads; defaults to the available cores.
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    #[serde(default = "default_max_simulated_months")]
    pub max_simulated_months: u64,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            workers: None,
            parallel_threshold: default_parallel_threshold(),
            max_simulated_months: default_max_simulated_months(),
        }
    }
}

/// Cooperative stop signal, checked before each run starts.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct MonteCarloOrchestrator {
    simulator: SingleRunSimulator,
    settings: OrchestratorSettings,
    pool: rayon::ThreadPool,
    cancel: CancellationToken,
}

impl MonteCarloOrchestrator {
    pub fn new(settings: OrchestratorSettings) -> Result<Self> {
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let workers = match settings.workers {
            Some(0) => {
                return Err(SimError::invalid(
                    "workers",
                    "the worker pool needs at least one thread",
                ))
            }
            Some(workers) => workers,
            None => available,
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("colony-mc-{index}"))
            .build()
            .map_err(|_| SimError::ResourceExhaustion {
                field: "workers",
                requested: workers as u64,
                cap: available as u64,
            })?;
        Ok(Self {
            simulator: SingleRunSimulator::new(),
            settings,
            pool,
            cancel: CancellationToken::new(),
        })
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run the ensemble described by `base`. A non-Monte-Carlo request, or one
    /// asking for a single simulation, returns exactly one unperturbed run.
    pub fn run(&self, base: &ParameterSet) -> Result<Vec<RunResult>> {
        let control = base.control();
        let runs = if base.is_monte_carlo() {
            control.num_simulations as usize
        } else {
            1
        };
        let requested = runs as u64 * control.months as u64;
        if requested > self.settings.max_simulated_months {
            return Err(SimError::ResourceExhaustion {
                field: "num_simulations",
                requested,
                cap: self.settings.max_simulated_months,
            });
        }
        if self.cancel.is_cancelled() {
            tracing::warn!("projection cancelled before start");
            return Err(SimError::Cancelled);
        }

        if runs == 1 {
            tracing::debug!(months = control.months, "single run fast path");
            return Ok(vec![self.simulator.run(base)?]);
        }

        let started = Instant::now();
        let sampler = PerturbationSampler::new(control.variation_coefficient)?;
        let streams = RunStreams::new(self.settings.seed);
        let run_one = |index: usize| -> Result<RunResult> {
            if self.cancel.is_cancelled() {
                return Err(SimError::Cancelled);
            }
            let mut rng = streams.for_run(index);
            let params = sampler.sample(base, &mut rng)?;
            let result = self.simulator.run(&params)?;
            tracing::trace!(run = index, final_population = result.final_population, "run complete");
            Ok(result)
        };

        let pooled = runs >= self.settings.parallel_threshold;
        tracing::debug!(
            runs,
            pooled,
            workers = self.workers(),
            seed = streams.master_seed(),
            "starting ensemble"
        );
        let outcome = if pooled {
            self.pool
                .install(|| (0..runs).into_par_iter().map(run_one).collect::<Result<Vec<_>>>())
        } else {
            (0..runs).map(run_one).collect::<Result<Vec<_>>>()
        };

        match &outcome {
            Ok(results) => tracing::debug!(
                runs = results.len(),
                elapsed_ms = started.elapsed().as_secs_f64() * 1_000.0,
                "ensemble complete"
            ),
            Err(SimError::Cancelled) => tracing::warn!("ensemble cancelled between runs"),
            Err(err) => tracing::debug!(error = %err, "ensemble failed"),
        }
        outcome
    }
}
