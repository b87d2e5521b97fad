pub mod aggregate;
pub mod colony;
pub mod error;
pub mod monte_carlo;
pub mod params;
pub mod perturbation;
pub mod report;
pub mod rng;
pub mod scenario;
pub mod simulator;
pub mod stages;
pub mod stepper;

pub use aggregate::{AggregateResult, MetricSummary, MortalityBreakdown, ResultAggregator};
pub use colony::{ColonyState, DeathTally, RunResult};
pub use error::{ErrorKind, SimError};
pub use monte_carlo::{CancellationToken, MonteCarloOrchestrator, OrchestratorSettings};
pub use params::{ParameterSet, ParameterSetBuilder};
pub use perturbation::PerturbationSampler;
pub use report::{project, ProjectionReport};
pub use scenario::{Scenario, ScenarioLoader};
pub use simulator::SingleRunSimulator;
pub use stepper::DemographicStepper;
