//! Driver for explicit coupled solid/contact simulations of a bloc compressed and slid against a
//! wall.
//!
//! The mechanics are provided by an external [`Engine`]. This crate sequences the loading phases,
//! damps velocities of separated contact nodes after every step and decides when the engine state
//! is dumped.

pub mod clock;
pub mod config;
pub mod damping;
pub mod driver;
pub mod engine;
pub mod phase;
pub mod report;

// Public so that integration tests and downstream engines can reuse the mock engine.
pub mod test_utils;

pub use clock::{Cadence, CheckpointSchedule, SimulationClock};
pub use config::{load_params, DriverParams, DumpField, FixedCondition, LoadConfigError};
pub use damping::{ContactDamping, DampingStats};
pub use driver::{DriverBuilder, PhaseSummary, RunSummary, SimulationDriver};
pub use engine::{
    Axis, BoundaryCondition, Engine, EngineError, FieldKind, ProblemPaths, StepState,
};
pub use phase::{default_phases, Increment, Phase};
pub use report::{ConsoleReporter, NullReporter, Reporter};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Size mismatch: {gaps} gaps for {velocities} velocity components of dimension {dim}")]
    SizeMismatch {
        gaps: usize,
        velocities: usize,
        dim: usize,
    },
    #[error("Invalid parameter: {name:?}")]
    InvalidParameter { name: String },
    #[error("Computed time step is not positive: {time_step}")]
    NonPositiveTimeStep { time_step: f64 },
    #[error("Failed to set up the problem")]
    Setup { source: EngineError },
    #[error("Solve failed in phase '{phase}' at step {step} (global step {global_step})")]
    Solve {
        phase: String,
        step: u64,
        global_step: u64,
        source: EngineError,
    },
    #[error("Dump failed after {step} steps")]
    Dump { step: u64, source: EngineError },
    #[error("Configuration error")]
    Config {
        #[from]
        source: LoadConfigError,
    },
}

pub enum SimResult {
    Success(String),
    Warning(String),
    Error(String),
}

impl From<Error> for SimResult {
    fn from(err: Error) -> SimResult {
        match err {
            Error::SizeMismatch { .. } => {
                SimResult::Error(format!("Internal consistency error: {}", err))
            }
            Error::InvalidParameter { name } => {
                SimResult::Error(format!("Invalid parameter: {:?}", name))
            }
            Error::Setup { source } => {
                SimResult::Error(format!("Failed to set up the problem: {}", source))
            }
            Error::Solve {
                phase,
                step,
                source: EngineError::NonConvergence { iterations },
                ..
            } => SimResult::Error(format!(
                "Solve did not converge in phase '{}' at step {} after {} iterations",
                phase, step, iterations
            )),
            Error::Solve {
                phase,
                step,
                source,
                ..
            } => SimResult::Error(format!(
                "Solve failed in phase '{}' at step {}: {}",
                phase, step, source
            )),
            Error::Dump { step, source } => {
                SimResult::Error(format!("Dump failed after {} steps: {}", step, source))
            }
            _ => SimResult::Error(err.to_string()),
        }
    }
}

impl From<Result<RunSummary, Error>> for SimResult {
    fn from(res: Result<RunSummary, Error>) -> SimResult {
        match res {
            Ok(summary) if summary.phases.iter().all(|p| p.steps > 0) => {
                SimResult::Success(format!("{}", summary))
            }
            Ok(summary) => SimResult::Warning(format!("Some phases had no steps\n{}", summary)),
            Err(err) => err.into(),
        }
    }
}
