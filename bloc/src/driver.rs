//! The phase driven explicit time stepping loop.

use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

use crate::clock::SimulationClock;
use crate::config::DriverParams;
use crate::damping::DampingStats;
use crate::engine::{BoundaryCondition, Engine};
use crate::phase::Phase;
use crate::report::Reporter;
use crate::Error;

mod builder;

pub use builder::*;

/// Wall clock time spent in the different parts of a phase.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct PhaseTimings {
    pub solve: Duration,
    pub damping: Duration,
    pub dump: Duration,
}

impl std::ops::AddAssign for PhaseTimings {
    fn add_assign(&mut self, other: Self) {
        self.solve += other.solve;
        self.damping += other.damping;
        self.dump += other.dump;
    }
}

/// Outcome of a single completed phase.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseSummary {
    pub name: String,
    /// Number of completed steps.
    pub steps: u64,
    /// Number of dumps issued during this phase.
    pub dumps: u64,
    /// Damping counts accumulated over all steps.
    pub damping: DampingStats,
    pub timings: PhaseTimings,
}

impl PhaseSummary {
    fn new(name: &str) -> Self {
        PhaseSummary {
            name: name.to_string(),
            steps: 0,
            dumps: 0,
            damping: DampingStats::default(),
            timings: PhaseTimings::default(),
        }
    }
}

/// Outcome of a complete run.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RunSummary {
    pub time_step: f64,
    /// Total number of completed steps.
    pub steps: u64,
    /// Total number of dumps including the initial one.
    pub dumps: u64,
    pub phases: Vec<PhaseSummary>,
}

impl RunSummary {
    pub fn timings(&self) -> PhaseTimings {
        let mut total = PhaseTimings::default();
        for phase in self.phases.iter() {
            total += phase.timings;
        }
        total
    }
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Time step: {}", self.time_step)?;
        writeln!(f, "Steps: {}", self.steps)?;
        writeln!(f, "Dumps: {}", self.dumps)?;
        for phase in self.phases.iter() {
            writeln!(
                f,
                "  {:<12} steps: {:>6}  dumps: {:>4}  separated: {:>8}  in contact: {:>8}",
                phase.name,
                phase.steps,
                phase.dumps,
                phase.damping.separated,
                phase.damping.in_contact
            )?;
        }
        let timings = self.timings();
        writeln!(f, "Timings (ms):")?;
        writeln!(f, "  Solve time:   {}", timings.solve.as_millis())?;
        writeln!(f, "  Damping time: {}", timings.damping.as_millis())?;
        write!(f, "  Dump time:    {}", timings.dump.as_millis())
    }
}

/// Drives an [`Engine`] through a sequence of loading phases.
///
/// After every solve, velocities of separated contact entries are damped and the engine state is
/// periodically dumped. Any engine failure aborts the run immediately.
pub struct SimulationDriver<E, R> {
    engine: E,
    params: DriverParams,
    time_step: f64,
    clock: SimulationClock,
    /// Number of dumps issued so far.
    dumps: u64,
    reporter: R,
}

impl<E: Engine, R: Reporter> SimulationDriver<E, R> {
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    pub fn params(&self) -> &DriverParams {
        &self.params
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// The time step installed in the engine.
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn clock(&self) -> SimulationClock {
        self.clock
    }

    pub fn dumps(&self) -> u64 {
        self.dumps
    }

    fn dump(&mut self) -> Result<Duration, Error> {
        let start = Instant::now();
        self.engine.dump().map_err(|source| Error::Dump {
            step: self.clock.step(),
            source,
        })?;
        self.dumps += 1;
        Ok(start.elapsed())
    }

    /// Dumps the initial state and runs all configured phases in order.
    pub fn run(&mut self) -> Result<RunSummary, Error> {
        log::info!(
            "Running {} phases ({} steps)",
            self.params.phases.len(),
            self.params.total_steps()
        );

        self.dump()?;

        let phases = self.params.phases.clone();
        let mut phase_summaries = Vec::with_capacity(phases.len());
        for phase in phases.iter() {
            phase_summaries.push(self.run_phase(phase)?);
        }

        Ok(RunSummary {
            time_step: self.time_step,
            steps: self.clock.step(),
            dumps: self.dumps,
            phases: phase_summaries,
        })
    }

    /// Runs all steps of a single phase.
    pub fn run_phase(&mut self, phase: &Phase) -> Result<PhaseSummary, Error> {
        log::info!("Begin phase '{}'", phase.name);
        let mut summary = PhaseSummary::new(&phase.name);

        for step in 0..phase.iterations {
            if let Some(inc) = phase.increment.as_ref() {
                self.engine.apply_boundary_condition(
                    BoundaryCondition::Increment(inc.delta),
                    inc.axis,
                    &inc.surface,
                );
            }

            let start = Instant::now();
            if let Err(source) = self.engine.solve_step() {
                log::error!(
                    "Solve failed in phase '{}' at step {}: {}",
                    phase.name,
                    step,
                    source
                );
                return Err(Error::Solve {
                    phase: phase.name.clone(),
                    step,
                    global_step: self.clock.step(),
                    source,
                });
            }
            summary.timings.solve += start.elapsed();

            // Gaps are read after the solve, so damping reacts to the new contact state.
            let start = Instant::now();
            let stats = self.params.damping.apply(self.engine.step_state())?;
            summary.timings.damping += start.elapsed();
            summary.damping += stats;

            let global_step = self.clock.tick();
            summary.steps += 1;
            log::trace!(
                "{} step {}: {} separated, {} in contact",
                phase.name,
                step,
                stats.separated,
                stats.in_contact
            );

            if self.params.checkpoint.is_due(step, global_step) {
                summary.timings.dump += self.dump()?;
                summary.dumps += 1;
                log::debug!("Dumped {} step {} (global {})", phase.name, step, global_step);
                self.reporter.checkpoint(&phase.name, step);
            }
        }

        self.reporter.phase_complete(&phase.completion_message());
        log::info!(
            "Finished phase '{}' after {} steps with {} dumps",
            phase.name,
            summary.steps,
            summary.dumps
        );
        Ok(summary)
    }
}
