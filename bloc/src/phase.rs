//! Loading phases of the bloc friction scenario.

use serde::{Deserialize, Serialize};

use crate::engine::Axis;
use crate::Error;

/// Surface driven by the loading phases.
pub const LOADING_SURFACE: &str = "loading";

/// Number of steps in each of the default phases.
pub const DEFAULT_PHASE_ITERATIONS: u64 = 10_000;

/// Prescribed displacement increment applied before every step of a phase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Increment {
    pub axis: Axis,
    pub surface: String,
    /// Increment per step.
    pub delta: f64,
}

impl Increment {
    /// An increment that adds up to `total` over `iterations` steps.
    pub fn spread(axis: Axis, surface: impl Into<String>, total: f64, iterations: u64) -> Self {
        Increment {
            axis,
            surface: surface.into(),
            delta: total / iterations as f64,
        }
    }
}

/// A named stage of the simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub iterations: u64,
    /// Boundary increment applied before each step. `None` lets the system relax.
    #[serde(default)]
    pub increment: Option<Increment>,
}

impl Phase {
    pub fn new(name: impl Into<String>, iterations: u64) -> Self {
        Phase {
            name: name.into(),
            iterations,
            increment: None,
        }
    }

    pub fn with_increment(mut self, increment: Increment) -> Self {
        self.increment = Some(increment);
        self
    }

    /// Changes the number of steps. The per-step increment is kept as is.
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Compress the bloc against the wall by pushing the loading surface down by one unit.
    pub fn compression() -> Self {
        Phase::new("compression", DEFAULT_PHASE_ITERATIONS).with_increment(Increment::spread(
            Axis::Y,
            LOADING_SURFACE,
            -1.0,
            DEFAULT_PHASE_ITERATIONS,
        ))
    }

    /// Slide the compressed bloc along the wall by two units.
    pub fn sliding() -> Self {
        Phase::new("sliding", DEFAULT_PHASE_ITERATIONS).with_increment(Increment::spread(
            Axis::X,
            LOADING_SURFACE,
            2.0,
            DEFAULT_PHASE_ITERATIONS,
        ))
    }

    /// Let the system stabilize without any additional loading.
    pub fn relaxation() -> Self {
        Phase::new("relaxation", DEFAULT_PHASE_ITERATIONS)
    }

    /// Total increment applied over the whole phase.
    pub fn total_increment(&self) -> f64 {
        self.increment
            .as_ref()
            .map_or(0.0, |inc| inc.delta * self.iterations as f64)
    }

    /// Operator message printed once the phase completes, e.g. `"Sliding done !"`.
    pub fn completion_message(&self) -> String {
        let mut chars = self.name.chars();
        let label: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        format!("{} done !", label)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.name.is_empty() {
            return Err(Error::InvalidParameter {
                name: "phase.name".to_string(),
            });
        }
        if let Some(inc) = self.increment.as_ref() {
            if !inc.delta.is_finite() {
                return Err(Error::InvalidParameter {
                    name: format!("{}.increment.delta", self.name),
                });
            }
            if inc.surface.is_empty() {
                return Err(Error::InvalidParameter {
                    name: format!("{}.increment.surface", self.name),
                });
            }
        }
        Ok(())
    }
}

/// Compression, sliding and relaxation, in that order.
pub fn default_phases() -> Vec<Phase> {
    vec![Phase::compression(), Phase::sliding(), Phase::relaxation()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_schedule() {
        let phases = default_phases();
        let names: Vec<_> = phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["compression", "sliding", "relaxation"]);
        assert_eq!(phases.iter().map(|p| p.iterations).sum::<u64>(), 30_000);

        assert_relative_eq!(phases[0].total_increment(), -1.0, epsilon = 1e-12);
        assert_eq!(phases[0].increment.as_ref().unwrap().axis, Axis::Y);
        assert_relative_eq!(phases[1].total_increment(), 2.0, epsilon = 1e-12);
        assert_eq!(phases[1].increment.as_ref().unwrap().axis, Axis::X);
        assert!(phases[2].increment.is_none());
    }

    #[test]
    fn completion_messages() {
        assert_eq!(Phase::compression().completion_message(), "Compression done !");
        assert_eq!(Phase::relaxation().completion_message(), "Relaxation done !");
    }

    #[test]
    fn validation() {
        assert!(Phase::new("", 1).validate().is_err());
        let bad = Phase::new("push", 1).with_increment(Increment {
            axis: Axis::X,
            surface: "loading".to_string(),
            delta: f64::INFINITY,
        });
        assert!(bad.validate().is_err());
        assert!(Phase::sliding().validate().is_ok());
    }
}
