//! Step counting and checkpoint cadence.

use serde::{Deserialize, Serialize};

use crate::Error;

/// Default number of steps between two consecutive dumps.
pub const DEFAULT_CHECKPOINT_STRIDE: u64 = 100;

/// Monotonically increasing count of completed steps across all phases.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SimulationClock {
    step: u64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of steps completed so far.
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Records a completed step and returns the index of that step.
    pub fn tick(&mut self) -> u64 {
        let step = self.step;
        self.step += 1;
        step
    }
}

/// Which step counter drives the checkpoint cadence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cadence {
    /// Count restarts at zero at the beginning of every phase.
    PerPhase,
    /// Count is continuous across phases.
    Global,
}

impl Default for Cadence {
    fn default() -> Self {
        Cadence::PerPhase
    }
}

/// Decides after which steps the engine state is dumped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointSchedule {
    pub stride: u64,
    #[serde(default)]
    pub cadence: Cadence,
}

impl Default for CheckpointSchedule {
    fn default() -> Self {
        CheckpointSchedule {
            stride: DEFAULT_CHECKPOINT_STRIDE,
            cadence: Cadence::default(),
        }
    }
}

impl CheckpointSchedule {
    pub fn validate(&self) -> Result<(), Error> {
        if self.stride == 0 {
            return Err(Error::InvalidParameter {
                name: "checkpoint.stride".to_string(),
            });
        }
        Ok(())
    }

    /// Returns `true` if a dump is due after the step with the given phase local and global
    /// indices.
    pub fn is_due(&self, local_step: u64, global_step: u64) -> bool {
        let step = match self.cadence {
            Cadence::PerPhase => local_step,
            Cadence::Global => global_step,
        };
        step % self.stride == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_ticks() {
        let mut clock = SimulationClock::new();
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.tick(), 1);
        assert_eq!(clock.step(), 2);
    }

    #[test]
    fn per_phase_cadence_ignores_global_count() {
        let schedule = CheckpointSchedule::default();
        assert!(schedule.is_due(0, 10_050));
        assert!(schedule.is_due(200, 3));
        assert!(!schedule.is_due(50, 100));
    }

    #[test]
    fn global_cadence_ignores_local_count() {
        let schedule = CheckpointSchedule {
            stride: 100,
            cadence: Cadence::Global,
        };
        assert!(schedule.is_due(50, 10_100));
        assert!(!schedule.is_due(0, 10_050));
    }

    #[test]
    fn zero_stride_is_rejected() {
        let schedule = CheckpointSchedule {
            stride: 0,
            cadence: Cadence::Global,
        };
        assert!(schedule.validate().is_err());
    }
}
