//! Heuristic velocity damping of separated contact nodes.

use serde::{Deserialize, Serialize};

use crate::engine::StepState;
use crate::Error;

/// Damping factor applied to the velocity of separated contact entries after every step.
pub const DEFAULT_DAMPING_FACTOR: f64 = 0.99;

/// Counts of entries seen during a single damping pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DampingStats {
    /// Entries with a strictly positive gap. Their velocities were scaled.
    pub separated: usize,
    /// Entries with a non-positive gap. Their velocities are untouched.
    pub in_contact: usize,
}

impl std::ops::AddAssign for DampingStats {
    fn add_assign(&mut self, other: Self) {
        self.separated += other.separated;
        self.in_contact += other.in_contact;
    }
}

/// Scales velocities of contact entries that are currently separated.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactDamping {
    pub factor: f64,
}

impl Default for ContactDamping {
    fn default() -> Self {
        ContactDamping {
            factor: DEFAULT_DAMPING_FACTOR,
        }
    }
}

impl ContactDamping {
    pub fn new(factor: f64) -> Result<Self, Error> {
        let damping = ContactDamping { factor };
        damping.validate()?;
        Ok(damping)
    }

    /// Checks that the factor dissipates energy: it must lie in `(0, 1]`.
    pub fn validate(&self) -> Result<(), Error> {
        if self.factor.is_finite() && self.factor > 0.0 && self.factor <= 1.0 {
            Ok(())
        } else {
            Err(Error::InvalidParameter {
                name: "damping_factor".to_string(),
            })
        }
    }

    /// Runs one damping pass over the given step state.
    ///
    /// An entry is separated iff its gap is strictly positive; a zero gap counts as contact.
    pub fn apply(&self, state: StepState) -> Result<DampingStats, Error> {
        let StepState {
            gaps,
            velocities,
            dim,
        } = state;

        if dim == 0 || gaps.len() * dim != velocities.len() {
            return Err(Error::SizeMismatch {
                gaps: gaps.len(),
                velocities: velocities.len(),
                dim,
            });
        }

        let mut stats = DampingStats::default();
        for (&gap, vel) in gaps.iter().zip(velocities.chunks_exact_mut(dim)) {
            if gap > 0.0 {
                vel.iter_mut().for_each(|v| *v *= self.factor);
                stats.separated += 1;
            } else {
                stats.in_contact += 1;
            }
        }
        Ok(stats)
    }
}
