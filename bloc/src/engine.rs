//! The capability interface of an external coupled solid/contact engine.
//!
//! Everything that involves actual mechanics (meshes, materials, assembly, contact detection and
//! time integration) lives behind the [`Engine`] trait. The driver only ever sees one engine
//! handle and the borrowed [`StepState`] view into its contact arrays.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Spatial axis along which a boundary condition is prescribed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component index of this axis in a nodal vector.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// Dirichlet boundary condition applied to a named surface.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BoundaryCondition {
    /// Block the degrees of freedom at the given value.
    Fixed(f64),
    /// Shift the currently prescribed value by the given amount.
    Increment(f64),
}

/// Kind of a field registered for dumping.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Scalar,
    Vector,
}

/// Paths to the problem description consumed by [`Engine::load`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemPaths {
    /// Material database.
    pub config: PathBuf,
    /// Mesh file.
    pub mesh: PathBuf,
    /// Directory receiving dumped files. If `None`, the engine decides where output goes.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl Default for ProblemPaths {
    fn default() -> Self {
        ProblemPaths {
            config: PathBuf::from("material.dat"),
            mesh: PathBuf::from("bloc.msh"),
            output: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to load problem: {0}")]
    Load(String),
    #[error("Solve did not converge after {iterations} iterations")]
    NonConvergence { iterations: u32 },
    #[error("Invalid contact state: {0}")]
    InvalidContactState(String),
    #[error("Dump failed: {0}")]
    Dump(String),
    #[error("Engine I/O error")]
    Io(#[from] std::io::Error),
}

/// Per-step view into the contact tracked arrays of the engine.
///
/// `gaps` holds one value per contact tracked entry and `velocities` holds `dim` components for
/// each of those entries in the same order. The view is only valid between two calls to
/// [`Engine::solve_step`].
#[derive(Debug)]
pub struct StepState<'a> {
    pub gaps: &'a [f64],
    pub velocities: &'a mut [f64],
    /// Number of velocity components per gap entry.
    pub dim: usize,
}

impl<'a> StepState<'a> {
    /// A view with one velocity component per gap.
    pub fn scalar(gaps: &'a [f64], velocities: &'a mut [f64]) -> Self {
        StepState {
            gaps,
            velocities,
            dim: 1,
        }
    }

    /// A view where each gap corresponds to a `dim` dimensional nodal velocity.
    pub fn nodal(gaps: &'a [f64], velocities: &'a mut [f64], dim: usize) -> Self {
        StepState {
            gaps,
            velocities,
            dim,
        }
    }

    /// Number of contact tracked entries.
    pub fn len(&self) -> usize {
        self.gaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gaps.is_empty()
    }
}

/// A coupled solid mechanics and contact mechanics engine.
pub trait Engine {
    /// Loads the mesh and material description.
    fn load(problem: &ProblemPaths) -> Result<Self, EngineError>
    where
        Self: Sized;
    /// Largest time step for which the explicit scheme is stable.
    fn stable_time_step(&self) -> f64;
    fn set_time_step(&mut self, time_step: f64);
    /// Sets the base name of the dumped files.
    fn set_base_name(&mut self, name: &str);
    fn apply_boundary_condition(&mut self, bc: BoundaryCondition, axis: Axis, surface: &str);
    /// Advances solid and contact state by one time step.
    fn solve_step(&mut self) -> Result<(), EngineError>;
    /// Borrows the current gaps along with the corresponding mutable velocities.
    fn step_state(&mut self) -> StepState<'_>;
    fn register_dump_field(&mut self, name: &str, kind: FieldKind);
    /// Writes all registered fields to persistent storage.
    fn dump(&mut self) -> Result<(), EngineError>;
}
