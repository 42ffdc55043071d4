use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clock::CheckpointSchedule;
use crate::damping::ContactDamping;
use crate::engine::{Axis, FieldKind, ProblemPaths};
use crate::phase::{default_phases, Phase, LOADING_SURFACE};
use crate::Error;

/// Fraction of the stable time step used for the explicit integration.
pub const DEFAULT_TIME_STEP_SCALE: f64 = 0.1;

#[derive(thiserror::Error, Debug)]
pub enum LoadConfigError {
    #[error("IO")]
    IO(#[from] std::io::Error),
    #[error("Parse")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize")]
    Serialize(#[from] ron::Error),
}

/// A field written out on every dump.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpField {
    pub name: String,
    pub kind: FieldKind,
}

impl DumpField {
    pub fn vector(name: &str) -> Self {
        DumpField {
            name: name.to_string(),
            kind: FieldKind::Vector,
        }
    }
    pub fn scalar(name: &str) -> Self {
        DumpField {
            name: name.to_string(),
            kind: FieldKind::Scalar,
        }
    }
}

/// A boundary condition installed once before any phase runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixedCondition {
    pub surface: String,
    pub axis: Axis,
    pub value: f64,
}

impl FixedCondition {
    pub fn new(surface: &str, axis: Axis, value: f64) -> Self {
        FixedCondition {
            surface: surface.to_string(),
            axis,
            value,
        }
    }
}

/// Parameters of a driven simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriverParams {
    pub problem: ProblemPaths,
    /// Base name of the dumped files.
    pub base_name: String,
    /// Multiplies the stable time step reported by the engine.
    pub time_step_scale: f64,
    pub damping: ContactDamping,
    pub checkpoint: CheckpointSchedule,
    pub dump_fields: Vec<DumpField>,
    pub fixed: Vec<FixedCondition>,
    pub phases: Vec<Phase>,
}

impl Default for DriverParams {
    fn default() -> Self {
        DriverParams {
            problem: ProblemPaths::default(),
            base_name: "bloc_friction".to_string(),
            time_step_scale: DEFAULT_TIME_STEP_SCALE,
            damping: ContactDamping::default(),
            checkpoint: CheckpointSchedule::default(),
            dump_fields: default_dump_fields(),
            fixed: default_fixed_conditions(),
            phases: default_phases(),
        }
    }
}

impl DriverParams {
    /// Checks parameters that would otherwise fail in the middle of a run.
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.time_step_scale.is_finite() && self.time_step_scale > 0.0) {
            return Err(Error::InvalidParameter {
                name: "time_step_scale".to_string(),
            });
        }
        if self.base_name.is_empty() {
            return Err(Error::InvalidParameter {
                name: "base_name".to_string(),
            });
        }
        self.damping.validate()?;
        self.checkpoint.validate()?;
        for phase in self.phases.iter() {
            phase.validate()?;
        }
        Ok(())
    }

    /// Total number of steps over all phases.
    pub fn total_steps(&self) -> u64 {
        self.phases.iter().map(|p| p.iterations).sum()
    }

    /// Saves these parameters to the given path as a RON file.
    pub fn save_as_ron(&self, path: impl AsRef<Path>) -> Result<(), LoadConfigError> {
        let f = File::create(path.as_ref())?;
        ron::ser::to_writer_pretty(f, self, ron::ser::PrettyConfig::new())?;
        Ok(())
    }

    /// Writes these parameters in RON format to the given writer.
    pub fn write_as_ron<W: std::io::Write>(&self, w: W) -> Result<(), LoadConfigError> {
        ron::ser::to_writer_pretty(w, self, ron::ser::PrettyConfig::new())?;
        Ok(())
    }
}

pub fn load_params(path: impl AsRef<Path>) -> std::result::Result<DriverParams, LoadConfigError> {
    let f = File::open(path.as_ref())?;
    Ok(ron::de::from_reader(f)?)
}

/// Displacement, velocity, contact geometry and forces as vectors; areas, stress and the blocked
/// DOF mask as scalars.
pub fn default_dump_fields() -> Vec<DumpField> {
    vec![
        DumpField::vector("displacement"),
        DumpField::vector("velocity"),
        DumpField::vector("normals"),
        DumpField::vector("tangents"),
        DumpField::vector("contact_force"),
        DumpField::vector("external_force"),
        DumpField::vector("internal_force"),
        DumpField::scalar("areas"),
        DumpField::scalar("stress"),
        DumpField::scalar("blocked_dofs"),
    ]
}

/// Supports on the `XFixed`/`YFixed` surfaces and a zero prescribed displacement on the loading
/// surface.
pub fn default_fixed_conditions() -> Vec<FixedCondition> {
    vec![
        FixedCondition::new("XFixed", Axis::X, 0.0),
        FixedCondition::new("YFixed", Axis::Y, 0.0),
        FixedCondition::new(LOADING_SURFACE, Axis::X, 0.0),
        FixedCondition::new(LOADING_SURFACE, Axis::Y, 0.0),
    ]
}
