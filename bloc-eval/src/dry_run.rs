//! An engine that runs the schedule without any mechanics.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::PathBuf;

use bloc::{Axis, BoundaryCondition, Engine, EngineError, FieldKind, ProblemPaths, StepState};
use serde::Serialize;

/// Stable time step reported in place of one derived from a mesh.
pub const STABLE_TIME_STEP: f64 = 1.0e-3;

/// State written on every dump.
#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    step: u64,
    time: f64,
    fields: Vec<&'a str>,
    /// Prescribed displacement per surface, indexed by axis.
    prescribed: &'a BTreeMap<String, [f64; 3]>,
}

/// Tracks prescribed boundary values and dumps them as RON snapshots.
///
/// There are no contact tracked entries, so the damping pass is a no-op.
#[derive(Debug)]
pub struct DryRunEngine {
    output_dir: Option<PathBuf>,
    stable_time_step: f64,
    time_step: f64,
    base_name: String,
    fields: Vec<(String, FieldKind)>,
    prescribed: BTreeMap<String, [f64; 3]>,
    steps: u64,
    dumps: u64,
    gaps: Vec<f64>,
    velocities: Vec<f64>,
}

impl DryRunEngine {
    pub fn new(problem: &ProblemPaths) -> Self {
        log::warn!(
            "Dry run: '{}' and '{}' are not read",
            problem.config.display(),
            problem.mesh.display()
        );
        DryRunEngine {
            output_dir: problem.output.clone(),
            stable_time_step: STABLE_TIME_STEP,
            time_step: 0.0,
            base_name: String::new(),
            fields: Vec::new(),
            prescribed: BTreeMap::new(),
            steps: 0,
            dumps: 0,
            gaps: Vec::new(),
            velocities: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn prescribed(&self, surface: &str, axis: Axis) -> f64 {
        self.prescribed
            .get(surface)
            .map_or(0.0, |values| values[axis.index()])
    }
}

impl Engine for DryRunEngine {
    fn load(problem: &ProblemPaths) -> Result<Self, EngineError> {
        if let Some(dir) = problem.output.as_ref() {
            if !dir.is_dir() {
                return Err(EngineError::Load(format!(
                    "output directory '{}' does not exist",
                    dir.display()
                )));
            }
        }
        Ok(DryRunEngine::new(problem))
    }
    fn stable_time_step(&self) -> f64 {
        self.stable_time_step
    }
    fn set_time_step(&mut self, time_step: f64) {
        self.time_step = time_step;
    }
    fn set_base_name(&mut self, name: &str) {
        self.base_name = name.to_string();
    }
    fn apply_boundary_condition(&mut self, bc: BoundaryCondition, axis: Axis, surface: &str) {
        let values = self.prescribed.entry(surface.to_string()).or_insert([0.0; 3]);
        match bc {
            BoundaryCondition::Fixed(v) => values[axis.index()] = v,
            BoundaryCondition::Increment(dv) => values[axis.index()] += dv,
        }
    }
    fn solve_step(&mut self) -> Result<(), EngineError> {
        self.steps += 1;
        Ok(())
    }
    fn step_state(&mut self) -> StepState<'_> {
        StepState::nodal(&self.gaps, &mut self.velocities, 2)
    }
    fn register_dump_field(&mut self, name: &str, kind: FieldKind) {
        self.fields.push((name.to_string(), kind));
    }
    fn dump(&mut self) -> Result<(), EngineError> {
        if let Some(dir) = self.output_dir.as_ref() {
            let path = dir.join(format!("{}_{:05}.ron", self.base_name, self.dumps));
            let f = File::create(&path)?;
            let snapshot = Snapshot {
                step: self.steps,
                time: self.steps as f64 * self.time_step,
                fields: self.fields.iter().map(|(name, _)| name.as_str()).collect(),
                prescribed: &self.prescribed,
            };
            ron::ser::to_writer_pretty(f, &snapshot, ron::ser::PrettyConfig::new())
                .map_err(|e| EngineError::Dump(e.to_string()))?;
        }
        self.dumps += 1;
        Ok(())
    }
}
