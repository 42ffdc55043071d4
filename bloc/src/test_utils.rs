use std::collections::HashMap;

use crate::engine::*;

/// An engine call observed by [`MockEngine`].
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    TimeStep(f64),
    BaseName(String),
    RegisterField(String, FieldKind),
    BoundaryCondition {
        bc: BoundaryCondition,
        axis: Axis,
        surface: String,
    },
    Solve,
    StepState,
    Dump,
}

/// Gaps and velocities seen by the damping pass of one step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepSnapshot {
    pub gaps: Vec<f64>,
    /// Velocities before damping.
    pub velocities: Vec<f64>,
}

/// An engine without mechanics that records every call made to it.
///
/// Velocities are left untouched by `solve_step`, so between two steps they only change through
/// the damping pass. Gaps stay fixed unless a gap function is set.
#[derive(Clone, Debug)]
pub struct MockEngine {
    pub stable_time_step: f64,
    pub time_step: Option<f64>,
    pub base_name: Option<String>,
    pub gaps: Vec<f64>,
    pub velocities: Vec<f64>,
    /// Velocity components per gap.
    pub dim: usize,
    /// Computes the gap of an entry from the solve index and the entry index.
    pub gap_fn: Option<fn(u64, usize) -> f64>,
    /// Index of the solve that fails with a non-convergence error.
    pub fail_at: Option<u64>,
    /// Index of the dump that fails.
    pub fail_dump_at: Option<u64>,
    /// Accumulated prescribed values per surface and axis.
    pub prescribed: HashMap<(String, Axis), f64>,
    pub fields: Vec<(String, FieldKind)>,
    pub solves: u64,
    pub dumps: u64,
    pub record_events: bool,
    pub events: Vec<Event>,
    pub record_snapshots: bool,
    pub snapshots: Vec<StepSnapshot>,
}

impl Default for MockEngine {
    fn default() -> Self {
        MockEngine {
            stable_time_step: 1.0e-3,
            time_step: None,
            base_name: None,
            gaps: Vec::new(),
            velocities: Vec::new(),
            dim: 1,
            gap_fn: None,
            fail_at: None,
            fail_dump_at: None,
            prescribed: HashMap::new(),
            fields: Vec::new(),
            solves: 0,
            dumps: 0,
            record_events: true,
            events: Vec::new(),
            record_snapshots: false,
            snapshots: Vec::new(),
        }
    }
}

impl MockEngine {
    pub fn new(gaps: Vec<f64>, velocities: Vec<f64>) -> Self {
        MockEngine {
            gaps,
            velocities,
            ..Default::default()
        }
    }

    /// Total prescribed value on the given surface and axis.
    pub fn prescribed(&self, surface: &str, axis: Axis) -> f64 {
        self.prescribed
            .get(&(surface.to_string(), axis))
            .copied()
            .unwrap_or(0.0)
    }

    /// Number of recorded events matching the predicate.
    pub fn count_events(&self, f: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| f(e)).count()
    }

    fn record(&mut self, event: Event) {
        if self.record_events {
            self.events.push(event);
        }
    }
}

impl Engine for MockEngine {
    fn load(problem: &ProblemPaths) -> Result<Self, EngineError> {
        if problem.mesh.as_os_str().is_empty() {
            return Err(EngineError::Load("missing mesh path".to_string()));
        }
        if problem.config.as_os_str().is_empty() {
            return Err(EngineError::Load("missing material path".to_string()));
        }
        Ok(MockEngine::default())
    }
    fn stable_time_step(&self) -> f64 {
        self.stable_time_step
    }
    fn set_time_step(&mut self, time_step: f64) {
        self.time_step = Some(time_step);
        self.record(Event::TimeStep(time_step));
    }
    fn set_base_name(&mut self, name: &str) {
        self.base_name = Some(name.to_string());
        self.record(Event::BaseName(name.to_string()));
    }
    fn apply_boundary_condition(&mut self, bc: BoundaryCondition, axis: Axis, surface: &str) {
        let value = self.prescribed.entry((surface.to_string(), axis)).or_insert(0.0);
        match bc {
            BoundaryCondition::Fixed(v) => *value = v,
            BoundaryCondition::Increment(dv) => *value += dv,
        }
        self.record(Event::BoundaryCondition {
            bc,
            axis,
            surface: surface.to_string(),
        });
    }
    fn solve_step(&mut self) -> Result<(), EngineError> {
        if self.fail_at == Some(self.solves) {
            return Err(EngineError::NonConvergence { iterations: 100 });
        }
        if let Some(gap_fn) = self.gap_fn {
            let solve = self.solves;
            for (i, gap) in self.gaps.iter_mut().enumerate() {
                *gap = gap_fn(solve, i);
            }
        }
        self.solves += 1;
        self.record(Event::Solve);
        Ok(())
    }
    fn step_state(&mut self) -> StepState<'_> {
        self.record(Event::StepState);
        if self.record_snapshots {
            self.snapshots.push(StepSnapshot {
                gaps: self.gaps.clone(),
                velocities: self.velocities.clone(),
            });
        }
        StepState::nodal(&self.gaps, &mut self.velocities, self.dim)
    }
    fn register_dump_field(&mut self, name: &str, kind: FieldKind) {
        self.fields.push((name.to_string(), kind));
        self.record(Event::RegisterField(name.to_string(), kind));
    }
    fn dump(&mut self) -> Result<(), EngineError> {
        if self.fail_dump_at == Some(self.dumps) {
            return Err(EngineError::Dump("disk full".to_string()));
        }
        self.dumps += 1;
        self.record(Event::Dump);
        Ok(())
    }
}
