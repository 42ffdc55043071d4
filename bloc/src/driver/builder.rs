use super::*;
use crate::clock::CheckpointSchedule;
use crate::damping::ContactDamping;

/// Collects driver parameters and performs the engine setup.
#[derive(Clone, Debug, Default)]
pub struct DriverBuilder {
    params: DriverParams,
}

impl DriverBuilder {
    /// Create a `DriverBuilder` starting from the given parameters.
    pub fn new(params: DriverParams) -> Self {
        DriverBuilder { params }
    }

    /// Create a `DriverBuilder` from parameters stored in a RON file.
    pub fn from_config_file(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        let params = crate::config::load_params(path)?;
        log::debug!("Loaded driver parameters: {} phases", params.phases.len());
        Ok(DriverBuilder::new(params))
    }

    /// Replace the phase schedule.
    pub fn set_phases(&mut self, phases: Vec<Phase>) -> &mut Self {
        self.params.phases = phases;
        self
    }

    pub fn add_phase(&mut self, phase: Phase) -> &mut Self {
        self.params.phases.push(phase);
        self
    }

    pub fn set_checkpoint(&mut self, checkpoint: CheckpointSchedule) -> &mut Self {
        self.params.checkpoint = checkpoint;
        self
    }

    pub fn set_damping(&mut self, damping: ContactDamping) -> &mut Self {
        self.params.damping = damping;
        self
    }

    pub fn set_time_step_scale(&mut self, scale: f64) -> &mut Self {
        self.params.time_step_scale = scale;
        self
    }

    pub fn set_base_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.params.base_name = name.into();
        self
    }

    /// Set the directory receiving dumped files.
    pub fn set_output(&mut self, dir: impl Into<std::path::PathBuf>) -> &mut Self {
        self.params.problem.output = Some(dir.into());
        self
    }

    pub fn params(&self) -> &DriverParams {
        &self.params
    }

    /// Load the problem through the engine and build the driver.
    pub fn load<E: Engine, R: Reporter>(
        &self,
        reporter: R,
    ) -> Result<SimulationDriver<E, R>, Error> {
        self.params.validate()?;
        let engine = E::load(&self.params.problem).map_err(|source| Error::Setup { source })?;
        self.build(engine, reporter)
    }

    /// Build the driver around an already loaded engine.
    ///
    /// This installs the time step, dump fields and fixed boundary conditions.
    pub fn build<E: Engine, R: Reporter>(
        &self,
        mut engine: E,
        mut reporter: R,
    ) -> Result<SimulationDriver<E, R>, Error> {
        let DriverBuilder { params } = self;
        params.validate()?;

        let time_step = engine.stable_time_step() * params.time_step_scale;
        if !(time_step.is_finite() && time_step > 0.0) {
            return Err(Error::NonPositiveTimeStep { time_step });
        }
        engine.set_time_step(time_step);
        log::info!("Time step: {}", time_step);
        reporter.time_step(time_step);

        engine.set_base_name(&params.base_name);
        for field in params.dump_fields.iter() {
            engine.register_dump_field(&field.name, field.kind);
        }

        for bc in params.fixed.iter() {
            log::debug!("Fixing {} on '{}' at {}", bc.axis, bc.surface, bc.value);
            engine.apply_boundary_condition(
                BoundaryCondition::Fixed(bc.value),
                bc.axis,
                &bc.surface,
            );
        }

        Ok(SimulationDriver {
            engine,
            params: params.clone(),
            time_step,
            clock: SimulationClock::new(),
            dumps: 0,
            reporter,
        })
    }
}
