use approx::assert_relative_eq;
pub use bloc::test_utils::*;
use bloc::{DriverBuilder, DriverParams, NullReporter, Phase, SimulationDriver};

pub fn init_logger() {
    let _ = env_logger::Builder::from_env("BLOC_LOG")
        .is_test(true)
        .try_init();
}

/// Builds a driver with the default scenario around the given engine.
#[allow(dead_code)]
pub fn default_driver(engine: MockEngine) -> SimulationDriver<MockEngine, NullReporter> {
    init_logger();
    DriverBuilder::new(DriverParams::default())
        .build(engine, NullReporter)
        .unwrap()
}

/// Builds a driver running only the given phases.
#[allow(dead_code)]
pub fn driver_with_phases(
    engine: MockEngine,
    phases: Vec<Phase>,
) -> SimulationDriver<MockEngine, NullReporter> {
    init_logger();
    DriverBuilder::new(DriverParams::default())
        .set_phases(phases)
        .build(engine, NullReporter)
        .unwrap()
}

/// Compares two velocity arrays entry by entry.
#[allow(dead_code)]
pub fn compare_velocities(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (&a, &e) in actual.iter().zip(expected.iter()) {
        assert_relative_eq!(a, e, max_relative = 1e-12);
    }
}
