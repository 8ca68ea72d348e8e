//! The simulation engine facade: build a park, run it once, read the report.

use bevy_ecs::prelude::{Schedule, World};

use crate::errors::ParkError;
use crate::runner::{self, simulation_schedule};
use crate::scenario::{build_scenario, ProgressLog, ScenarioParams, SimulationEndTime};
use crate::telemetry::{collect_report, SimulationReport};

/// A single-run theme park simulation.
///
/// The park owns its world for the duration of one run and `simulate`
/// consumes it, so every run starts from freshly constructed stations and an
/// independent random source.
pub struct ThemePark {
    world: World,
    schedule: Schedule,
}

impl ThemePark {
    /// Builds the world from `params` and schedules the first customer
    /// arrival at a sampled inter-arrival gap.
    pub fn new(params: ScenarioParams) -> Result<Self, ParkError> {
        let mut world = World::new();
        build_scenario(&mut world, params)?;
        runner::initialize_simulation(&mut world)?;
        Ok(Self {
            world,
            schedule: simulation_schedule(),
        })
    }

    /// Processes events in time order until the clock empties or the next
    /// event is no longer strictly below `max_time`. Events at or past the
    /// horizon are abandoned; customers still queued at a station keep
    /// whatever partial visit history they accumulated.
    ///
    /// With `verbose` set, a human-readable line is printed per arrival and
    /// completion; this has no effect on the simulation itself.
    pub fn simulate(mut self, max_time: f64, verbose: bool) -> Result<SimulationReport, ParkError> {
        if !max_time.is_finite() || max_time < 0.0 {
            return Err(ParkError::InvalidHorizon(max_time));
        }
        self.world.insert_resource(SimulationEndTime(max_time));
        if verbose {
            self.world.insert_resource(ProgressLog);
        }

        while runner::run_next_event(&mut self.world, &mut self.schedule) {}

        Ok(collect_report(&mut self.world))
    }
}
