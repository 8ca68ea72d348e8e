//! Simulation runner: advances the clock and dispatches events to systems.
//!
//! Each step peeks at the next event first: events at or past
//! [SimulationEndTime] are never popped, so a finished run leaves them
//! abandoned on the clock. Otherwise the event is popped, inserted as
//! [CurrentEvent], and the schedule runs.

use bevy_ecs::prelude::{Res, Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::errors::ParkError;
use crate::scenario::{ArrivalProcess, SimulationEndTime, SimulationRng};
use crate::systems::arrival::customer_arrival_system;
use crate::systems::completion::service_completion_system;

fn is_customer_arrival(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::CustomerArrival))
        .unwrap_or(false)
}

fn is_service_completion(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| matches!(e.0.kind, EventKind::ServiceCompletion(_)))
        .unwrap_or(false)
}

/// Schedules the first customer arrival at a sampled inter-arrival gap.
/// Call after [crate::scenario::build_scenario], before running events.
pub fn initialize_simulation(world: &mut World) -> Result<(), ParkError> {
    let gap = {
        let arrivals = *world.resource::<ArrivalProcess>();
        let mut rng = world.resource_mut::<SimulationRng>();
        arrivals.inter_arrival.sample(&mut rng.0)
    };
    world
        .resource_mut::<SimulationClock>()
        .schedule(gap, EventKind::CustomerArrival)
}

/// Runs one simulation step. Returns `false` without popping anything when
/// the clock is empty or the next event is at or past [SimulationEndTime]
/// (when that resource is present); the strict below-the-horizon rule means
/// an event at exactly the horizon is never processed.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    let stop_at = world.get_resource::<SimulationEndTime>().map(|end| end.0);
    let next_ts = world
        .get_resource::<SimulationClock>()
        .and_then(|clock| clock.next_event_time());
    if let (Some(end), Some(ts)) = (stop_at, next_ts) {
        if ts >= end {
            return false;
        }
    }

    let event = match world.resource_mut::<SimulationClock>().pop_next() {
        Some(event) => event,
        None => return false,
    };
    world.insert_resource(CurrentEvent(event));
    schedule.run(world);
    true
}

/// Runs simulation steps until the horizon, an empty clock, or `max_steps`.
/// Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule) {
        steps += 1;
    }
    steps
}

/// Builds the simulation schedule: one system per event kind, gated on the
/// current event so only the matching handler runs.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((
        customer_arrival_system.run_if(is_customer_arrival),
        service_completion_system.run_if(is_service_completion),
    ));
    schedule
}
