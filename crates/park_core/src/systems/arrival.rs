//! Arrival handling: admit a new customer, route them to a first ride, and
//! keep the Poisson arrival process going.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::customer::CustomerLedger;
use crate::routing::RoutingModel;
use crate::scenario::{ArrivalProcess, ProgressLog, SimulationRng};
use crate::station::{Station, StationIndex};

pub fn customer_arrival_system(
    mut clock: ResMut<SimulationClock>,
    event: Res<CurrentEvent>,
    mut ledger: ResMut<CustomerLedger>,
    mut rng: ResMut<SimulationRng>,
    routing: Res<RoutingModel>,
    arrivals: Res<ArrivalProcess>,
    index: Res<StationIndex>,
    mut stations: Query<&mut Station>,
    progress: Option<Res<ProgressLog>>,
) {
    if event.0.kind != EventKind::CustomerArrival {
        return;
    }
    let arrival_time = event.0.time;

    let Ok(customer_id) = ledger.admit(arrival_time) else {
        return;
    };

    // First ride, drawn from the entrance row. An entrance or exit column
    // means the customer leaves without riding anything. The first ride is
    // joined unconditionally; only onward routing checks the horizon.
    if let Ok(column) = routing.sample_next(0, &mut rng.0) {
        if let Some(station_id) = routing.as_station(column) {
            if let Some(entity) = index.get(station_id) {
                if let Ok(mut station) = stations.get_mut(entity) {
                    station.enqueue(customer_id, arrival_time);
                    clock
                        .schedule(arrival_time, EventKind::ServiceCompletion(station_id))
                        .ok();
                }
            }
        }
    }

    if progress.is_some() {
        println!("Customer {customer_id} arrived at time {arrival_time:.3}.");
    }

    // The arrival process never stops by itself; events past the horizon are
    // simply never popped.
    let gap = arrivals.inter_arrival.sample(&mut rng.0);
    clock
        .schedule(arrival_time + gap, EventKind::CustomerArrival)
        .ok();
}

#[cfg(test)]
mod tests {
    use bevy_ecs::prelude::World;

    use crate::clock::{EventKind, SimulationClock};
    use crate::customer::CustomerLedger;
    use crate::runner::{run_next_event, simulation_schedule};
    use crate::scenario::{build_scenario, ScenarioParams, SimulationEndTime, StationConfig};
    use crate::station::{Station, StationIndex};

    fn world_with_one_station() -> World {
        let mut world = World::new();
        let params = ScenarioParams::new(
            vec![StationConfig::new(1, "Coaster", 1.0)],
            0.5,
            vec![
                vec![0.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
                vec![0.0, 0.0, 1.0],
            ],
        )
        .with_seed(9);
        build_scenario(&mut world, params).expect("valid scenario");
        world.insert_resource(SimulationEndTime(100.0));
        world
    }

    #[test]
    fn arrival_admits_routes_and_reschedules() {
        let mut world = world_with_one_station();
        world
            .resource_mut::<SimulationClock>()
            .schedule(2.0, EventKind::CustomerArrival)
            .unwrap();

        let mut schedule = simulation_schedule();
        assert!(run_next_event(&mut world, &mut schedule));

        let ledger = world.resource::<CustomerLedger>();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.customers()[0].arrival_time(), 2.0);

        // One completion event for the joined ride plus the next arrival.
        assert_eq!(
            world.resource::<SimulationClock>().pending_event_count(),
            2
        );

        let entity = world.resource::<StationIndex>().get(1).expect("station 1");
        let station = world.entity(entity).get::<Station>().expect("component");
        assert_eq!(station.queue_len(), 1);
        assert_eq!(station.entry_time(1), Some(2.0));
    }

    #[test]
    fn exit_bound_arrival_joins_no_queue() {
        let mut world = World::new();
        let params = ScenarioParams::new(
            vec![StationConfig::new(1, "Coaster", 1.0)],
            0.5,
            vec![
                vec![0.0, 0.0, 1.0],
                vec![0.0, 0.0, 1.0],
                vec![0.0, 0.0, 1.0],
            ],
        )
        .with_seed(9);
        build_scenario(&mut world, params).expect("valid scenario");
        world.insert_resource(SimulationEndTime(100.0));
        world
            .resource_mut::<SimulationClock>()
            .schedule(1.0, EventKind::CustomerArrival)
            .unwrap();

        let mut schedule = simulation_schedule();
        assert!(run_next_event(&mut world, &mut schedule));

        assert_eq!(world.resource::<CustomerLedger>().len(), 1);
        // Only the next arrival is pending.
        assert_eq!(
            world.resource::<SimulationClock>().pending_event_count(),
            1
        );
        let entity = world.resource::<StationIndex>().get(1).expect("station 1");
        let station = world.entity(entity).get::<Station>().expect("component");
        assert_eq!(station.queue_len(), 0);
    }
}
