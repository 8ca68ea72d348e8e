//! Scenario setup: stations, arrival process, routing matrix, and RNG.
//!
//! External tooling is responsible for loading ride definitions and
//! transition tables from disk; this module takes them as in-memory values
//! and populates a world with everything one simulation run needs.

use bevy_ecs::prelude::{Resource, World};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::clock::SimulationClock;
use crate::customer::CustomerLedger;
use crate::distributions::Exponential;
use crate::errors::ParkError;
use crate::routing::RoutingModel;
use crate::station::{Station, StationId, StationIndex};

/// Definition of one ride.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    pub id: StationId,
    pub name: String,
    pub service_rate: f64,
}

impl StationConfig {
    pub fn new(id: StationId, name: impl Into<String>, service_rate: f64) -> Self {
        Self {
            id,
            name: name.into(),
            service_rate,
        }
    }
}

/// Parameters for building a park scenario.
#[derive(Debug, Clone)]
pub struct ScenarioParams {
    pub stations: Vec<StationConfig>,
    /// Customers arrive as a Poisson process with this rate; inter-arrival
    /// gaps are exponential with mean 1/arrival_rate.
    pub arrival_rate: f64,
    /// (n+2) x (n+2) transition matrix; row/column 0 is the entrance and
    /// row/column n+1 the exit.
    pub transition_matrix: Vec<Vec<f64>>,
    /// Random seed for reproducibility (optional; if None, uses entropy).
    pub seed: Option<u64>,
}

impl ScenarioParams {
    pub fn new(
        stations: Vec<StationConfig>,
        arrival_rate: f64,
        transition_matrix: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            stations,
            arrival_rate,
            transition_matrix,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Simulation-owned random source. Seeded runs are reproducible; there is no
/// process-wide hidden state.
#[derive(Resource)]
pub struct SimulationRng(pub StdRng);

impl SimulationRng {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self(rng)
    }
}

/// Poisson arrival process for new customers.
#[derive(Debug, Clone, Copy, Resource)]
pub struct ArrivalProcess {
    pub inter_arrival: Exponential,
}

/// Simulation horizon: no event at or past this time is processed.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimulationEndTime(pub f64);

/// When present, systems print a human-readable line per processed event.
/// Purely informational; removing it changes no simulation semantics.
#[derive(Debug, Clone, Copy, Default, Resource)]
pub struct ProgressLog;

/// Populates `world` with the clock, customer ledger, routing model, arrival
/// process, and one entity per station.
///
/// Validates the construction contract: positive rates, unique station ids
/// covering exactly 1..=n (routing rows are indexed by station id), and a
/// square transition matrix of size n+2. Row sums are not checked; see
/// [RoutingModel].
pub fn build_scenario(world: &mut World, params: ScenarioParams) -> Result<(), ParkError> {
    let num_stations = params.stations.len();

    let routing = RoutingModel::new(params.transition_matrix)?;
    if routing.size() != num_stations + 2 {
        return Err(ParkError::MatrixSizeMismatch {
            expected: num_stations + 2,
            actual: routing.size(),
            stations: num_stations,
        });
    }
    let inter_arrival = Exponential::new(params.arrival_rate)?;

    let mut index = StationIndex::default();
    for config in &params.stations {
        let station = Station::new(config.id, config.name.clone(), config.service_rate)?;
        if config.id as usize > num_stations || index.get(config.id).is_some() {
            return Err(ParkError::InvalidStationSet {
                id: config.id,
                expected: num_stations,
            });
        }
        let entity = world.spawn(station).id();
        index.insert(config.id, entity);
    }

    world.insert_resource(SimulationClock::default());
    world.insert_resource(CustomerLedger::default());
    world.insert_resource(SimulationRng::new(params.seed));
    world.insert_resource(ArrivalProcess { inter_arrival });
    world.insert_resource(routing);
    world.insert_resource(index);
    Ok(())
}
