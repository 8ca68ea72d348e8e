pub mod clock;
pub mod customer;
pub mod distributions;
pub mod errors;
pub mod park;
pub mod routing;
pub mod runner;
pub mod scenario;
pub mod station;
pub mod systems;
pub mod telemetry;
