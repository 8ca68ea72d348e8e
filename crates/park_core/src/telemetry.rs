//! Run output: per-customer visit records and per-station counters, in a
//! plain serializable form for downstream aggregation.

use std::fmt;

use bevy_ecs::prelude::World;
use serde::Serialize;

use crate::customer::{Customer, CustomerId, CustomerLedger};
use crate::station::{Station, StationId};

/// One customer's simulated journey. The three per-visit vectors are
/// parallel: entry i of each describes the i-th station visited.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub arrival_time: f64,
    pub path: Vec<StationId>,
    pub service_times: Vec<f64>,
    pub wait_times: Vec<f64>,
}

impl CustomerRecord {
    pub fn rides_taken(&self) -> usize {
        self.path.len()
    }

    pub fn total_wait_time(&self) -> f64 {
        self.wait_times.iter().sum()
    }

    pub fn total_service_time(&self) -> f64 {
        self.service_times.iter().sum()
    }
}

impl From<&Customer> for CustomerRecord {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id(),
            arrival_time: customer.arrival_time(),
            path: customer.path().to_vec(),
            service_times: customer.service_times().to_vec(),
            wait_times: customer.wait_times().to_vec(),
        }
    }
}

/// Counters and leftover queue for one station at stop time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReport {
    pub id: StationId,
    pub name: String,
    pub customers_processed: u64,
    pub total_service_time: f64,
    /// Customers still physically queued when the run stopped, head first.
    /// Their visit histories end at whatever they completed before the stop.
    pub queued_customers: Vec<CustomerId>,
}

impl fmt::Display for StationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Queue for the ride {}, {}: {:?}",
            self.id, self.name, self.queued_customers
        )
    }
}

/// Everything one simulation run produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationReport {
    pub customers: Vec<CustomerRecord>,
    pub stations: Vec<StationReport>,
}

/// Collects the report out of a finished world. Customers come back in
/// arrival (id) order, stations in id order.
pub fn collect_report(world: &mut World) -> SimulationReport {
    let customers = world
        .resource::<CustomerLedger>()
        .customers()
        .iter()
        .map(CustomerRecord::from)
        .collect();

    let mut stations: Vec<StationReport> = world
        .query::<&Station>()
        .iter(world)
        .map(|station| StationReport {
            id: station.id(),
            name: station.name().to_string(),
            customers_processed: station.customers_processed(),
            total_service_time: station.total_service_time(),
            queued_customers: station.queued_customers().collect(),
        })
        .collect();
    stations.sort_by_key(|station| station.id);

    SimulationReport {
        customers,
        stations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_totals_sum_the_visit_entries() {
        let record = CustomerRecord {
            id: 4,
            arrival_time: 1.0,
            path: vec![1, 3, 1],
            service_times: vec![0.5, 1.25, 0.25],
            wait_times: vec![0.0, 0.75, 0.0],
        };
        assert_eq!(record.rides_taken(), 3);
        assert!((record.total_service_time() - 2.0).abs() < 1e-12);
        assert!((record.total_wait_time() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn station_report_displays_queued_customer_ids() {
        let report = StationReport {
            id: 2,
            name: "Teacups".to_string(),
            customers_processed: 5,
            total_service_time: 3.5,
            queued_customers: vec![7, 9],
        };
        assert_eq!(
            report.to_string(),
            "Queue for the ride 2, Teacups: [7, 9]"
        );
    }
}
