use bevy_ecs::prelude::Resource;

use crate::errors::ParkError;
use crate::station::StationId;

pub type CustomerId = u64;

/// A customer visiting the park.
///
/// Identity and arrival time are fixed at creation; the only mutation is
/// [Customer::record_visit], which appends one entry to each of the three
/// parallel per-visit sequences. They always have equal length.
#[derive(Debug, Clone)]
pub struct Customer {
    id: CustomerId,
    arrival_time: f64,
    path: Vec<StationId>,
    service_times: Vec<f64>,
    wait_times: Vec<f64>,
}

impl Customer {
    pub fn new(id: CustomerId, arrival_time: f64) -> Result<Self, ParkError> {
        if !arrival_time.is_finite() || arrival_time < 0.0 {
            return Err(ParkError::InvalidArrivalTime(arrival_time));
        }
        Ok(Self {
            id,
            arrival_time,
            path: Vec::new(),
            service_times: Vec::new(),
            wait_times: Vec::new(),
        })
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    /// Station ids visited, in order.
    pub fn path(&self) -> &[StationId] {
        &self.path
    }

    /// Time spent in service at each visited station.
    pub fn service_times(&self) -> &[f64] {
        &self.service_times
    }

    /// Time spent queued at each visited station.
    pub fn wait_times(&self) -> &[f64] {
        &self.wait_times
    }

    pub fn rides_taken(&self) -> usize {
        self.path.len()
    }

    /// Records one completed station visit. Rejects negative or non-finite
    /// service/wait times without appending anything.
    pub fn record_visit(
        &mut self,
        station: StationId,
        service_time: f64,
        wait_time: f64,
    ) -> Result<(), ParkError> {
        let valid = |t: f64| t.is_finite() && t >= 0.0;
        if !valid(service_time) || !valid(wait_time) {
            return Err(ParkError::InvalidVisit {
                service: service_time,
                wait: wait_time,
            });
        }
        self.path.push(station);
        self.service_times.push(service_time);
        self.wait_times.push(wait_time);
        Ok(())
    }
}

/// All customers admitted so far, in arrival order, plus the next id to hand
/// out. Ids are sequential starting at 1; customers are never removed, they
/// simply stop appearing in future events once routed to the exit.
#[derive(Debug, Resource)]
pub struct CustomerLedger {
    customers: Vec<Customer>,
    next_id: CustomerId,
}

impl Default for CustomerLedger {
    fn default() -> Self {
        Self {
            customers: Vec::new(),
            next_id: 1,
        }
    }
}

impl CustomerLedger {
    /// Creates the next customer and returns their id.
    pub fn admit(&mut self, arrival_time: f64) -> Result<CustomerId, ParkError> {
        let customer = Customer::new(self.next_id, arrival_time)?;
        self.next_id += 1;
        let id = customer.id();
        self.customers.push(customer);
        Ok(id)
    }

    pub fn get_mut(&mut self, id: CustomerId) -> Option<&mut Customer> {
        // Sequential ids from 1, so the ledger index is id - 1.
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        self.customers.get_mut(index)
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}
