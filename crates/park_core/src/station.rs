use std::collections::{HashMap, VecDeque};

use bevy_ecs::prelude::{Component, Entity, Resource};
use rand::Rng;

use crate::customer::CustomerId;
use crate::distributions::Exponential;
use crate::errors::ParkError;

pub type StationId = u32;

/// A ride: a FIFO queue of waiting customers plus an exponential
/// service-time generator and cumulative service counters.
#[derive(Debug, Clone, Component)]
pub struct Station {
    id: StationId,
    name: String,
    service_time: Exponential,
    queue: VecDeque<(CustomerId, f64)>,
    entry_times: HashMap<CustomerId, f64>,
    customers_processed: u64,
    total_service_time: f64,
}

impl Station {
    pub fn new(
        id: StationId,
        name: impl Into<String>,
        service_rate: f64,
    ) -> Result<Self, ParkError> {
        if id == 0 {
            return Err(ParkError::InvalidStationId(id));
        }
        let service_time = Exponential::new(service_rate)?;
        Ok(Self {
            id,
            name: name.into(),
            service_time,
            queue: VecDeque::new(),
            entry_times: HashMap::new(),
            customers_processed: 0,
            total_service_time: 0.0,
        })
    }

    pub fn id(&self) -> StationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn service_rate(&self) -> f64 {
        self.service_time.rate()
    }

    /// Appends the customer to the queue tail and records their entry time.
    /// A re-enqueue of the same customer overwrites the recorded entry time.
    pub fn enqueue(&mut self, customer: CustomerId, entry_time: f64) {
        self.queue.push_back((customer, entry_time));
        self.entry_times.insert(customer, entry_time);
    }

    /// Serves the customer at the head of the queue: draws a service
    /// duration and returns the customer together with their completion
    /// time. The entry-time record is left in place so the caller can read
    /// it right after the dequeue; a later re-enqueue overwrites it.
    pub fn dequeue_and_serve<R: Rng>(
        &mut self,
        current_time: f64,
        rng: &mut R,
    ) -> Result<(CustomerId, f64), ParkError> {
        if !current_time.is_finite() {
            return Err(ParkError::InvalidCurrentTime(current_time));
        }
        let (customer, _entry_time) = self
            .queue
            .pop_front()
            .ok_or(ParkError::EmptyQueue(self.id))?;
        self.customers_processed += 1;

        let service_time = self.service_time.sample(rng);
        self.total_service_time += service_time;

        Ok((customer, current_time + service_time))
    }

    /// Draws a prospective service duration without serving anyone.
    /// Counters are untouched and the sample is not reused when the customer
    /// is actually served.
    pub fn sample_service_time<R: Rng>(&self, rng: &mut R) -> f64 {
        self.service_time.sample(rng)
    }

    /// The queue-entry time recorded for `customer`, if any.
    pub fn entry_time(&self, customer: CustomerId) -> Option<f64> {
        self.entry_times.get(&customer).copied()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn customers_processed(&self) -> u64 {
        self.customers_processed
    }

    pub fn total_service_time(&self) -> f64 {
        self.total_service_time
    }

    /// Ids of customers still queued, head first.
    pub fn queued_customers(&self) -> impl Iterator<Item = CustomerId> + '_ {
        self.queue.iter().map(|(customer, _)| *customer)
    }
}

/// Station id -> entity, for O(1) dispatch of completion events.
#[derive(Debug, Default, Resource)]
pub struct StationIndex {
    map: HashMap<StationId, Entity>,
}

impl StationIndex {
    pub fn insert(&mut self, id: StationId, entity: Entity) {
        self.map.insert(id, entity);
    }

    pub fn get(&self, id: StationId) -> Option<Entity> {
        self.map.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
