use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::Resource;

use crate::errors::ParkError;
use crate::station::StationId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    /// A new customer enters the park.
    CustomerArrival,
    /// The station serves the customer at the head of its queue.
    ServiceCompletion(StationId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub time: f64,
    pub kind: EventKind,
}

/// The event popped by the runner for the current step.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

#[derive(Debug, Clone, Copy)]
struct ScheduledEvent {
    seq: u64,
    event: Event,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for ScheduledEvent {}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by event time.
        // Equal times fall back to reversed insertion order, so equal-time
        // events pop first-scheduled-first. Times are validated finite on
        // schedule(), so partial_cmp cannot observe a NaN.
        other
            .event
            .time
            .partial_cmp(&self.event.time)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Time-ordered queue of pending simulation events.
///
/// Arrival and completion events can coincide; downstream logic depends on
/// equal-time events being processed in scheduling order.
#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: f64,
    next_seq: u64,
    events: BinaryHeap<ScheduledEvent>,
}

impl SimulationClock {
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedules `kind` at `time`. Rejects negative or non-finite times.
    pub fn schedule(&mut self, time: f64, kind: EventKind) -> Result<(), ParkError> {
        if !time.is_finite() || time < 0.0 {
            return Err(ParkError::InvalidEventTime(time));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(ScheduledEvent {
            seq,
            event: Event { time, kind },
        });
        Ok(())
    }

    /// Removes and returns the earliest event, advancing `now` to its time.
    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?.event;
        self.now = event.time;
        Some(event)
    }

    pub fn next_event_time(&self) -> Option<f64> {
        self.events.peek().map(|scheduled| scheduled.event.time)
    }

    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
