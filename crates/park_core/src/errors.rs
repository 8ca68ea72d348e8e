use thiserror::Error;

use crate::station::StationId;

/// Contract violations raised at the point of misuse.
///
/// These are programmer-error-class failures: the operation that triggered
/// one is aborted and nothing is retried. Routing rows that do not sum to 1
/// are deliberately *not* caught up front (see [crate::routing::RoutingModel]).
#[derive(Debug, Error)]
pub enum ParkError {
    #[error("event time must be a non-negative finite number, got {0}")]
    InvalidEventTime(f64),

    #[error("arrival time must be a non-negative finite number, got {0}")]
    InvalidArrivalTime(f64),

    #[error("ride visits must record non-negative times (service {service}, wait {wait})")]
    InvalidVisit { service: f64, wait: f64 },

    #[error("station id must be positive, got {0}")]
    InvalidStationId(StationId),

    #[error("rate must be a positive finite number, got {0}")]
    InvalidRate(f64),

    #[error("station {0} has no queued customer to serve")]
    EmptyQueue(StationId),

    #[error("current time must be a finite number, got {0}")]
    InvalidCurrentTime(f64),

    #[error("transition matrix must be square and non-empty")]
    MatrixNotSquare,

    #[error("transition matrix has {actual} rows, expected {expected} for {stations} stations")]
    MatrixSizeMismatch {
        expected: usize,
        actual: usize,
        stations: usize,
    },

    #[error("routing row {row} is out of range for a {size}x{size} matrix")]
    RowOutOfRange { row: usize, size: usize },

    #[error("routing row {row} is not a usable distribution: {reason}")]
    InvalidRoutingRow { row: usize, reason: String },

    #[error("station ids must be unique and cover 1..={expected}; station {id} does not fit")]
    InvalidStationSet { id: StationId, expected: usize },

    #[error("horizon must be a non-negative finite number, got {0}")]
    InvalidHorizon(f64),
}
