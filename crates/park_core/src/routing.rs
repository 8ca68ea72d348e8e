//! Markov-chain customer routing between park locations.

use bevy_ecs::prelude::Resource;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::errors::ParkError;
use crate::station::StationId;

/// Transition probabilities between park locations.
///
/// Row/column 0 is the park entrance, rows 1..=n are the stations (indexed
/// by station id), and row n+1 is the exit. Each row is expected to be a
/// probability distribution over the columns. That is a precondition on the
/// caller, not something the model enforces: rows that do not sum to 1 are
/// normalized by the sampling primitive (a silently skewed distribution),
/// and rows with negative or all-zero weights fail at sampling time.
#[derive(Debug, Clone, Resource)]
pub struct RoutingModel {
    matrix: Vec<Vec<f64>>,
}

impl RoutingModel {
    /// Accepts any non-empty square matrix.
    pub fn new(matrix: Vec<Vec<f64>>) -> Result<Self, ParkError> {
        let size = matrix.len();
        if size == 0 || matrix.iter().any(|row| row.len() != size) {
            return Err(ParkError::MatrixNotSquare);
        }
        Ok(Self { matrix })
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.matrix.len()
    }

    /// Number of stations the matrix routes between, i.e. the size minus the
    /// entrance and exit rows.
    pub fn num_stations(&self) -> usize {
        self.matrix.len().saturating_sub(2)
    }

    /// Draws one column index from the row for `current` (0 for the
    /// entrance, a station id otherwise). Each draw is independent.
    pub fn sample_next<R: Rng>(&self, current: usize, rng: &mut R) -> Result<usize, ParkError> {
        let row = self.matrix.get(current).ok_or(ParkError::RowOutOfRange {
            row: current,
            size: self.size(),
        })?;
        let dist = WeightedIndex::new(row).map_err(|source| ParkError::InvalidRoutingRow {
            row: current,
            reason: source.to_string(),
        })?;
        Ok(dist.sample(rng))
    }

    /// Interprets a sampled column as a station id. The entrance and exit
    /// columns map to `None`: the customer leaves the simulation.
    pub fn as_station(&self, column: usize) -> Option<StationId> {
        if (1..=self.num_stations()).contains(&column) {
            Some(column as StationId)
        } else {
            None
        }
    }
}
