use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::PriceError;

/// One sensor reading for one lot at one point in time.
///
/// Categorical signals arrive pre-encoded: the ingestion collaborator
/// maps vehicle types and traffic conditions to their numeric weights
/// before records reach the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Stable lot code (e.g. "BHMBCCMKT01")
    pub lot_id: String,

    /// Observation time, non-decreasing within a lot after sorting
    pub timestamp: NaiveDateTime,

    /// Occupied spaces; may exceed capacity in dirty data
    pub occupancy: u32,

    /// Total spaces; zero is rejected, never divided by
    pub capacity: u32,

    /// Vehicles waiting to enter
    pub queue_length: u32,

    /// Encoded vehicle type (car 1.0, bike 0.5, truck 1.5)
    pub vehicle_weight: f64,

    /// Encoded nearby congestion (low 1.0, medium 2.0, high 3.0)
    pub traffic_level: f64,

    /// Whether the day is a holiday/event day
    pub is_special_day: bool,
}

impl Observation {
    /// Occupancy as a fraction of capacity.
    ///
    /// Ratios above 1.0 are allowed (overfull lots happen in the data)
    /// and are absorbed by band clamping downstream. A zero capacity
    /// is an input error, never a division.
    pub fn occupancy_ratio(&self) -> Result<f64, PriceError> {
        if self.capacity == 0 {
            return Err(PriceError::InvalidCapacity {
                lot_id: self.lot_id.clone(),
                timestamp: self.timestamp,
            });
        }
        Ok(self.occupancy as f64 / self.capacity as f64)
    }
}

/// Carried state for one lot, created on first sighting and updated
/// after every observation. Never evicted during a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LotState {
    /// Price emitted for the lot's most recent observation
    pub last_price: f64,

    /// Timestamp of the lot's most recent observation
    pub last_seen: NaiveDateTime,
}

/// An observation together with its computed price.
///
/// Output of the evolver, aligned 1:1 with input under the halt
/// policy. `price` is always within the configured band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedObservation {
    #[serde(flatten)]
    pub observation: Observation,

    /// Computed price, clamped to [min_price, max_price]
    pub price: f64,
}
