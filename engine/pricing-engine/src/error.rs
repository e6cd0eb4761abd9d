//! Error types for the pricing engine

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors that can occur while evolving prices
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PriceError {
    #[error("lot {lot_id}: capacity is zero at {timestamp}")]
    InvalidCapacity {
        lot_id: String,
        timestamp: NaiveDateTime,
    },

    #[error("lot {lot_id}: observation at {current} precedes previous observation at {previous}")]
    OutOfOrderInput {
        lot_id: String,
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },

    #[error("lot {lot_id}: demand score is not finite at {timestamp}")]
    NonFiniteDemand {
        lot_id: String,
        timestamp: NaiveDateTime,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
