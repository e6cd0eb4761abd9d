//! Error types for dataset ingestion

use thiserror::Error;

/// Errors that can occur while ingesting the dataset
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot parse timestamp from date {date:?} time {time:?}")]
    InvalidTimestamp { date: String, time: String },

    #[error("unknown vehicle type {0:?}")]
    UnknownVehicleType(String),

    #[error("unknown traffic condition {0:?}")]
    UnknownTrafficCondition(String),

    #[error("special-day flag must be 0 or 1, got {0}")]
    InvalidSpecialDay(u8),
}
