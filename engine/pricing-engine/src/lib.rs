//! # Pricing Engine
//!
//! Deterministic per-lot parking price engine. Consumes a time-ordered
//! stream of sensor observations (occupancy, queueing, traffic, vehicle
//! mix, special-day flags) and produces one bounded price per
//! observation, per lot, by carrying the previous price of each lot
//! forward through a configurable demand-scoring strategy.

pub mod config;
pub mod error;
pub mod evolver;
pub mod models;
pub mod scorer;


pub use config::{CompositeParams, ErrorPolicy, IncrementalParams, PricingConfig, Strategy};
pub use error::PriceError;
pub use evolver::PriceEvolver;
pub use models::{LotState, Observation, PricedObservation};
pub use scorer::{CompositeScorer, DemandScorer, DemandStats, IncrementalScorer, PriceUpdate};

/// Current version of the pricing engine
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default base price a lot resets to on first sighting
pub const DEFAULT_BASE_PRICE: f64 = 10.0;

/// Default price band floor
pub const DEFAULT_MIN_PRICE: f64 = 5.0;

/// Default price band ceiling
pub const DEFAULT_MAX_PRICE: f64 = 20.0;
