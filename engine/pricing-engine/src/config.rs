use serde::{Deserialize, Serialize};

use crate::error::PriceError;
use crate::{DEFAULT_BASE_PRICE, DEFAULT_MAX_PRICE, DEFAULT_MIN_PRICE};

/// Configuration for the pricing engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Price assigned to a lot's first observation
    pub base_price: f64,

    /// Band floor; no emitted price ever goes below this
    pub min_price: f64,

    /// Band ceiling; no emitted price ever goes above this
    pub max_price: f64,

    /// Active demand-scoring strategy
    pub strategy: Strategy,

    /// What to do when a record is rejected
    pub error_policy: ErrorPolicy,

    /// Parameters for the incremental strategies
    pub incremental: IncrementalParams,

    /// Parameters for the composite strategy
    pub composite: CompositeParams,
}

/// Which demand-scoring strategy drives the price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// delta = alpha * occupancy_ratio (drifts upward at any occupancy)
    Incremental,
    /// delta = alpha * (occupancy_ratio - 0.5), centered on half utilization
    CenteredIncremental,
    /// Batch-normalized weighted demand score, stateless per record
    Composite,
}

/// How the evolver reacts to a rejected record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Abort the pass with the first error (default)
    Halt,
    /// Drop the record, log a warning, leave lot state untouched
    Skip,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IncrementalParams {
    /// Sensitivity of the price delta to the occupancy ratio
    pub alpha: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompositeParams {
    /// Weight on the occupancy ratio
    pub alpha: f64,

    /// Weight on queue length
    pub beta: f64,

    /// Weight on traffic level (subtracted: congestion suppresses demand)
    pub gamma: f64,

    /// Weight on the special-day flag
    pub delta_w: f64,

    /// Weight on the encoded vehicle type
    pub epsilon: f64,

    /// How aggressively price reacts to normalized demand
    pub lambda: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_price: DEFAULT_BASE_PRICE,
            min_price: DEFAULT_MIN_PRICE,
            max_price: DEFAULT_MAX_PRICE,
            strategy: Strategy::CenteredIncremental,
            error_policy: ErrorPolicy::Halt,
            incremental: IncrementalParams { alpha: 2.0 },
            composite: CompositeParams {
                alpha: 1.5,
                beta: 0.8,
                gamma: 1.2,
                delta_w: 2.0,
                epsilon: 1.0,
                lambda: 0.7,
            },
        }
    }
}

impl PricingConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(base) = std::env::var("PRICING_BASE_PRICE") {
            config.base_price = base.parse()?;
        }
        if let Ok(min) = std::env::var("PRICING_MIN_PRICE") {
            config.min_price = min.parse()?;
        }
        if let Ok(max) = std::env::var("PRICING_MAX_PRICE") {
            config.max_price = max.parse()?;
        }
        if let Ok(alpha) = std::env::var("PRICING_INCREMENTAL_ALPHA") {
            config.incremental.alpha = alpha.parse()?;
        }
        if let Ok(lambda) = std::env::var("PRICING_COMPOSITE_LAMBDA") {
            config.composite.lambda = lambda.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the evolver cannot honor
    pub fn validate(&self) -> Result<(), PriceError> {
        if !(self.min_price.is_finite() && self.max_price.is_finite() && self.base_price.is_finite())
        {
            return Err(PriceError::InvalidConfig("prices must be finite".into()));
        }
        if self.min_price > self.max_price {
            return Err(PriceError::InvalidConfig(format!(
                "min_price {} exceeds max_price {}",
                self.min_price, self.max_price
            )));
        }
        if self.base_price < self.min_price || self.base_price > self.max_price {
            return Err(PriceError::InvalidConfig(format!(
                "base_price {} outside band [{}, {}]",
                self.base_price, self.min_price, self.max_price
            )));
        }
        let weights = [
            self.incremental.alpha,
            self.composite.alpha,
            self.composite.beta,
            self.composite.gamma,
            self.composite.delta_w,
            self.composite.epsilon,
            self.composite.lambda,
        ];
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(PriceError::InvalidConfig("weights must be finite".into()));
        }
        Ok(())
    }

    /// Centering offset for the active incremental variant
    pub fn centering_offset(&self) -> f64 {
        match self.strategy {
            Strategy::CenteredIncremental => 0.5,
            _ => 0.0,
        }
    }
}
