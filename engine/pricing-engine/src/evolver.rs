//! # Price Evolver
//!
//! The stateful core: one pass over a (lot_id, timestamp)-sorted batch
//! of observations, carrying each lot's previous price in a per-lot
//! state map. Order is asserted per lot, never assumed from row
//! adjacency and never silently repaired.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::config::{ErrorPolicy, PricingConfig};
use crate::error::PriceError;
use crate::models::{LotState, Observation, PricedObservation};
use crate::scorer::{build_scorer, DemandScorer, PriceUpdate};

/// Deterministic per-lot price state machine.
///
/// Owns the lot_id → state mapping exclusively for the lifetime of a
/// pass; lots never interact. A fresh evolver starts with no state, so
/// every lot's first observation prices at `base_price`.
pub struct PriceEvolver {
    config: PricingConfig,
    states: HashMap<String, LotState>,
}

impl PriceEvolver {
    pub fn new(config: PricingConfig) -> Result<Self, PriceError> {
        config.validate()?;
        Ok(Self { config, states: HashMap::new() })
    }

    /// Evolve prices for one batch, one output per input, in input
    /// order.
    ///
    /// Under [`ErrorPolicy::Halt`] the first rejected record aborts
    /// the pass. Under [`ErrorPolicy::Skip`] rejected records are
    /// dropped with a warning, produce no output row, and leave lot
    /// state untouched.
    pub fn evolve(
        &mut self,
        records: &[Observation],
    ) -> Result<Vec<PricedObservation>, PriceError> {
        // Composite normalization statistics must exist before any
        // price is emitted; incremental strategies resolve instantly.
        let scorer = build_scorer(&self.config, records)?;

        let mut output = Vec::with_capacity(records.len());
        let mut skipped = 0usize;

        for obs in records {
            match self.price_one(scorer.as_ref(), obs) {
                Ok(priced) => output.push(priced),
                Err(e) => match self.config.error_policy {
                    ErrorPolicy::Halt => return Err(e),
                    ErrorPolicy::Skip => {
                        warn!("skipping record: {e}");
                        skipped += 1;
                    }
                },
            }
        }

        info!(
            records = records.len(),
            priced = output.len(),
            skipped,
            lots = self.states.len(),
            "price evolution pass complete"
        );
        Ok(output)
    }

    /// Price a single observation and commit the lot's new state.
    ///
    /// State is only touched after every check has passed, so a
    /// rejected record is invisible to the lot's recurrence.
    fn price_one(
        &mut self,
        scorer: &dyn DemandScorer,
        obs: &Observation,
    ) -> Result<PricedObservation, PriceError> {
        if obs.capacity == 0 {
            return Err(PriceError::InvalidCapacity {
                lot_id: obs.lot_id.clone(),
                timestamp: obs.timestamp,
            });
        }

        let price = match self.states.get(&obs.lot_id) {
            None => {
                // First sighting: explicit reset, regardless of strategy.
                self.config.base_price
            }
            Some(state) => {
                // Equal timestamps pass; only a step backwards is rejected.
                if obs.timestamp < state.last_seen {
                    return Err(PriceError::OutOfOrderInput {
                        lot_id: obs.lot_id.clone(),
                        previous: state.last_seen,
                        current: obs.timestamp,
                    });
                }
                let unclamped = match scorer.score(obs)? {
                    PriceUpdate::Delta(d) => state.last_price + d,
                    PriceUpdate::Absolute(p) => p,
                };
                unclamped.clamp(self.config.min_price, self.config.max_price)
            }
        };

        self.states.insert(
            obs.lot_id.clone(),
            LotState { last_price: price, last_seen: obs.timestamp },
        );

        Ok(PricedObservation { observation: obs.clone(), price })
    }

    /// Latest committed price for a lot, if it has been seen
    pub fn last_price(&self, lot_id: &str) -> Option<f64> {
        self.states.get(lot_id).map(|s| s.last_price)
    }

    /// Number of distinct lots seen so far
    pub fn lot_count(&self) -> usize {
        self.states.len()
    }
}
