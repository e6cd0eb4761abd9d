//! Demand-scoring strategies
//!
//! Two interchangeable strategies turn one observation into a price
//! update. The incremental family nudges the lot's previous price by a
//! delta; the composite strategy replaces it outright with a demand-
//! scaled price. The evolver never branches on which one is active.

use tracing::{debug, warn};

use crate::config::{CompositeParams, ErrorPolicy, PricingConfig, Strategy};
use crate::error::PriceError;
use crate::models::Observation;

/// How a scorer wants the lot's price changed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceUpdate {
    /// Add to the lot's previous price
    Delta(f64),
    /// Replace the lot's previous price
    Absolute(f64),
}

/// One observation in, one price update out. Stateless per record;
/// the composite implementation carries pre-computed batch statistics
/// that are immutable for the duration of a pass.
pub trait DemandScorer {
    fn score(&self, obs: &Observation) -> Result<PriceUpdate, PriceError>;
}

/// delta = alpha * (occupancy_ratio - centering_offset)
///
/// With a zero offset any occupancy pushes the price up; centering on
/// 0.5 makes half-full lots hold steady, fuller lots drift up and
/// emptier lots drift down.
#[derive(Debug, Clone, Copy)]
pub struct IncrementalScorer {
    pub alpha: f64,
    pub centering_offset: f64,
}

impl DemandScorer for IncrementalScorer {
    fn score(&self, obs: &Observation) -> Result<PriceUpdate, PriceError> {
        let ratio = obs.occupancy_ratio()?;
        let delta = self.alpha * (ratio - self.centering_offset);
        debug!(
            lot_id = %obs.lot_id,
            ratio,
            delta,
            "scored incremental delta"
        );
        Ok(PriceUpdate::Delta(delta))
    }
}

/// Min/max of the raw demand score over one whole batch.
///
/// Must be fully computed before any composite price is emitted, then
/// treated as read-only for the rest of the pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemandStats {
    pub min: f64,
    pub max: f64,
}

impl DemandStats {
    /// Reduce a batch to its raw-demand extremes.
    ///
    /// Returns `None` for an empty batch (no composite price can be
    /// emitted from one anyway).
    pub fn from_records(
        records: &[Observation],
        params: &CompositeParams,
    ) -> Result<Option<Self>, PriceError> {
        let mut stats: Option<Self> = None;
        for obs in records {
            let raw = raw_demand(obs, params)?;
            stats = Some(match stats {
                None => Self { min: raw, max: raw },
                Some(s) => Self { min: s.min.min(raw), max: s.max.max(raw) },
            });
        }
        Ok(stats)
    }

    /// Like [`DemandStats::from_records`], but drops records whose
    /// score cannot be computed instead of failing the reduction.
    pub fn from_records_lossy(records: &[Observation], params: &CompositeParams) -> Option<Self> {
        let mut stats: Option<Self> = None;
        for obs in records {
            let raw = match raw_demand(obs, params) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("skipping record in demand reduction: {e}");
                    continue;
                }
            };
            stats = Some(match stats {
                None => Self { min: raw, max: raw },
                Some(s) => Self { min: s.min.min(raw), max: s.max.max(raw) },
            });
        }
        stats
    }

    /// Min-max normalize one raw score into [0, 1].
    ///
    /// A constant batch (min == max) normalizes to 0 for every record.
    pub fn normalize(&self, raw: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            return 0.0;
        }
        (raw - self.min) / span
    }
}

/// Weighted linear demand score for one observation.
pub(crate) fn raw_demand(obs: &Observation, p: &CompositeParams) -> Result<f64, PriceError> {
    let ratio = obs.occupancy_ratio()?;
    let special = if obs.is_special_day { 1.0 } else { 0.0 };
    let raw = p.alpha * ratio + p.beta * obs.queue_length as f64 - p.gamma * obs.traffic_level
        + p.delta_w * special
        + p.epsilon * obs.vehicle_weight;
    if !raw.is_finite() {
        return Err(PriceError::NonFiniteDemand {
            lot_id: obs.lot_id.clone(),
            timestamp: obs.timestamp,
        });
    }
    Ok(raw)
}

/// price = base_price * (1 + lambda * normalized_demand)
///
/// Stateless per record apart from the shared batch statistics; the
/// previous price plays no part.
#[derive(Debug, Clone, Copy)]
pub struct CompositeScorer {
    pub params: CompositeParams,
    pub base_price: f64,
    pub stats: DemandStats,
}

impl DemandScorer for CompositeScorer {
    fn score(&self, obs: &Observation) -> Result<PriceUpdate, PriceError> {
        let raw = raw_demand(obs, &self.params)?;
        let normalized = self.stats.normalize(raw);
        let price = self.base_price * (1.0 + self.params.lambda * normalized);
        debug!(
            lot_id = %obs.lot_id,
            raw,
            normalized,
            price,
            "scored composite price"
        );
        Ok(PriceUpdate::Absolute(price))
    }
}

/// Resolve the configured strategy into a scorer.
///
/// The composite strategy needs its batch reduction done here, before
/// the evolver's main loop starts.
pub(crate) fn build_scorer(
    config: &PricingConfig,
    records: &[Observation],
) -> Result<Box<dyn DemandScorer>, PriceError> {
    match config.strategy {
        Strategy::Incremental | Strategy::CenteredIncremental => {
            Ok(Box::new(IncrementalScorer {
                alpha: config.incremental.alpha,
                centering_offset: config.centering_offset(),
            }))
        }
        Strategy::Composite => {
            let stats = match config.error_policy {
                ErrorPolicy::Halt => DemandStats::from_records(records, &config.composite)?,
                ErrorPolicy::Skip => DemandStats::from_records_lossy(records, &config.composite),
            }
            .unwrap_or(DemandStats { min: 0.0, max: 0.0 });
            Ok(Box::new(CompositeScorer {
                params: config.composite,
                base_price: config.base_price,
                stats,
            }))
        }
    }
}
