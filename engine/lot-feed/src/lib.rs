//! # Lot Feed
//!
//! Ingestion collaborator for the pricing engine: reads the raw parking
//! dataset CSV, combines the split date/time columns into one timestamp
//! (day-first), encodes the categorical vehicle-type and traffic
//! columns to their numeric weights, and hands the engine a
//! (lot_id, timestamp)-sorted record stream.

pub mod error;
pub mod records;

use std::fs::File;
use std::path::Path;

use tracing::info;

use pricing_engine::Observation;

pub use error::FeedError;
pub use records::{RawRecord, TrafficCondition, VehicleType};

/// Decode observations from any CSV source.
///
/// Rows are returned in file order; callers that feed the evolver
/// should sort them first (see [`sort_by_lot_and_time`]).
pub fn read_records<R: std::io::Read>(reader: R) -> Result<Vec<Observation>, FeedError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut observations = Vec::new();
    for row in csv_reader.deserialize::<RawRecord>() {
        observations.push(row?.into_observation()?);
    }
    Ok(observations)
}

/// Stable sort by (lot_id, timestamp), the order the evolver asserts.
pub fn sort_by_lot_and_time(records: &mut [Observation]) {
    records.sort_by(|a, b| {
        a.lot_id.cmp(&b.lot_id).then(a.timestamp.cmp(&b.timestamp))
    });
}

/// Load a dataset CSV from disk, sorted and ready for the evolver.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Observation>, FeedError> {
    let file = File::open(path.as_ref())?;
    let mut records = read_records(file)?;
    sort_by_lot_and_time(&mut records);
    info!(
        records = records.len(),
        path = %path.as_ref().display(),
        "loaded dataset"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use pricing_engine::{PriceEvolver, PricingConfig};

    // Rows deliberately out of order; ingestion must restore
    // (lot, time) order before the evolver sees them.
    const SAMPLE: &str = "\
SystemCodeNumber,Capacity,Occupancy,VehicleType,TrafficConditionNearby,QueueLength,IsSpecialDay,LastUpdatedDate,LastUpdatedTime
Shopping,100,80,car,low,0,0,04-10-2016,08:30:00
BHMBCCMKT01,100,50,car,low,0,0,04-10-2016,07:59:00
Shopping,100,20,car,low,0,0,04-10-2016,09:00:00
BHMBCCMKT01,100,80,bike,high,2,0,04-10-2016,08:30:00
Shopping,100,50,truck,medium,1,0,04-10-2016,07:59:00
";

    #[test]
    fn feeds_the_evolver_end_to_end() {
        let mut records = crate::read_records(SAMPLE.as_bytes()).unwrap();
        crate::sort_by_lot_and_time(&mut records);

        let mut evolver = PriceEvolver::new(PricingConfig::default()).unwrap();
        let priced = evolver.evolve(&records).unwrap();

        assert_eq!(priced.len(), 5);
        // Each lot's first observation prices at base.
        assert_eq!(priced[0].observation.lot_id, "BHMBCCMKT01");
        assert_eq!(priced[0].price, 10.0);
        assert_eq!(priced[2].observation.lot_id, "Shopping");
        assert_eq!(priced[2].price, 10.0);
        // Centered default: 80% full drifts up, 20% full drifts down.
        assert!(priced[1].price > 10.0);
        assert!(priced[4].price < priced[3].price);
    }
}
