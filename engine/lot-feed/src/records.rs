use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Deserialize;

use pricing_engine::Observation;

use crate::error::FeedError;

/// Vehicle categories observed at the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleType {
    Car,
    Bike,
    Truck,
}

impl VehicleType {
    /// Demand weight of the vehicle category
    pub fn weight(&self) -> f64 {
        match self {
            VehicleType::Car => 1.0,
            VehicleType::Bike => 0.5,
            VehicleType::Truck => 1.5,
        }
    }
}

impl FromStr for VehicleType {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" => Ok(VehicleType::Car),
            "bike" => Ok(VehicleType::Bike),
            "truck" => Ok(VehicleType::Truck),
            _ => Err(FeedError::UnknownVehicleType(s.to_string())),
        }
    }
}

/// Congestion levels reported near the lot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficCondition {
    Low,
    Medium,
    High,
}

impl TrafficCondition {
    /// Numeric congestion level
    pub fn level(&self) -> f64 {
        match self {
            TrafficCondition::Low => 1.0,
            TrafficCondition::Medium => 2.0,
            TrafficCondition::High => 3.0,
        }
    }
}

impl FromStr for TrafficCondition {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(TrafficCondition::Low),
            "medium" => Ok(TrafficCondition::Medium),
            "high" => Ok(TrafficCondition::High),
            _ => Err(FeedError::UnknownTrafficCondition(s.to_string())),
        }
    }
}

/// One row of the dataset CSV, column names as shipped.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "SystemCodeNumber")]
    pub lot_id: String,

    #[serde(rename = "Capacity")]
    pub capacity: u32,

    #[serde(rename = "Occupancy")]
    pub occupancy: u32,

    #[serde(rename = "QueueLength")]
    pub queue_length: u32,

    #[serde(rename = "VehicleType")]
    pub vehicle_type: String,

    #[serde(rename = "TrafficConditionNearby")]
    pub traffic_condition: String,

    #[serde(rename = "IsSpecialDay")]
    pub is_special_day: u8,

    #[serde(rename = "LastUpdatedDate")]
    pub last_updated_date: String,

    #[serde(rename = "LastUpdatedTime")]
    pub last_updated_time: String,
}

impl RawRecord {
    /// Encode the row into an engine observation.
    pub fn into_observation(self) -> Result<Observation, FeedError> {
        let timestamp = combine_timestamp(&self.last_updated_date, &self.last_updated_time)?;
        let vehicle_weight = self.vehicle_type.parse::<VehicleType>()?.weight();
        let traffic_level = self.traffic_condition.parse::<TrafficCondition>()?.level();
        let is_special_day = match self.is_special_day {
            0 => false,
            1 => true,
            other => return Err(FeedError::InvalidSpecialDay(other)),
        };
        Ok(Observation {
            lot_id: self.lot_id,
            timestamp,
            occupancy: self.occupancy,
            capacity: self.capacity,
            queue_length: self.queue_length,
            vehicle_weight,
            traffic_level,
            is_special_day,
        })
    }
}

/// Combine the split date and time columns, day-first.
///
/// The dataset writes dates as `04-10-2016` (4 October); some exports
/// use `/` separators and drop the seconds, both are accepted.
pub fn combine_timestamp(date: &str, time: &str) -> Result<NaiveDateTime, FeedError> {
    let combined = format!("{} {}", date.trim(), time.trim());
    for format in [
        "%d-%m-%Y %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%d-%m-%Y %H:%M",
        "%d/%m/%Y %H:%M",
    ] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(&combined, format) {
            return Ok(ts);
        }
    }
    Err(FeedError::InvalidTimestamp { date: date.to_string(), time: time.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const SAMPLE: &str = "\
SystemCodeNumber,Capacity,Occupancy,VehicleType,TrafficConditionNearby,QueueLength,IsSpecialDay,LastUpdatedDate,LastUpdatedTime
BHMBCCMKT01,577,61,car,low,1,0,04-10-2016,07:59:00
BHMBCCMKT01,577,64,bike,high,2,1,04-10-2016,08:25:00
Shopping,1200,264,truck,medium,3,0,04-10-2016,07:59:00
";

    #[test]
    fn parses_sample_rows() {
        let records = crate::read_records(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);

        let first = &records[0];
        assert_eq!(first.lot_id, "BHMBCCMKT01");
        assert_eq!(first.capacity, 577);
        assert_eq!(first.occupancy, 61);
        assert_eq!(first.queue_length, 1);
        assert_eq!(first.vehicle_weight, 1.0);
        assert_eq!(first.traffic_level, 1.0);
        assert!(!first.is_special_day);

        assert_eq!(records[1].vehicle_weight, 0.5);
        assert_eq!(records[1].traffic_level, 3.0);
        assert!(records[1].is_special_day);
        assert_eq!(records[2].vehicle_weight, 1.5);
        assert_eq!(records[2].traffic_level, 2.0);
    }

    #[test]
    fn dates_parse_day_first() {
        let ts = combine_timestamp("04-10-2016", "07:59:00").unwrap();
        assert_eq!((ts.day(), ts.month(), ts.year()), (4, 10, 2016));
        assert_eq!((ts.hour(), ts.minute()), (7, 59));

        // Slash separator and missing seconds are tolerated.
        let ts = combine_timestamp("25/12/2016", "16:30").unwrap();
        assert_eq!((ts.day(), ts.month()), (25, 12));
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        assert!(matches!(
            combine_timestamp("2016-10-04", "late"),
            Err(FeedError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn unknown_categories_are_rejected() {
        assert!(matches!(
            "hovercraft".parse::<VehicleType>(),
            Err(FeedError::UnknownVehicleType(_))
        ));
        assert!(matches!(
            "gridlock".parse::<TrafficCondition>(),
            Err(FeedError::UnknownTrafficCondition(_))
        ));
        // Known codes are matched case-insensitively.
        assert_eq!("Car".parse::<VehicleType>().unwrap(), VehicleType::Car);
        assert_eq!("HIGH".parse::<TrafficCondition>().unwrap(), TrafficCondition::High);
    }

    #[test]
    fn sorts_by_lot_then_time() {
        let mut records = crate::read_records(SAMPLE.as_bytes()).unwrap();
        records.reverse();
        crate::sort_by_lot_and_time(&mut records);
        assert_eq!(records[0].lot_id, "BHMBCCMKT01");
        assert_eq!(records[0].occupancy, 61);
        assert_eq!(records[1].occupancy, 64);
        assert_eq!(records[2].lot_id, "Shopping");
    }
}
