//! Row types written to storage.
//!
//! This is the only place where unset optional values become zeros and where
//! metric results are converted to the imperial columns.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::types::activity::{Activity, Sample};

const MILES_PER_METER: f64 = 0.000_621_371;
const KM_PER_MILE: f64 = 1.609_344;

/// ClickHouse `DateTime64(3)` text format.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

fn serialize_datetime<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.format(DATETIME_FORMAT))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRow {
    pub activity_id: Uuid,
    pub user_id: Uuid,
    #[serde(serialize_with = "serialize_datetime")]
    pub start_time: DateTime<Utc>,
    #[serde(serialize_with = "serialize_datetime")]
    pub end_time: DateTime<Utc>,
    pub activity_type: String,
    pub distance_meters: f64,
    pub distance_miles: f64,
    pub duration_seconds: f64,
    pub avg_pace_minutes_per_km: Option<f64>,
    pub avg_pace_seconds_per_km: Option<f64>,
    pub avg_pace_minutes_per_mile: Option<f64>,
    pub total_elevation_gain_meters: f64,
    pub avg_heart_rate: u16,
    pub max_heart_rate: u16,
}

impl From<&Activity> for ActivityRow {
    fn from(activity: &Activity) -> Self {
        let pace = activity.avg_pace_minutes_per_km;
        Self {
            activity_id: activity.id,
            user_id: activity.user_id,
            start_time: activity.start_time,
            end_time: activity.end_time,
            activity_type: activity.activity_type.clone(),
            distance_meters: activity.distance_meters,
            distance_miles: activity.distance_meters * MILES_PER_METER,
            duration_seconds: activity.duration_seconds,
            avg_pace_minutes_per_km: pace,
            avg_pace_seconds_per_km: pace.map(|p| p * 60.0),
            avg_pace_minutes_per_mile: pace.map(|p| p * KM_PER_MILE),
            total_elevation_gain_meters: activity.total_elevation_gain_meters.unwrap_or(0.0),
            avg_heart_rate: activity.avg_heart_rate.unwrap_or(0),
            max_heart_rate: activity.max_heart_rate.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRow {
    pub activity_id: Uuid,
    #[serde(serialize_with = "serialize_datetime")]
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_meters: f64,
    pub heart_rate: u16,
    pub cadence: u16,
}

impl SampleRow {
    pub fn new(activity_id: Uuid, sample: &Sample) -> Self {
        Self {
            activity_id,
            timestamp: sample.timestamp,
            latitude: sample.latitude,
            longitude: sample.longitude,
            elevation_meters: sample.elevation.unwrap_or(0.0),
            heart_rate: sample.heart_rate.unwrap_or(0),
            cadence: sample.cadence.unwrap_or(0),
        }
    }
}
