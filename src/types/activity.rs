use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single timestamped position reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub heart_rate: Option<u16>,
    pub cadence: Option<u16>,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, latitude: f64, longitude: f64) -> Self {
        Self {
            timestamp,
            latitude,
            longitude,
            elevation: None,
            heart_rate: None,
            cadence: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceSummary {
    /// Seconds spent in pairs at or under the pause threshold.
    pub moving_seconds: f64,
    pub moving_distance_meters: f64,
    pub paused_intervals: usize,
    pub minutes_per_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityMetrics {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: f64,
    pub distance_meters: f64,
    pub elevation_gain_meters: Option<f64>,
    pub pace: PaceSummary,
    pub avg_heart_rate: Option<u16>,
    pub max_heart_rate: Option<u16>,
    pub sample_count: usize,
}

/// Summary of one ingested file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub activity_type: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub avg_pace_minutes_per_km: Option<f64>,
    pub total_elevation_gain_meters: Option<f64>,
    pub avg_heart_rate: Option<u16>,
    pub max_heart_rate: Option<u16>,
    pub sample_count: usize,
}

impl Activity {
    pub fn from_metrics(user_id: Uuid, activity_type: &str, metrics: &ActivityMetrics) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            start_time: metrics.start_time,
            end_time: metrics.end_time,
            activity_type: activity_type.to_string(),
            distance_meters: metrics.distance_meters,
            duration_seconds: metrics.duration_seconds,
            avg_pace_minutes_per_km: metrics.pace.minutes_per_km,
            total_elevation_gain_meters: metrics.elevation_gain_meters,
            avg_heart_rate: metrics.avg_heart_rate,
            max_heart_rate: metrics.max_heart_rate,
            sample_count: metrics.sample_count,
        }
    }
}
