use std::time::Duration;

use crate::error::ProcessError;
use crate::types::activity::{ActivityMetrics, PaceSummary, Sample};

/// Mean Earth radius in meters, shared by every distance computation.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Pace is reported only when at least this much moving distance was covered.
pub const MIN_PACE_DISTANCE_M: f64 = 1.0;

pub const DEFAULT_PAUSE_THRESHOLD: Duration = Duration::from_secs(6);

/// Computes the activity summary for an ordered sample sequence.
///
/// Total distance and duration cover the whole sequence. Pace only covers
/// consecutive pairs whose gap is at most `pause_threshold`.
pub fn process(samples: &[Sample], pause_threshold: Duration) -> Result<ActivityMetrics, ProcessError> {
    if samples.len() < 2 {
        return Err(ProcessError::InsufficientData(samples.len()));
    }
    check_ordering(samples)?;

    let first = &samples[0];
    let last = &samples[samples.len() - 1];
    let threshold_ms = i64::try_from(pause_threshold.as_millis()).unwrap_or(i64::MAX);

    let mut distance_meters = 0.0;
    let mut moving_meters = 0.0;
    let mut moving_ms: i64 = 0;
    let mut paused_intervals = 0;

    for pair in samples.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let step = haversine_distance(prev.latitude, prev.longitude, curr.latitude, curr.longitude);
        distance_meters += step;

        let gap_ms = (curr.timestamp - prev.timestamp).num_milliseconds();
        if gap_ms > threshold_ms {
            paused_intervals += 1;
            continue;
        }
        moving_meters += step;
        moving_ms += gap_ms;
    }

    let moving_seconds = moving_ms as f64 / 1000.0;
    let minutes_per_km = if moving_meters >= MIN_PACE_DISTANCE_M && moving_ms > 0 {
        Some((moving_seconds / 60.0) / (moving_meters / 1000.0))
    } else {
        None
    };

    let (avg_heart_rate, max_heart_rate) = heart_rate_stats(samples);

    Ok(ActivityMetrics {
        start_time: first.timestamp,
        end_time: last.timestamp,
        duration_seconds: (last.timestamp - first.timestamp).num_milliseconds() as f64 / 1000.0,
        distance_meters,
        elevation_gain_meters: elevation_gain(samples),
        pace: PaceSummary {
            moving_seconds,
            moving_distance_meters: moving_meters,
            paused_intervals,
            minutes_per_km,
        },
        avg_heart_rate,
        max_heart_rate,
        sample_count: samples.len(),
    })
}

fn check_ordering(samples: &[Sample]) -> Result<(), ProcessError> {
    for (idx, pair) in samples.windows(2).enumerate() {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(ProcessError::DataIntegrity {
                index: idx + 1,
                previous: pair[0].timestamp,
                current: pair[1].timestamp,
            });
        }
    }
    Ok(())
}

/// Sum of climbs between consecutive samples that carry elevation. Samples
/// without elevation are stepped over.
fn elevation_gain(samples: &[Sample]) -> Option<f64> {
    let mut elevations = samples.iter().filter_map(|s| s.elevation);
    let mut prev = elevations.next()?;
    let mut gain = 0.0;
    for ele in elevations {
        if ele > prev {
            gain += ele - prev;
        }
        prev = ele;
    }
    Some(gain)
}

fn heart_rate_stats(samples: &[Sample]) -> (Option<u16>, Option<u16>) {
    let mut sum = 0u64;
    let mut count = 0u64;
    let mut max = None;
    for hr in samples.iter().filter_map(|s| s.heart_rate) {
        sum += hr as u64;
        count += 1;
        max = max.max(Some(hr));
    }
    if count == 0 {
        return (None, None);
    }
    (Some((sum / count) as u16), max)
}

/// Great-circle distance in meters.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` past 1 for near-antipodal points.
    let a = a.min(1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
