use std::time::Duration;

use chrono::{DateTime, Utc};
use gpx_ingest::error::ProcessError;
use gpx_ingest::pipeline::process::{haversine_distance, process, DEFAULT_PAUSE_THRESHOLD};
use gpx_ingest::types::activity::Sample;

const START: i64 = 1_709_276_400; // 2024-03-01T07:00:00Z

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(START + secs, 0).expect("timestamp")
}

fn sample(secs: i64, lat: f64, lon: f64) -> Sample {
    Sample::new(at(secs), lat, lon)
}

fn with_elevation(mut s: Sample, elevation: f64) -> Sample {
    s.elevation = Some(elevation);
    s
}

fn pace_of(samples: &[Sample]) -> Option<f64> {
    process(samples, DEFAULT_PAUSE_THRESHOLD)
        .expect("metrics")
        .pace
        .minutes_per_km
}

#[test]
fn duration_is_last_minus_first() {
    let sparse = vec![sample(0, 40.0, -75.0), sample(3600, 40.01, -75.0)];
    let dense: Vec<Sample> = (0..=3600)
        .step_by(5)
        .map(|t| sample(t, 40.0 + t as f64 * 1e-6, -75.0))
        .collect();

    assert_eq!(process(&sparse, DEFAULT_PAUSE_THRESHOLD).expect("metrics").duration_seconds, 3600.0);
    assert_eq!(process(&dense, DEFAULT_PAUSE_THRESHOLD).expect("metrics").duration_seconds, 3600.0);
}

#[test]
fn duration_keeps_milliseconds() {
    let mut later = sample(1, 40.0, -75.0);
    later.timestamp = later.timestamp + chrono::Duration::milliseconds(500);
    let samples = vec![sample(0, 40.0, -75.0), later];

    let metrics = process(&samples, DEFAULT_PAUSE_THRESHOLD).expect("metrics");
    assert_eq!(metrics.duration_seconds, 1.5);
}

#[test]
fn fewer_than_two_samples_is_insufficient() {
    assert!(matches!(
        process(&[], DEFAULT_PAUSE_THRESHOLD),
        Err(ProcessError::InsufficientData(0))
    ));
    assert!(matches!(
        process(&[sample(0, 40.0, -75.0)], DEFAULT_PAUSE_THRESHOLD),
        Err(ProcessError::InsufficientData(1))
    ));
}

#[test]
fn single_inverted_pair_is_a_data_integrity_error() {
    let samples = vec![
        sample(0, 40.0, -75.0),
        sample(10, 40.0001, -75.0),
        sample(5, 40.0002, -75.0),
        sample(20, 40.0003, -75.0),
    ];

    match process(&samples, DEFAULT_PAUSE_THRESHOLD) {
        Err(ProcessError::DataIntegrity { index, previous, current }) => {
            assert_eq!(index, 2);
            assert_eq!(previous, at(10));
            assert_eq!(current, at(5));
        }
        other => panic!("expected integrity error, got {:?}", other),
    }
}

#[test]
fn equal_timestamps_are_allowed() {
    let samples = vec![sample(0, 40.0, -75.0), sample(0, 40.0, -75.0), sample(1, 40.0, -75.0)];
    assert!(process(&samples, DEFAULT_PAUSE_THRESHOLD).is_ok());
}

#[test]
fn distance_sums_haversine_steps() {
    let samples = vec![
        sample(0, 40.0, -75.0),
        sample(60, 40.001, -75.0),
        sample(120, 40.002, -75.0),
    ];

    let metrics = process(&samples, DEFAULT_PAUSE_THRESHOLD).expect("metrics");
    let expected = haversine_distance(40.0, -75.0, 40.001, -75.0)
        + haversine_distance(40.001, -75.0, 40.002, -75.0);
    assert!((metrics.distance_meters - expected).abs() < 1e-9);
    assert!((metrics.distance_meters - 222.4).abs() < 0.5, "{}", metrics.distance_meters);
}

#[test]
fn elevation_gain_ignores_descents() {
    let samples = vec![
        with_elevation(sample(0, 40.0, -75.0), 100.0),
        with_elevation(sample(1, 40.0, -75.0), 110.0),
        with_elevation(sample(2, 40.0, -75.0), 90.0),
        with_elevation(sample(3, 40.0, -75.0), 95.0),
    ];

    let metrics = process(&samples, DEFAULT_PAUSE_THRESHOLD).expect("metrics");
    assert_eq!(metrics.elevation_gain_meters, Some(15.0));
}

#[test]
fn elevation_gain_unchanged_by_inserted_unset_samples() {
    let base = vec![
        with_elevation(sample(0, 40.0, -75.0), 100.0),
        with_elevation(sample(4, 40.0, -75.0), 104.0),
        with_elevation(sample(8, 40.0, -75.0), 101.0),
        with_elevation(sample(12, 40.0, -75.0), 107.5),
    ];
    let mut padded = Vec::new();
    for (idx, s) in base.iter().enumerate() {
        padded.push(s.clone());
        if idx + 1 < base.len() {
            padded.push(sample(s.timestamp.timestamp() - START + 1, 40.0, -75.0));
            padded.push(sample(s.timestamp.timestamp() - START + 2, 40.0, -75.0));
        }
    }

    let expected = process(&base, DEFAULT_PAUSE_THRESHOLD).expect("metrics").elevation_gain_meters;
    let actual = process(&padded, DEFAULT_PAUSE_THRESHOLD).expect("metrics").elevation_gain_meters;
    assert_eq!(expected, Some(10.5));
    assert_eq!(actual, expected);
}

#[test]
fn elevation_gain_is_unset_without_any_elevation() {
    let samples = vec![sample(0, 40.0, -75.0), sample(1, 40.0, -75.0)];
    assert_eq!(process(&samples, DEFAULT_PAUSE_THRESHOLD).expect("metrics").elevation_gain_meters, None);
}

#[test]
fn pace_excludes_pauses_longer_than_threshold() {
    let step = 0.00003;
    // Stop at the fifth point for ten minutes, then carry on.
    let with_gap = vec![
        sample(0, 40.0, -75.0),
        sample(1, 40.0 + step, -75.0),
        sample(2, 40.0 + 2.0 * step, -75.0),
        sample(3, 40.0 + 3.0 * step, -75.0),
        sample(4, 40.0 + 4.0 * step, -75.0),
        sample(604, 40.0 + 4.0 * step, -75.0),
        sample(605, 40.0 + 5.0 * step, -75.0),
        sample(606, 40.0 + 6.0 * step, -75.0),
        sample(607, 40.0 + 7.0 * step, -75.0),
        sample(608, 40.0 + 8.0 * step, -75.0),
    ];
    let without_gap: Vec<Sample> = (0..=8)
        .map(|i| sample(i, 40.0 + i as f64 * step, -75.0))
        .collect();

    let paused = process(&with_gap, DEFAULT_PAUSE_THRESHOLD).expect("metrics");
    let continuous = process(&without_gap, DEFAULT_PAUSE_THRESHOLD).expect("metrics");

    assert_eq!(paused.pace.paused_intervals, 1);
    assert_eq!(continuous.pace.paused_intervals, 0);
    assert_eq!(paused.pace.moving_seconds, continuous.pace.moving_seconds);
    let (a, b) = (
        paused.pace.minutes_per_km.expect("pace"),
        continuous.pace.minutes_per_km.expect("pace"),
    );
    assert!((a - b).abs() < 1e-9, "{a} vs {b}");
    assert_eq!(paused.duration_seconds, 608.0);
}

#[test]
fn paused_pair_still_counts_towards_total_distance() {
    let samples = vec![
        sample(0, 40.0, -75.0),
        sample(5, 40.0001, -75.0),
        sample(600, 40.0101, -75.0),
        sample(605, 40.0102, -75.0),
    ];

    let metrics = process(&samples, DEFAULT_PAUSE_THRESHOLD).expect("metrics");
    assert!(metrics.distance_meters > 1100.0);
    assert!(metrics.pace.moving_distance_meters < 25.0);
    assert_eq!(metrics.pace.moving_seconds, 10.0);
}

#[test]
fn pace_at_threshold_is_not_a_pause() {
    let samples = vec![sample(0, 40.0, -75.0), sample(6, 40.0001, -75.0)];
    let metrics = process(&samples, Duration::from_secs(6)).expect("metrics");
    assert_eq!(metrics.pace.paused_intervals, 0);
    assert!(metrics.pace.minutes_per_km.is_some());
}

#[test]
fn pace_is_minutes_per_kilometer() {
    // 1 km north in 5 minutes, sampled every 3 seconds.
    let meters_per_degree = haversine_distance(0.0, 0.0, 1.0, 0.0);
    let per_step = 1000.0 / meters_per_degree / 100.0;
    let samples: Vec<Sample> = (0..=100)
        .map(|i| sample(i * 3, i as f64 * per_step, 0.0))
        .collect();

    let pace = pace_of(&samples).expect("pace");
    assert!((pace - 5.0).abs() < 1e-6, "{pace}");
}

#[test]
fn standing_still_reports_no_pace() {
    let samples: Vec<Sample> = (0..5)
        .map(|i| sample(i, 40.0 + i as f64 * 0.000001, -75.0))
        .collect();

    let metrics = process(&samples, DEFAULT_PAUSE_THRESHOLD).expect("metrics");
    assert!(metrics.pace.moving_distance_meters > 0.0);
    assert_eq!(metrics.pace.minutes_per_km, None);
}

#[test]
fn all_pairs_paused_reports_no_pace() {
    let samples = vec![
        sample(0, 40.0, -75.0),
        sample(60, 40.001, -75.0),
        sample(120, 40.002, -75.0),
    ];

    let metrics = process(&samples, DEFAULT_PAUSE_THRESHOLD).expect("metrics");
    assert_eq!(metrics.pace.paused_intervals, 2);
    assert_eq!(metrics.pace.minutes_per_km, None);
}

#[test]
fn heart_rate_average_and_max_skip_unset_samples() {
    let mut a = sample(0, 40.0, -75.0);
    a.heart_rate = Some(140);
    let b = sample(1, 40.0, -75.0);
    let mut c = sample(2, 40.0, -75.0);
    c.heart_rate = Some(161);

    let metrics = process(&[a, b, c], DEFAULT_PAUSE_THRESHOLD).expect("metrics");
    assert_eq!(metrics.avg_heart_rate, Some(150));
    assert_eq!(metrics.max_heart_rate, Some(161));
}
