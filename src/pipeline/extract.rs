use chrono::{DateTime, Utc};

use crate::error::ExtractError;
use crate::types::activity::Sample;
use crate::types::document::{GpxDocument, PointPosition, RawPoint};

#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Accepted(Vec<Sample>),
    /// A track's category did not match the filter. Not an error.
    Rejected { category: Option<String> },
}

/// Flattens every track and segment of `document` into one ordered sample
/// sequence. The whole document is rejected if any track is not of
/// `category_filter`; categories are checked before any point is read.
pub fn extract(document: &GpxDocument, category_filter: &str) -> Result<Extraction, ExtractError> {
    if let Some(track) = document
        .tracks
        .iter()
        .find(|track| track.category.as_deref() != Some(category_filter))
    {
        tracing::info!(
            "Skipping non-{} activity: {}",
            category_filter,
            track.category.as_deref().unwrap_or("unknown")
        );
        return Ok(Extraction::Rejected {
            category: track.category.clone(),
        });
    }

    let mut samples = Vec::new();
    for (track_idx, track) in document.tracks.iter().enumerate() {
        tracing::debug!(
            "Track {} ({}) has {} segments",
            track_idx,
            track.name.as_deref().unwrap_or("Unnamed"),
            track.segments.len()
        );

        for (segment_idx, segment) in track.segments.iter().enumerate() {
            samples.reserve(segment.points.len());
            for (point_idx, point) in segment.points.iter().enumerate() {
                let position = PointPosition {
                    track: track_idx,
                    segment: segment_idx,
                    point: point_idx,
                };
                samples.push(to_sample(point, position)?);
            }
        }
    }

    Ok(Extraction::Accepted(samples))
}

fn to_sample(point: &RawPoint, position: PointPosition) -> Result<Sample, ExtractError> {
    let malformed = |reason: String| ExtractError::MalformedTrack { position, reason };

    let latitude = required(point.lat.as_deref(), "latitude").map_err(malformed)?;
    let longitude = required(point.lon.as_deref(), "longitude").map_err(malformed)?;
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(malformed(format!("latitude {} out of range", latitude)));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(malformed(format!("longitude {} out of range", longitude)));
    }

    let time = point
        .time
        .as_deref()
        .ok_or_else(|| malformed("missing timestamp".to_string()))?;
    let timestamp = time
        .parse::<DateTime<Utc>>()
        .map_err(|e| malformed(format!("invalid timestamp {:?}: {}", time, e)))?;

    let extensions = point.extensions.as_ref();
    Ok(Sample {
        timestamp,
        latitude,
        longitude,
        elevation: optional_float(point.elevation.as_deref(), "elevation").map_err(malformed)?,
        heart_rate: optional_int(
            extensions.and_then(|ext| ext.heart_rate.as_deref()),
            "heart rate",
        )
        .map_err(malformed)?,
        cadence: optional_int(extensions.and_then(|ext| ext.cadence.as_deref()), "cadence")
            .map_err(malformed)?,
    })
}

fn required(value: Option<&str>, field: &str) -> Result<f64, String> {
    optional_float(value, field)?.ok_or_else(|| format!("missing {}", field))
}

fn optional_float(value: Option<&str>, field: &str) -> Result<Option<f64>, String> {
    let Some(text) = value else {
        return Ok(None);
    };
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(format!("invalid {} {:?}", field, text)),
    }
}

/// Integer extension values, accepting decimal text such as "85.0".
fn optional_int(value: Option<&str>, field: &str) -> Result<Option<u16>, String> {
    let Some(text) = value else {
        return Ok(None);
    };
    if let Ok(v) = text.parse::<u16>() {
        return Ok(Some(v));
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.round() <= u16::MAX as f64 => Ok(Some(v.round() as u16)),
        _ => Err(format!("invalid {} {:?}", field, text)),
    }
}
