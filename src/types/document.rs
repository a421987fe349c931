//! Generic shape of a parsed GPX document.
//!
//! Leaf values are kept as the raw text found in the file; interpreting them
//! is the extractor's job.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpxDocument {
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub name: Option<String>,
    /// Value of the track's `<type>` element, e.g. "running".
    pub category: Option<String>,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    pub points: Vec<RawPoint>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPoint {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub time: Option<String>,
    pub elevation: Option<String>,
    pub extensions: Option<PointExtensions>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointExtensions {
    pub heart_rate: Option<String>,
    pub cadence: Option<String>,
}

/// Location of a point inside a document, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointPosition {
    pub track: usize,
    pub segment: usize,
    pub point: usize,
}

impl fmt::Display for PointPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "track {} segment {} point {}",
            self.track, self.segment, self.point
        )
    }
}
