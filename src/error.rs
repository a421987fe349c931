use chrono::{DateTime, Utc};

use crate::types::document::PointPosition;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid GPX: {0}")]
    InvalidGpx(String),
    #[error("Invalid GPX: missing required track segments")]
    MissingTrackSegments,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Malformed track at {position}: {reason}")]
    MalformedTrack {
        position: PointPosition,
        reason: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Insufficient data points (need at least 2, got {0})")]
    InsufficientData(usize),
    #[error("Timestamps go backwards at sample {index}: {current} is before {previous}")]
    DataIntegrity {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage request failed: {0}")]
    Request(String),
    #[error("Storage rejected write ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("Failed to encode rows: {0}")]
    Encode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
