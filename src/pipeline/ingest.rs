//! Per-file ingestion: parse, extract, summarize, write.
//!
//! Files are handled one after another. Any failure stays with its file and
//! is recorded in the [`IngestReport`]; the run always continues.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::IngestOptions;
use crate::error::IngestError;
use crate::pipeline::extract::{self, Extraction};
use crate::pipeline::{batch, parse, process};
use crate::storage::ActivityStore;
use crate::types::activity::Activity;
use crate::types::document::GpxDocument;

#[derive(Debug)]
pub enum FileStatus {
    Ingested {
        activity_id: Uuid,
        samples: usize,
        chunks: usize,
    },
    Skipped {
        category: Option<String>,
    },
    Failed(IngestError),
}

#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub outcomes: Vec<FileOutcome>,
}

impl IngestReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn ingested(&self) -> usize {
        self.count(|status| matches!(status, FileStatus::Ingested { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, FileStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, FileStatus::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Ingests every file in order. Never aborts on a per-file error.
pub async fn run<S: ActivityStore>(
    store: &S,
    files: &[PathBuf],
    user_id: Uuid,
    options: &IngestOptions,
) -> IngestReport {
    tracing::info!("Starting GPX processing of {} files", files.len());

    let mut report = IngestReport::default();
    for path in files {
        let status = match ingest_file(store, path, user_id, options).await {
            Ok(status) => {
                tracing::info!("File processed successfully: {}", path.display());
                status
            }
            Err(err) => {
                tracing::error!("File processing failed: {}: {}", path.display(), err);
                FileStatus::Failed(err)
            }
        };
        report.outcomes.push(FileOutcome {
            path: path.clone(),
            status,
        });
    }

    tracing::info!(
        "Processing complete: {} attempted, {} ingested, {} skipped, {} failed",
        report.attempted(),
        report.ingested(),
        report.skipped(),
        report.failed()
    );
    report
}

pub async fn ingest_file<S: ActivityStore>(
    store: &S,
    path: &Path,
    user_id: Uuid,
    options: &IngestOptions,
) -> Result<FileStatus, IngestError> {
    tracing::info!("Processing GPX file: {}", path.display());
    let bytes = tokio::fs::read(path).await?;
    let document = parse::parse(&bytes)?;
    ingest_document(store, &document, user_id, options).await
}

pub async fn ingest_document<S: ActivityStore>(
    store: &S,
    document: &GpxDocument,
    user_id: Uuid,
    options: &IngestOptions,
) -> Result<FileStatus, IngestError> {
    let samples = match extract::extract(document, &options.category_filter)? {
        Extraction::Accepted(samples) => samples,
        Extraction::Rejected { category } => return Ok(FileStatus::Skipped { category }),
    };

    let metrics = process::process(&samples, options.pause_threshold)?;
    if metrics.pace.paused_intervals > 0 {
        tracing::debug!(
            "Excluded {} paused intervals from pace ({:.1}s moving over {:.1}m)",
            metrics.pace.paused_intervals,
            metrics.pace.moving_seconds,
            metrics.pace.moving_distance_meters
        );
    }

    let activity = Activity::from_metrics(user_id, &options.category_filter, &metrics);
    tracing::info!(
        "Activity {} prepared: {} points, {:.0} m in {:.0} s",
        activity.id,
        activity.sample_count,
        activity.distance_meters,
        activity.duration_seconds
    );

    let summary = batch::write_activity(store, &activity, &samples, options.chunk_size).await?;

    Ok(FileStatus::Ingested {
        activity_id: activity.id,
        samples: summary.samples_written,
        chunks: summary.chunks_written,
    })
}
