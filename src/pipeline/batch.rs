use std::num::NonZeroUsize;

use uuid::Uuid;

use crate::error::StorageError;
use crate::storage::ActivityStore;
use crate::types::activity::{Activity, Sample};
use crate::types::record::{ActivityRow, SampleRow};

/// A contiguous slice of an activity's samples, written as one unit.
#[derive(Debug, Clone, Copy)]
pub struct SampleBatch<'a> {
    pub activity_id: Uuid,
    pub index: usize,
    pub samples: &'a [Sample],
}

impl SampleBatch<'_> {
    pub fn to_rows(&self) -> Vec<SampleRow> {
        self.samples
            .iter()
            .map(|sample| SampleRow::new(self.activity_id, sample))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub chunks_written: usize,
    pub samples_written: usize,
}

/// Splits `samples` by position into chunks of `chunk_size`; the last chunk
/// may be shorter.
pub fn batches(
    activity_id: Uuid,
    samples: &[Sample],
    chunk_size: NonZeroUsize,
) -> impl Iterator<Item = SampleBatch<'_>> {
    samples
        .chunks(chunk_size.get())
        .enumerate()
        .map(move |(index, samples)| SampleBatch {
            activity_id,
            index,
            samples,
        })
}

/// Writes the activity row, then its samples chunk by chunk. Stops at the
/// first failed write.
pub async fn write_activity<S: ActivityStore>(
    store: &S,
    activity: &Activity,
    samples: &[Sample],
    chunk_size: NonZeroUsize,
) -> Result<BatchSummary, StorageError> {
    store.insert_activity(&ActivityRow::from(activity)).await?;

    let total_batches = samples.len().div_ceil(chunk_size.get());
    let mut summary = BatchSummary::default();

    for batch in batches(activity.id, samples, chunk_size) {
        tracing::debug!(
            "Writing track points batch {}/{} ({} points) for activity {}",
            batch.index + 1,
            total_batches,
            batch.samples.len(),
            activity.id
        );
        store.insert_samples(&batch.to_rows()).await?;
        summary.chunks_written += 1;
        summary.samples_written += batch.samples.len();
    }

    Ok(summary)
}
