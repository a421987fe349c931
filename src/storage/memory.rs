use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::error::StorageError;
use crate::storage::ActivityStore;
use crate::types::record::{ActivityRow, SampleRow};

/// Keeps rows in memory. Used for dry runs and tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    activities: Arc<DashMap<Uuid, ActivityRow>>,
    chunks: Arc<DashMap<Uuid, Vec<Vec<SampleRow>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activity(&self, activity_id: &Uuid) -> Option<ActivityRow> {
        self.activities.get(activity_id).map(|entry| entry.clone())
    }

    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }

    /// Sample chunks for an activity, in the order they were written.
    pub fn chunks(&self, activity_id: &Uuid) -> Vec<Vec<SampleRow>> {
        self.chunks
            .get(activity_id)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    pub fn samples(&self, activity_id: &Uuid) -> Vec<SampleRow> {
        self.chunks(activity_id).into_iter().flatten().collect()
    }

    pub fn sample_count(&self) -> usize {
        self.chunks
            .iter()
            .map(|entry| entry.value().iter().map(Vec::len).sum::<usize>())
            .sum()
    }
}

impl ActivityStore for MemoryStore {
    async fn insert_activity(&self, row: &ActivityRow) -> Result<(), StorageError> {
        self.activities.insert(row.activity_id, row.clone());
        Ok(())
    }

    async fn insert_samples(&self, rows: &[SampleRow]) -> Result<(), StorageError> {
        let Some(first) = rows.first() else {
            return Ok(());
        };
        self.chunks
            .entry(first.activity_id)
            .or_default()
            .push(rows.to_vec());
        tracing::debug!("Stored {} sample rows for {}", rows.len(), first.activity_id);
        Ok(())
    }
}
