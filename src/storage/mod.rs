//! Storage backends for activity and sample rows.

mod clickhouse;
mod memory;

pub use clickhouse::{encode_rows, ClickHouseStore};
pub use memory::MemoryStore;

use crate::error::StorageError;
use crate::types::record::{ActivityRow, SampleRow};

pub const ACTIVITIES_TABLE: &str = "activities";
pub const TRACK_POINTS_TABLE: &str = "track_points";

/// A sink for ingested rows. Each call is one independent write; there is no
/// atomicity across calls.
#[allow(async_fn_in_trait)]
pub trait ActivityStore {
    async fn insert_activity(&self, row: &ActivityRow) -> Result<(), StorageError>;

    async fn insert_samples(&self, rows: &[SampleRow]) -> Result<(), StorageError>;
}
