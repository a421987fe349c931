use serde::Serialize;

use crate::config::ClickHouseSettings;
use crate::error::StorageError;
use crate::storage::{ActivityStore, ACTIVITIES_TABLE, TRACK_POINTS_TABLE};
use crate::types::record::{ActivityRow, SampleRow};

const CREATE_ACTIVITIES: &str = "
CREATE TABLE IF NOT EXISTS activities (
    activity_id UUID,
    user_id UUID,
    start_time DateTime64(3),
    end_time DateTime64(3),
    activity_type String,
    distance_meters Float64,
    distance_miles Float64,
    duration_seconds Float64,
    avg_pace_minutes_per_km Nullable(Float64),
    avg_pace_seconds_per_km Nullable(Float64),
    avg_pace_minutes_per_mile Nullable(Float64),
    total_elevation_gain_meters Float64,
    avg_heart_rate UInt16,
    max_heart_rate UInt16,
    created_at DateTime64(3) DEFAULT now()
)
ENGINE = MergeTree()
ORDER BY (user_id, start_time)";

const CREATE_TRACK_POINTS: &str = "
CREATE TABLE IF NOT EXISTS track_points (
    activity_id UUID,
    timestamp DateTime64(3),
    latitude Float64,
    longitude Float64,
    elevation_meters Float64,
    heart_rate UInt16,
    cadence UInt16
)
ENGINE = MergeTree()
ORDER BY (activity_id, timestamp)";

/// Writes rows through the ClickHouse HTTP interface as `JSONEachRow`.
#[derive(Clone)]
pub struct ClickHouseStore {
    client: reqwest::Client,
    settings: ClickHouseSettings,
}

impl ClickHouseStore {
    pub fn new(settings: ClickHouseSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        self.execute(CREATE_ACTIVITIES, String::new()).await?;
        self.execute(CREATE_TRACK_POINTS, String::new()).await?;
        tracing::info!(
            "ClickHouse tables ready in database {}",
            self.settings.database
        );
        Ok(())
    }

    async fn insert<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<(), StorageError> {
        if rows.is_empty() {
            return Ok(());
        }
        let query = format!("INSERT INTO {} FORMAT JSONEachRow", table);
        self.execute(&query, encode_rows(rows)?).await
    }

    async fn execute(&self, query: &str, body: String) -> Result<(), StorageError> {
        let response = self
            .client
            .post(&self.settings.url)
            .query(&[("query", query), ("database", self.settings.database.as_str())])
            .basic_auth(&self.settings.username, Some(&self.settings.password))
            .body(body)
            .send()
            .await
            .map_err(|err| StorageError::Request(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

impl ActivityStore for ClickHouseStore {
    async fn insert_activity(&self, row: &ActivityRow) -> Result<(), StorageError> {
        self.insert(ACTIVITIES_TABLE, std::slice::from_ref(row)).await
    }

    async fn insert_samples(&self, rows: &[SampleRow]) -> Result<(), StorageError> {
        self.insert(TRACK_POINTS_TABLE, rows).await
    }
}

/// One JSON object per line, as `JSONEachRow` expects.
pub fn encode_rows<T: Serialize>(rows: &[T]) -> Result<String, StorageError> {
    let mut body = String::new();
    for row in rows {
        let line = serde_json::to_string(row).map_err(|err| StorageError::Encode(err.to_string()))?;
        body.push_str(&line);
        body.push('\n');
    }
    Ok(body)
}
