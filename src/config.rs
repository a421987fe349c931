use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use uuid::Uuid;

use crate::pipeline::process::DEFAULT_PAUSE_THRESHOLD;

pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = match NonZeroUsize::new(10_000) {
    Some(size) => size,
    None => panic!("default chunk size must be non-zero"),
};

#[derive(Debug, Clone)]
pub struct ClickHouseSettings {
    pub url: String,
    pub username: String,
    pub password: String,
    pub database: String,
}

/// Knobs for one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Only tracks whose `<type>` equals this are ingested.
    pub category_filter: String,
    pub chunk_size: NonZeroUsize,
    pub pause_threshold: Duration,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            category_filter: "running".to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            pause_threshold: DEFAULT_PAUSE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub clickhouse: ClickHouseSettings,
    pub activities_dir: PathBuf,
    pub user_id: Option<Uuid>,
    pub dry_run: bool,
    pub ingest: IngestOptions,
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = IngestOptions::default();

        let chunk_size = env_parse::<usize>("BATCH_SIZE")
            .and_then(NonZeroUsize::new)
            .unwrap_or(defaults.chunk_size);

        let pause_threshold = env_parse::<f64>("PAUSE_THRESHOLD_SECONDS")
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .unwrap_or(defaults.pause_threshold);

        let category_filter = env_string("ACTIVITY_CATEGORY").unwrap_or(defaults.category_filter);

        let dry_run = env_string("INGEST_DRY_RUN")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            clickhouse: ClickHouseSettings {
                url: env_string("CLICKHOUSE_URL").unwrap_or_else(|| "http://localhost:8123".to_string()),
                username: env_string("CLICKHOUSE_USERNAME").unwrap_or_else(|| "default".to_string()),
                password: std::env::var("CLICKHOUSE_PASSWORD").unwrap_or_default(),
                database: env_string("CLICKHOUSE_DATABASE").unwrap_or_else(|| "default".to_string()),
            },
            activities_dir: env_string("ACTIVITIES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./activities")),
            user_id: env_parse("INGEST_USER_ID"),
            dry_run,
            ingest: IngestOptions {
                category_filter,
                chunk_size,
                pause_threshold,
            },
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|s| s.parse().ok())
}
