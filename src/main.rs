use std::process::ExitCode;

use gpx_ingest::config::Config;
use gpx_ingest::pipeline::{discover, ingest};
use gpx_ingest::storage::{ClickHouseStore, MemoryStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gpx_ingest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let files = match discover::discover_gpx_files(&config.activities_dir).await {
        Ok(files) => files,
        Err(err) => {
            tracing::error!(
                "Failed to scan {}: {}",
                config.activities_dir.display(),
                err
            );
            return ExitCode::FAILURE;
        }
    };

    if files.is_empty() {
        tracing::info!("No GPX files found in {}", config.activities_dir.display());
        return ExitCode::SUCCESS;
    }

    let user_id = config.user_id.unwrap_or_else(Uuid::new_v4);
    tracing::info!("Ingesting as user {}", user_id);

    let report = if config.dry_run {
        tracing::info!("Dry run: rows are kept in memory");
        let store = MemoryStore::new();
        ingest::run(&store, &files, user_id, &config.ingest).await
    } else {
        let store = ClickHouseStore::new(config.clickhouse.clone());
        if let Err(err) = store.ensure_schema().await {
            tracing::error!("Failed to initialize tables: {}", err);
            return ExitCode::FAILURE;
        }
        ingest::run(&store, &files, user_id, &config.ingest).await
    };

    if report.failed() > 0 {
        tracing::warn!(
            "{} of {} files failed",
            report.failed(),
            report.attempted()
        );
    }

    ExitCode::SUCCESS
}
