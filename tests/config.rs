use std::time::Duration;

use gpx_ingest::config::{Config, IngestOptions, DEFAULT_CHUNK_SIZE};

#[test]
fn default_options() {
    let options = IngestOptions::default();
    assert_eq!(options.chunk_size.get(), 10_000);
    assert_eq!(options.chunk_size, DEFAULT_CHUNK_SIZE);
    assert_eq!(options.pause_threshold, Duration::from_secs(6));
    assert_eq!(options.category_filter, "running");
}

// Environment variables are process-wide, so every env case lives in one test.
#[test]
fn from_env_falls_back_on_unusable_values() {
    std::env::set_var("PAUSE_THRESHOLD_SECONDS", "1e30");
    std::env::set_var("BATCH_SIZE", "0");
    let config = Config::from_env();
    assert_eq!(config.ingest.pause_threshold, Duration::from_secs(6));
    assert_eq!(config.ingest.chunk_size, DEFAULT_CHUNK_SIZE);

    for bad in ["-5", "NaN", "inf", "soon"] {
        std::env::set_var("PAUSE_THRESHOLD_SECONDS", bad);
        let config = Config::from_env();
        assert_eq!(config.ingest.pause_threshold, Duration::from_secs(6), "{bad}");
    }

    std::env::set_var("PAUSE_THRESHOLD_SECONDS", "2.5");
    std::env::set_var("BATCH_SIZE", "250");
    let config = Config::from_env();
    assert_eq!(config.ingest.pause_threshold, Duration::from_millis(2500));
    assert_eq!(config.ingest.chunk_size.get(), 250);

    std::env::remove_var("PAUSE_THRESHOLD_SECONDS");
    std::env::remove_var("BATCH_SIZE");
}
