use std::path::{Path, PathBuf};

/// Lists the `.gpx` files directly under `dir`, sorted by path. The
/// directory is created when it does not exist.
pub async fn discover_gpx_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    if tokio::fs::metadata(dir).await.is_err() {
        tracing::info!("Creating directory: {}", dir.display());
        tokio::fs::create_dir_all(dir).await?;
    }

    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() && is_gpx(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_gpx(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gpx"))
}
