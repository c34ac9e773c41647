//! Capture directory scanning (spec §4.5).

use std::path::Path;

use tap_core::CaptureArtifact;

use crate::error::CaptureError;

/// Scan `dir` for capture files, returning them sorted by mtime descending
/// (ties broken by filename — capture file names are timestamp-sortable by
/// construction).
pub async fn scan(dir: &Path) -> Result<Vec<CaptureArtifact>, CaptureError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut artifacts = Vec::new();
    let mut generation = 0u64;
    while let Some(entry) = entries.next_entry().await? {
        let meta = entry.metadata().await?;
        if !meta.is_file() {
            continue;
        }
        let mtime_ms = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        artifacts.push(CaptureArtifact { path: entry.path(), size: meta.len(), mtime_ms, generation });
        generation += 1;
    }

    artifacts.sort_by(|a, b| b.mtime_ms.cmp(&a.mtime_ms).then_with(|| b.path.cmp(&a.path)));
    Ok(artifacts)
}

/// Paginate a pre-scanned, already-sorted artifact list, optionally keeping
/// only entries whose filename contains `filter`.
pub fn paginate(
    artifacts: &[CaptureArtifact],
    offset: usize,
    limit: usize,
    filter: Option<&str>,
) -> Vec<CaptureArtifact> {
    artifacts
        .iter()
        .filter(|a| match filter {
            Some(needle) => a.path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.contains(needle)),
            None => true,
        })
        .skip(offset)
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod tests;
