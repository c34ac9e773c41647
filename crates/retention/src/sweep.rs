//! Age- and disk-pressure-based artifact deletion (spec §4.6).

use std::path::{Path, PathBuf};

use fs2::FileExt;
use tap_core::CaptureArtifact;
use tracing::info;

use crate::diskspace::FreeSpaceSource;
use crate::error::RetentionError;

#[derive(Debug, Clone)]
pub struct DeletedArtifact {
    pub path: PathBuf,
    pub size: u64,
    pub free_pct_after: Option<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct SweepOutcome {
    pub deleted: Vec<DeletedArtifact>,
    pub free_pct_after: Option<u8>,
}

/// Run one retention pass over `dir`: age-based deletion, then (if the
/// volume is still short on space) oldest-first deletion until
/// `min_free_pct` is satisfied. The newest artifact and any artifact held
/// under an advisory lock by the capture producer are never deleted.
pub async fn sweep(
    dir: &Path,
    retention_days: u32,
    min_free_pct: u8,
    free_space: &dyn FreeSpaceSource,
) -> Result<SweepOutcome, RetentionError> {
    let artifacts = tap_capture::scan(dir).await?; // newest-first
    let newest_path = artifacts.first().map(|a| a.path.clone());
    let now_ms = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let retention_ms = u64::from(retention_days) * 24 * 60 * 60 * 1000;

    let mut deleted = Vec::new();
    let mut remaining: Vec<CaptureArtifact> = Vec::new();

    for artifact in artifacts {
        let protected = is_protected(&artifact.path, newest_path.as_deref());
        let age_ms = now_ms.saturating_sub(artifact.mtime_ms);
        if !protected && age_ms > retention_ms {
            delete_artifact(&artifact, &mut deleted, None).await?;
        } else {
            remaining.push(artifact);
        }
    }

    // remaining is still newest-first (scan()'s order preserved); walk from
    // the back (oldest) while the volume is short on free space.
    let mut free_pct_after = free_space.free_pct(dir).ok();
    while free_pct_after.is_some_and(|pct| pct < min_free_pct) {
        let Some(oldest_idx) = remaining.iter().rposition(|a| !is_protected(&a.path, newest_path.as_deref()))
        else {
            break;
        };
        let artifact = remaining.remove(oldest_idx);
        tokio::fs::remove_file(&artifact.path).await?;
        free_pct_after = free_space.free_pct(dir).ok();
        info!(
            path = %artifact.path.display(),
            size = artifact.size,
            free_pct_after = ?free_pct_after,
            "deleted capture artifact for disk pressure"
        );
        deleted.push(DeletedArtifact { path: artifact.path, size: artifact.size, free_pct_after });
    }

    Ok(SweepOutcome { deleted, free_pct_after })
}

async fn delete_artifact(
    artifact: &CaptureArtifact,
    deleted: &mut Vec<DeletedArtifact>,
    free_pct_after: Option<u8>,
) -> Result<(), RetentionError> {
    tokio::fs::remove_file(&artifact.path).await?;
    info!(path = %artifact.path.display(), size = artifact.size, age_based = true, "deleted capture artifact past retention age");
    deleted.push(DeletedArtifact { path: artifact.path.clone(), size: artifact.size, free_pct_after });
    Ok(())
}

/// True if `path` is the newest artifact, or is currently held under an
/// advisory exclusive lock by the capture producer.
fn is_protected(path: &Path, newest: Option<&Path>) -> bool {
    if newest == Some(path) {
        return true;
    }
    is_locked(path)
}

fn is_locked(path: &Path) -> bool {
    let Ok(file) = std::fs::OpenOptions::new().write(true).open(path) else {
        return false;
    };
    match file.try_lock_exclusive() {
        Ok(()) => {
            let _ = FileExt::unlock(&file);
            false
        }
        Err(_) => true,
    }
}

#[cfg(test)]
#[path = "sweep_tests.rs"]
mod tests;
