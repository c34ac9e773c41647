//! Free-disk-percent queries (spec §4.6).

use std::path::Path;

use tap_hostctl::{HostAdapter, ScriptCommand};
use tracing::warn;

use crate::error::RetentionError;

/// Abstraction over "how full is the volume under `path`", so retention
/// sweeps can be driven deterministically in tests.
pub trait FreeSpaceSource: Send + Sync {
    fn free_pct(&self, path: &Path) -> Result<u8, RetentionError>;
}

/// Real source: `statvfs(2)` via `rustix`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatvfsSource;

impl FreeSpaceSource for StatvfsSource {
    fn free_pct(&self, path: &Path) -> Result<u8, RetentionError> {
        let stats = rustix::fs::statvfs(path).map_err(|e| RetentionError::DiskSpace(e.to_string()))?;
        if stats.f_blocks == 0 {
            return Err(RetentionError::DiskSpace("statvfs reported zero total blocks".to_string()));
        }
        let pct = (stats.f_bavail as f64 / stats.f_blocks as f64) * 100.0;
        Ok(pct.clamp(0.0, 100.0).round() as u8)
    }
}

/// Fallback for targets where `statvfs` isn't available: parse `df -P`
/// through the host adapter (spec §4.6).
pub async fn df_fallback_free_pct(host: &dyn HostAdapter, path: &Path) -> Result<u8, RetentionError> {
    let cmd = ScriptCommand::new("df", std::time::Duration::from_secs(5))
        .args(["-P", &path.display().to_string()]);
    let output = host.run_script(cmd, "df -P").await?;
    parse_df_output(&output.stdout)
}

fn parse_df_output(stdout: &str) -> Result<u8, RetentionError> {
    let data_line = stdout
        .lines()
        .nth(1)
        .ok_or_else(|| RetentionError::DiskSpace("df produced no data line".to_string()))?;
    let used_pct = data_line
        .split_whitespace()
        .nth(4)
        .ok_or_else(|| RetentionError::DiskSpace(format!("unexpected df output: {data_line}")))?
        .trim_end_matches('%');
    let used: u8 = used_pct
        .parse()
        .map_err(|_| RetentionError::DiskSpace(format!("unparseable use%% field: {used_pct}")))?;
    Ok(100u8.saturating_sub(used))
}

/// Try `statvfs` first, falling back to `df -P` on failure.
pub async fn free_pct(host: &dyn HostAdapter, path: &Path) -> Result<u8, RetentionError> {
    match StatvfsSource.free_pct(path) {
        Ok(pct) => Ok(pct),
        Err(e) => {
            warn!(error = %e, "statvfs unavailable, falling back to df -P");
            df_fallback_free_pct(host, path).await
        }
    }
}

#[cfg(test)]
#[path = "diskspace_tests.rs"]
mod tests;
