//! Bounded, TTL-cached tail reads for synchronous REST consumers (spec §4.3).
//!
//! The whole cache is guarded by one `tokio::sync::Mutex` so a cache miss is
//! computed while the lock is held: concurrent callers for the same (or a
//! different) path simply await the lock instead of racing duplicate reads.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{classify_io_error, TailError};
use crate::parser::LineParser;

const DEFAULT_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    size: u64,
    mtime_nanos: i128,
}

struct CacheEntry {
    key: CacheKey,
    computed_at: Instant,
    events: Arc<Vec<tap_core::AlertEvent>>,
}

/// Result of a [`TailCache::tail`] call; `cached` is surfaced in the REST
/// `meta.cached` field.
pub struct TailReadResult {
    pub events: Arc<Vec<tap_core::AlertEvent>>,
    pub cached: bool,
}

pub struct TailCache {
    entries: Mutex<HashMap<PathBuf, CacheEntry>>,
    ttl: Duration,
}

impl Default for TailCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TailCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self { entries: Mutex::new(HashMap::new()), ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Bounded read of the last `max_bytes` of `path`, parsed through
    /// `parser`. Missing files yield an empty, uncached result.
    pub async fn tail(
        &self,
        path: &Path,
        max_bytes: usize,
        parser: &dyn LineParser,
    ) -> Result<TailReadResult, TailError> {
        let mut guard = self.entries.lock().await;

        let meta = match tokio::fs::metadata(path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "tail read: source file missing");
                return Ok(TailReadResult { events: Arc::new(Vec::new()), cached: false });
            }
            Err(e) => return Err(classify_io_error(e)),
        };
        let key = CacheKey { size: meta.len(), mtime_nanos: mtime_nanos(&meta) };

        if let Some(entry) = guard.get(path) {
            if entry.key == key && entry.computed_at.elapsed() < self.ttl {
                return Ok(TailReadResult { events: entry.events.clone(), cached: true });
            }
        }

        let events = Arc::new(compute_tail(path, max_bytes, parser).await?);
        guard.insert(path.to_path_buf(), CacheEntry { key, computed_at: Instant::now(), events: events.clone() });
        Ok(TailReadResult { events, cached: false })
    }
}

#[cfg(unix)]
fn mtime_nanos(meta: &std::fs::Metadata) -> i128 {
    use std::os::unix::fs::MetadataExt;
    meta.mtime() as i128 * 1_000_000_000 + meta.mtime_nsec() as i128
}

#[cfg(not(unix))]
fn mtime_nanos(meta: &std::fs::Metadata) -> i128 {
    meta.modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_nanos() as i128)
        .unwrap_or(0)
}

async fn compute_tail(
    path: &Path,
    max_bytes: usize,
    parser: &dyn LineParser,
) -> Result<Vec<tap_core::AlertEvent>, TailError> {
    let mut file = tokio::fs::File::open(path).await.map_err(classify_io_error)?;
    let len = file.metadata().await.map_err(classify_io_error)?.len();
    let start = len.saturating_sub(max_bytes as u64);
    file.seek(std::io::SeekFrom::Start(start)).await.map_err(classify_io_error)?;

    let mut buf = Vec::new();
    file.read_to_end(&mut buf).await.map_err(classify_io_error)?;

    let mut lines = buf.split(|&b| b == b'\n').peekable();
    if start > 0 {
        lines.next(); // first line is a partial fragment, skip it
    }

    let mut events = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let Ok(text) = std::str::from_utf8(line) else { continue };
        if let Ok(event) = parser.parse(text) {
            events.push(event);
        }
    }
    Ok(events)
}

#[cfg(test)]
#[path = "tail_read_tests.rs"]
mod tests;
