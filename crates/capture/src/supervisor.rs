//! Thin facade over the capture subprocess (spec §4.5). The supervisor
//! never calls `tcpdump` itself; it only issues service actions through
//! [`HostAdapter`] and inspects the filesystem.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tap_core::service::{ServiceAction, ServiceState};
use tap_hostctl::{resolve_under_root, HostAdapter};
use tokio::io::AsyncSeekExt;
use tokio::sync::Mutex;

use crate::byterange::ByteRangeSpec;
use crate::error::CaptureError;
use crate::listing::{paginate, scan};
use crate::status::CaptureStatus;

const STATUS_TTL: Duration = Duration::from_secs(5);

/// A capture file opened for download, already seeked to the requested
/// range's start.
pub struct OpenedCapture {
    pub file: tokio::fs::File,
    pub start: u64,
    pub len: u64,
    pub total_size: u64,
}

pub struct CaptureSupervisor {
    host: Arc<dyn HostAdapter>,
    dir: PathBuf,
    service_name: String,
    status_cache: Mutex<Option<(Instant, CaptureStatus)>>,
}

impl CaptureSupervisor {
    pub fn new(host: Arc<dyn HostAdapter>, dir: PathBuf, service_name: impl Into<String>) -> Self {
        Self { host, dir, service_name: service_name.into(), status_cache: Mutex::new(None) }
    }

    /// `{running, since, active_file?, recent_files}`, 5 s TTL-cached
    /// directory scan + service query. Single-flight: the lock is held
    /// across recomputation so concurrent callers await rather than race.
    pub async fn status(&self) -> Result<CaptureStatus, CaptureError> {
        let mut guard = self.status_cache.lock().await;
        if let Some((computed_at, status)) = guard.as_ref() {
            if computed_at.elapsed() < STATUS_TTL {
                return Ok(status.clone());
            }
        }
        let computed = self.compute_status().await?;
        *guard = Some((Instant::now(), computed.clone()));
        Ok(computed)
    }

    async fn compute_status(&self) -> Result<CaptureStatus, CaptureError> {
        let service = self.host.service_status(&self.service_name).await?;
        let running = service.state == ServiceState::Active;
        let recent_files = scan(&self.dir).await?;
        let active_file = if running { recent_files.first().map(|a| a.path.clone()) } else { None };
        Ok(CaptureStatus { running, since_ms: service.since_ms, active_file, recent_files })
    }

    pub async fn start(&self) -> Result<CaptureStatus, CaptureError> {
        self.act(ServiceAction::Start).await
    }

    pub async fn stop(&self) -> Result<CaptureStatus, CaptureError> {
        self.act(ServiceAction::Stop).await
    }

    pub async fn restart(&self) -> Result<CaptureStatus, CaptureError> {
        self.act(ServiceAction::Restart).await
    }

    async fn act(&self, action: ServiceAction) -> Result<CaptureStatus, CaptureError> {
        self.host.service_action(&self.service_name, action).await?;
        *self.status_cache.lock().await = None; // invalidate: state just changed
        self.status().await
    }

    pub async fn list(
        &self,
        offset: usize,
        limit: usize,
        filter: Option<&str>,
    ) -> Result<Vec<tap_core::CaptureArtifact>, CaptureError> {
        let artifacts = scan(&self.dir).await?;
        Ok(paginate(&artifacts, offset, limit, filter))
    }

    /// Open `name` (resolved under the capture directory) for download,
    /// validating any requested byte range before the file is opened.
    pub async fn open(&self, name: &str, range: Option<ByteRangeSpec>) -> Result<OpenedCapture, CaptureError> {
        let resolved = resolve_under_root(&self.dir, Path::new(name))?;
        let meta = tokio::fs::metadata(&resolved).await?;
        let total_size = meta.len();

        let resolved_range = match range {
            Some(spec) => spec.validate(total_size)?,
            None => crate::byterange::ResolvedRange { start: 0, len: total_size },
        };

        let mut file = tokio::fs::File::open(&resolved).await?;
        file.seek(std::io::SeekFrom::Start(resolved_range.start)).await?;
        Ok(OpenedCapture { file, start: resolved_range.start, len: resolved_range.len, total_size })
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
