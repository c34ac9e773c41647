//! Timer-driven retention passes (spec §4.6): runs hourly by default and
//! can be triggered early on low-disk events.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tap_hostctl::HostAdapter;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::diskspace::{self, FreeSpaceSource, StatvfsSource};
use crate::error::RetentionError;
use crate::rotate::{self, DEFAULT_ROTATE_THRESHOLD_BYTES};
use crate::sweep::{self, SweepOutcome};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
pub struct RetentionSettings {
    pub capture_dir: PathBuf,
    pub retention_days: u32,
    pub min_free_pct: u8,
    pub event_log_path: Option<PathBuf>,
    pub event_log_rotate_threshold: u64,
    pub reload_service: String,
}

impl RetentionSettings {
    pub fn new(capture_dir: PathBuf, retention_days: u32, min_free_pct: u8, reload_service: impl Into<String>) -> Self {
        Self {
            capture_dir,
            retention_days,
            min_free_pct,
            event_log_path: None,
            event_log_rotate_threshold: DEFAULT_ROTATE_THRESHOLD_BYTES,
            reload_service: reload_service.into(),
        }
    }
}

pub struct RetentionEngine {
    host: Arc<dyn HostAdapter>,
    free_space: Box<dyn FreeSpaceSource>,
    settings: RetentionSettings,
}

impl RetentionEngine {
    pub fn new(host: Arc<dyn HostAdapter>, settings: RetentionSettings) -> Self {
        Self { host, free_space: Box::new(StatvfsSource), settings }
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn with_free_space_source(mut self, source: Box<dyn FreeSpaceSource>) -> Self {
        self.free_space = source;
        self
    }

    /// One full pass: age/disk-pressure sweep, then event-log rotation.
    pub async fn run_once(&self) -> Result<SweepOutcome, RetentionError> {
        let outcome = sweep::sweep(
            &self.settings.capture_dir,
            self.settings.retention_days,
            self.settings.min_free_pct,
            self.free_space.as_ref(),
        )
        .await?;

        if let Some(log_path) = &self.settings.event_log_path {
            match rotate::rotate_if_oversized(
                log_path,
                self.settings.event_log_rotate_threshold,
                self.host.as_ref(),
                &self.settings.reload_service,
            )
            .await
            {
                Ok(Some(gz_path)) => info!(path = %gz_path.display(), "rotated oversized event log"),
                Ok(None) => {}
                Err(e) => error!(error = %e, "event log rotation failed"),
            }
        }

        Ok(outcome)
    }

    pub async fn free_pct(&self) -> Result<u8, RetentionError> {
        diskspace::free_pct(self.host.as_ref(), &self.settings.capture_dir).await
    }
}

pub struct EngineHandle {
    cancel: CancellationToken,
    join: tokio::task::JoinHandle<()>,
}

impl EngineHandle {
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = self.join.await;
    }
}

/// Run `engine.run_once()` on `interval`, plus immediately whenever a
/// low-disk trigger arrives on `low_disk_trigger`.
pub fn spawn_periodic(
    engine: Arc<RetentionEngine>,
    interval: Duration,
    mut low_disk_trigger: mpsc::Receiver<()>,
) -> EngineHandle {
    let cancel = CancellationToken::new();
    let task_cancel = cancel.clone();
    let join = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = task_cancel.cancelled() => return,
                _ = ticker.tick() => run_and_log(&engine).await,
                Some(()) = low_disk_trigger.recv() => run_and_log(&engine).await,
            }
        }
    });
    EngineHandle { cancel, join }
}

async fn run_and_log(engine: &Arc<RetentionEngine>) {
    match engine.run_once().await {
        Ok(outcome) => {
            if !outcome.deleted.is_empty() {
                info!(deleted = outcome.deleted.len(), "retention pass completed");
            }
        }
        Err(e) => error!(error = %e, "retention pass failed"),
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
