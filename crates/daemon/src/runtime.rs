//! The explicit `Runtime` container (Design Notes §9) replacing "global
//! module state": owns every C1–C7 component plus the background tasks
//! C10 is responsible for starting, and builds the [`ApiState`] served by
//! `tap-api`'s router.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tap_api::ApiState;
use tap_capture::CaptureSupervisor;
use tap_config::{ConfigError, ConfigStore};
use tap_core::{AlertEvent, Source};
use tap_eventbus::EventBus;
use tap_hostctl::{HostAdapter, SystemHostAdapter};
use tap_modectl::ModeController;
use tap_retention::{spawn_periodic, EngineHandle, RetentionEngine, RetentionSettings, DEFAULT_INTERVAL};
use tap_tail::{follow, EveJsonParser, FollowerHandle, DEFAULT_TICK};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::sampler::{self, SamplerHandle};

const FOLLOWER_JOIN_TIMEOUT: Duration = Duration::from_secs(5);
const SURICATA_RELOAD_SERVICE: &str = "suricata";
const ZEEK_NOTICE_LOG: &str = "notice.log";

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("loading configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Everything `main.rs` needs to serve the HTTP/WebSocket surface and run
/// its background tasks; also the thing `main.rs` shuts down on signal.
pub struct Runtime {
    pub api_state: Arc<ApiState>,
    retention: Arc<RetentionEngine>,
    retention_handle: Option<EngineHandle>,
    sampler_handle: Option<SamplerHandle>,
    followers: Vec<FollowerHandle>,
    ingest_task: Option<tokio::task::JoinHandle<()>>,
}

impl Runtime {
    pub async fn start(config_path: PathBuf) -> Result<Self, RuntimeError> {
        let config = Arc::new(ConfigStore::load(config_path)?);
        let host: Arc<dyn HostAdapter> = Arc::new(SystemHostAdapter::default());
        let snapshot = config.get();

        let mode = Arc::new(ModeController::new(host.clone(), config.clone()));
        let capture =
            Arc::new(CaptureSupervisor::new(host.clone(), snapshot.paths.capture_dir.clone(), "networktap-capture"));
        let bus = EventBus::new();
        let tail_cache = Arc::new(tap_tail::TailCache::new());
        let stats_history = Arc::new(tap_api::stats_history::StatsHistory::new());

        let mut retention_settings = RetentionSettings::new(
            snapshot.paths.capture_dir.clone(),
            snapshot.retention.max_age_days,
            snapshot.retention.min_free_disk_pct,
            SURICATA_RELOAD_SERVICE,
        );
        if snapshot.features.suricata_enabled {
            retention_settings.event_log_path = Some(snapshot.paths.suricata_eve_log.clone());
        }
        let retention = Arc::new(RetentionEngine::new(host.clone(), retention_settings));
        let (_low_disk_tx, low_disk_rx) = mpsc::channel(1);
        let retention_handle = spawn_periodic(retention.clone(), DEFAULT_INTERVAL, low_disk_rx);

        let (event_tx, mut event_rx) = mpsc::channel::<AlertEvent>(1024);
        let mut followers = Vec::new();
        if snapshot.features.suricata_enabled {
            info!(path = %snapshot.paths.suricata_eve_log.display(), "starting suricata tail follower");
            followers.push(follow(
                snapshot.paths.suricata_eve_log.clone(),
                Arc::new(EveJsonParser::new(Source::Suricata)),
                event_tx.clone(),
                "suricata".to_string(),
                DEFAULT_TICK,
            ));
        }
        if snapshot.features.zeek_enabled {
            let notice_log = snapshot.paths.zeek_log_dir.join(ZEEK_NOTICE_LOG);
            info!(path = %notice_log.display(), "starting zeek tail follower");
            followers.push(follow(
                notice_log,
                Arc::new(EveJsonParser::new(Source::Zeek)),
                event_tx.clone(),
                "zeek".to_string(),
                DEFAULT_TICK,
            ));
        }
        drop(event_tx);

        let bus_sink = bus.clone();
        let ingest_task = tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                bus_sink.publish(event);
            }
        });

        let sampler_handle = sampler::spawn(stats_history.clone(), sampler::SAMPLE_INTERVAL);

        let api_state = Arc::new(ApiState::new(
            config,
            host,
            mode,
            capture,
            bus,
            tail_cache,
            retention.clone(),
            stats_history,
            started_at_ms(),
        ));

        Ok(Self {
            api_state,
            retention,
            retention_handle: Some(retention_handle),
            sampler_handle: Some(sampler_handle),
            followers,
            ingest_task: Some(ingest_task),
        })
    }

    /// Graceful shutdown (spec §4.10): stop accepting connections is the
    /// caller's job (axum's own graceful-shutdown future); this closes
    /// in-flight WebSockets with 1001, flushes retention once more, and
    /// joins every C3 follower within 5 s.
    pub async fn shutdown(self) {
        self.api_state.trigger_shutdown();

        if let Some(handle) = self.sampler_handle {
            handle.stop().await;
        }
        if let Some(handle) = self.retention_handle {
            handle.stop().await;
        }
        if let Err(e) = self.retention.run_once().await {
            warn!(error = %e, "final retention pass failed during shutdown");
        }

        let join_all = async {
            for follower in self.followers {
                follower.stop().await;
            }
        };
        if tokio::time::timeout(FOLLOWER_JOIN_TIMEOUT, join_all).await.is_err() {
            warn!("tail followers did not stop within the shutdown grace period");
        }

        if let Some(task) = self.ingest_task {
            task.abort();
        }
        info!("runtime shutdown complete");
    }
}

fn started_at_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}
