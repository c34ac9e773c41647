//! Shared handles reachable from every handler (spec §4.9), the `axum::extract::State`
//! payload. `tap-daemon`'s `Runtime` owns the concrete values and builds one of these at
//! startup; nothing here opens its own connections or spawns tasks.

use std::sync::Arc;

use tap_capture::CaptureSupervisor;
use tap_config::ConfigStore;
use tap_eventbus::EventBus;
use tap_hostctl::HostAdapter;
use tap_modectl::ModeController;
use tap_retention::RetentionEngine;
use tap_tail::TailCache;
use tokio::sync::broadcast;

use crate::routes::stats::StatsCache;
use crate::stats_history::StatsHistory;
use crate::throttle::RateLimiter;

/// Broadcast capacity for the shutdown signal; one message is ever sent,
/// but every open `/ws/alerts` connection holds its own receiver.
const SHUTDOWN_CHANNEL_CAPACITY: usize = 16;

pub struct ApiState {
    pub config: Arc<ConfigStore>,
    pub host: Arc<dyn HostAdapter>,
    pub mode: Arc<ModeController>,
    pub capture: Arc<CaptureSupervisor>,
    pub bus: EventBus,
    pub tail_cache: Arc<TailCache>,
    pub retention: Arc<RetentionEngine>,
    pub stats_history: Arc<StatsHistory>,
    pub stats_cache: StatsCache,
    pub reboot_throttle: RateLimiter,
    pub mode_throttle: RateLimiter,
    pub started_at_ms: u64,
    shutdown: broadcast::Sender<()>,
}

impl ApiState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Arc<ConfigStore>,
        host: Arc<dyn HostAdapter>,
        mode: Arc<ModeController>,
        capture: Arc<CaptureSupervisor>,
        bus: EventBus,
        tail_cache: Arc<TailCache>,
        retention: Arc<RetentionEngine>,
        stats_history: Arc<StatsHistory>,
        started_at_ms: u64,
    ) -> Self {
        Self {
            config,
            host,
            mode,
            capture,
            bus,
            tail_cache,
            retention,
            stats_history,
            stats_cache: StatsCache::default(),
            reboot_throttle: RateLimiter::new(1, std::time::Duration::from_secs(60)),
            mode_throttle: RateLimiter::new(3, std::time::Duration::from_secs(60)),
            started_at_ms,
            shutdown: broadcast::channel(SHUTDOWN_CHANNEL_CAPACITY).0,
        }
    }

    /// Notify every open `/ws/alerts` connection to close with code 1001
    /// (spec §4.10 graceful shutdown). `tap-daemon`'s `Runtime` calls this
    /// once, before joining C3 followers.
    pub fn trigger_shutdown(&self) {
        let _ = self.shutdown.send(());
    }

    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown.subscribe()
    }
}
