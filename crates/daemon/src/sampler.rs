//! Periodic system-stats sampler (spec §4.10): pushes one [`StatsSample`]
//! into the shared 30-sample ring every tick.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tap_api::stats_history::{read_mem_used_pct, CpuSampler, StatsHistory, StatsSample};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(5);

pub struct SamplerHandle {
    cancel: CancellationToken,
    join: tokio::task::JoinHandle<()>,
}

impl SamplerHandle {
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = self.join.await;
    }
}

pub fn spawn(history: Arc<StatsHistory>, interval: Duration) -> SamplerHandle {
    let cancel = CancellationToken::new();
    let task_cancel = cancel.clone();
    let join = tokio::spawn(async move {
        let cpu = CpuSampler::new();
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = task_cancel.cancelled() => return,
                _ = ticker.tick() => {
                    let sample = StatsSample {
                        ts_ms: now_ms(),
                        cpu_pct: cpu.sample(),
                        mem_used_pct: read_mem_used_pct(),
                    };
                    debug!(cpu_pct = sample.cpu_pct, mem_used_pct = sample.mem_used_pct, "stats sample taken");
                    history.push(sample);
                }
            }
        }
    });
    SamplerHandle { cancel, join }
}

fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}
