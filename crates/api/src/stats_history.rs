//! 30-sample sparkline ring for `GET /system/status` (spec §4.10: "periodic
//! system-stats sampler ... 30 last samples"). The periodic sampler task
//! lives in `tap-daemon`'s `Runtime`; this crate only defines the shape and
//! a thread-safe ring to push into and read from.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde::Serialize;

pub const HISTORY_CAPACITY: usize = 30;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatsSample {
    pub ts_ms: u64,
    pub cpu_pct: f32,
    pub mem_used_pct: f32,
}

#[derive(Default)]
pub struct StatsHistory {
    samples: Mutex<VecDeque<StatsSample>>,
}

impl StatsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, sample: StatsSample) {
        let mut samples = self.samples.lock();
        if samples.len() >= HISTORY_CAPACITY {
            samples.pop_front();
        }
        samples.push_back(sample);
    }

    pub fn snapshot(&self) -> Vec<StatsSample> {
        self.samples.lock().iter().copied().collect()
    }

    pub fn latest(&self) -> Option<StatsSample> {
        self.samples.lock().back().copied()
    }
}

/// Read `/proc/uptime`'s first field (seconds since boot).
pub fn read_uptime_seconds() -> u64 {
    std::fs::read_to_string("/proc/uptime")
        .ok()
        .and_then(|text| text.split_whitespace().next().map(str::to_string))
        .and_then(|s| s.parse::<f64>().ok())
        .map(|secs| secs as u64)
        .unwrap_or(0)
}

/// `(MemTotal - MemAvailable) / MemTotal` from `/proc/meminfo`; a single
/// snapshot needs no delta, unlike CPU percent.
pub fn read_mem_used_pct() -> f32 {
    let Some(text) = std::fs::read_to_string("/proc/meminfo").ok() else { return 0.0 };
    let mut total_kb = None;
    let mut avail_kb = None;
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            total_kb = parse_kb(rest);
        } else if let Some(rest) = line.strip_prefix("MemAvailable:") {
            avail_kb = parse_kb(rest);
        }
    }
    match (total_kb, avail_kb) {
        (Some(total), Some(avail)) if total > 0.0 => {
            (((total - avail) / total) * 100.0).clamp(0.0, 100.0)
        }
        _ => 0.0,
    }
}

fn parse_kb(rest: &str) -> Option<f64> {
    rest.split_whitespace().next()?.parse::<f64>().ok()
}

/// Delta-based CPU percent from `/proc/stat`'s aggregate `cpu` line. A
/// single read can't yield a percentage; callers keep one instance across
/// sampler ticks.
#[derive(Default)]
pub struct CpuSampler {
    prev: Mutex<Option<CpuTimes>>,
}

#[derive(Debug, Clone, Copy)]
struct CpuTimes {
    idle: u64,
    total: u64,
}

impl CpuSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&self) -> f32 {
        let Some(current) = read_cpu_times() else { return 0.0 };
        let mut prev = self.prev.lock();
        let pct = match *prev {
            Some(before) => {
                let total_delta = current.total.saturating_sub(before.total);
                let idle_delta = current.idle.saturating_sub(before.idle);
                if total_delta == 0 {
                    0.0
                } else {
                    ((total_delta - idle_delta) as f32 / total_delta as f32) * 100.0
                }
            }
            None => 0.0,
        };
        *prev = Some(current);
        pct
    }
}

fn read_cpu_times() -> Option<CpuTimes> {
    let text = std::fs::read_to_string("/proc/stat").ok()?;
    let line = text.lines().find(|l| l.starts_with("cpu "))?;
    let fields: Vec<u64> = line.split_whitespace().skip(1).filter_map(|f| f.parse().ok()).collect();
    let idle = *fields.get(3)?;
    let total = fields.iter().sum();
    Some(CpuTimes { idle, total })
}
