use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tap_core::{AlertEvent, Source};

pub const RING_CAPACITY: usize = 256;

/// Per-source ring buffers for late-subscriber replay (spec §4.4). Oldest
/// event is at the front; `recent()` returns oldest-to-newest order.
#[derive(Default)]
pub struct EventRing {
    lanes: Mutex<HashMap<Source, VecDeque<Arc<AlertEvent>>>>,
}

impl EventRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: &Arc<AlertEvent>) {
        let mut lanes = self.lanes.lock();
        let lane = lanes.entry(event.source).or_default();
        if lane.len() >= RING_CAPACITY {
            lane.pop_front();
        }
        lane.push_back(event.clone());
    }

    /// Most recent `limit` events for `source`, oldest-first (most-recent-last).
    pub fn recent(&self, source: Source, limit: usize) -> Vec<Arc<AlertEvent>> {
        let lanes = self.lanes.lock();
        let Some(lane) = lanes.get(&source) else { return Vec::new() };
        let skip = lane.len().saturating_sub(limit);
        lane.iter().skip(skip).cloned().collect()
    }
}

#[cfg(test)]
#[path = "ring_tests.rs"]
mod tests;
