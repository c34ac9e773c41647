use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tap_core::{AlertEvent, Source};
use tokio::sync::{mpsc, Notify};
use tracing::warn;

use crate::filter::EventFilter;
use crate::notice::BusNotice;
use crate::ring::EventRing;
use crate::subscriber::{SubscriberEntry, Subscription, SUBSCRIBER_CAPACITY};

/// In-process fan-out bus (spec §4.4). Cheap to clone: internally an `Arc`.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

struct BusInner {
    ring: EventRing,
    subscribers: Mutex<Vec<SubscriberEntry>>,
    next_id: AtomicU64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                ring: EventRing::new(),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Append to the ring and fan out to matching subscribers. Never blocks
    /// on a slow subscriber.
    pub fn publish(&self, event: AlertEvent) {
        let event = Arc::new(event);
        self.inner.ring.push(&event);
        let subscribers = self.inner.subscribers.lock();
        for sub in subscribers.iter() {
            if sub.filter.matches(&event) {
                dispatch(sub, BusNotice::Alert(event.clone()));
            }
        }
    }

    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel(SUBSCRIBER_CAPACITY);
        let receiver = Arc::new(tokio::sync::Mutex::new(receiver));
        let notify = Arc::new(Notify::new());

        self.inner.subscribers.lock().push(SubscriberEntry {
            id,
            filter,
            sender,
            receiver: receiver.clone(),
            notify: notify.clone(),
            dropped_since_last: Arc::new(AtomicU64::new(0)),
            lagging_notified: Arc::new(AtomicBool::new(false)),
        });

        let inner = self.inner.clone();
        Subscription::new(id, receiver, notify, Arc::new(move |id| inner.remove_subscriber(id)))
    }

    /// Snapshot from the per-source ring, oldest-to-newest (most-recent-last).
    pub fn recent(&self, source: Source, limit: usize) -> Vec<Arc<AlertEvent>> {
        self.inner.ring.recent(source, limit)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }
}

impl BusInner {
    fn remove_subscriber(&self, id: u64) {
        self.subscribers.lock().retain(|s| s.id != id);
    }
}

fn dispatch(sub: &SubscriberEntry, notice: BusNotice) {
    match sub.sender.try_send(notice) {
        Ok(()) => {
            sub.lagging_notified.store(false, Ordering::Relaxed);
            sub.notify.notify_one();
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {}
        Err(mpsc::error::TrySendError::Full(notice)) => {
            evict_oldest(sub);
            sub.dropped_since_last.fetch_add(1, Ordering::Relaxed);
            let _ = sub.sender.try_send(notice);
            if !sub.lagging_notified.swap(true, Ordering::AcqRel) {
                let dropped = sub.dropped_since_last.swap(0, Ordering::Relaxed);
                evict_oldest(sub);
                let _ = sub.sender.try_send(BusNotice::Lagging { dropped_since_last: dropped });
                warn!(subscriber = sub.id, dropped, "subscriber lagging, dropped oldest queued events");
            }
            sub.notify.notify_one();
        }
    }
}

fn evict_oldest(sub: &SubscriberEntry) {
    if let Ok(mut rx) = sub.receiver.try_lock() {
        let _ = rx.try_recv();
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
