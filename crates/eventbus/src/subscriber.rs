use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex, Notify};

use crate::filter::EventFilter;
use crate::notice::BusNotice;

pub const SUBSCRIBER_CAPACITY: usize = 256;

pub(crate) struct SubscriberEntry {
    pub(crate) id: u64,
    pub(crate) filter: EventFilter,
    pub(crate) sender: mpsc::Sender<BusNotice>,
    pub(crate) receiver: Arc<Mutex<mpsc::Receiver<BusNotice>>>,
    pub(crate) notify: Arc<Notify>,
    pub(crate) dropped_since_last: Arc<AtomicU64>,
    pub(crate) lagging_notified: Arc<AtomicBool>,
}

/// A live subscription returned by [`crate::EventBus::subscribe`]. Closing
/// is idempotent, via either [`Subscription::close`] or drop.
pub struct Subscription {
    id: u64,
    receiver: Arc<Mutex<mpsc::Receiver<BusNotice>>>,
    notify: Arc<Notify>,
    remove: Arc<dyn Fn(u64) + Send + Sync>,
    closed: AtomicBool,
}

impl Subscription {
    pub(crate) fn new(
        id: u64,
        receiver: Arc<Mutex<mpsc::Receiver<BusNotice>>>,
        notify: Arc<Notify>,
        remove: Arc<dyn Fn(u64) + Send + Sync>,
    ) -> Self {
        Self { id, receiver, notify, remove, closed: AtomicBool::new(false) }
    }

    pub async fn recv(&self) -> Option<BusNotice> {
        loop {
            if self.closed.load(Ordering::Acquire) {
                return None;
            }
            {
                let mut rx = self.receiver.lock().await;
                match rx.try_recv() {
                    Ok(item) => return Some(item),
                    Err(mpsc::error::TryRecvError::Empty) => {}
                    Err(mpsc::error::TryRecvError::Disconnected) => return None,
                }
            }
            self.notify.notified().await;
        }
    }

    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            (self.remove)(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}
