use std::sync::Arc;

use tap_core::AlertEvent;

/// What a subscriber actually receives: either a normalized alert or an
/// in-band notice that the bus had to drop messages for this subscriber
/// (spec §4.4).
#[derive(Debug, Clone)]
pub enum BusNotice {
    Alert(Arc<AlertEvent>),
    Lagging { dropped_since_last: u64 },
}
