//! tap-eventbus: in-process fan-out from tail followers / capture
//! supervisor to REST and WebSocket consumers (spec C4).

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod bus;
mod filter;
mod notice;
mod ring;
mod subscriber;

pub use bus::EventBus;
pub use filter::EventFilter;
pub use notice::BusNotice;
pub use ring::RING_CAPACITY;
pub use subscriber::{Subscription, SUBSCRIBER_CAPACITY};
