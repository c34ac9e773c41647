//! tap-api: the REST + WebSocket surface over C1–C7 (spec C9).

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod auth_middleware;
pub mod error;
pub mod request_id;
mod router;
pub mod routes;
pub mod state;
pub mod stats_history;
mod throttle;

pub use router::build_router;
pub use state::ApiState;

#[cfg(test)]
#[path = "router_tests.rs"]
mod router_tests_mod;
