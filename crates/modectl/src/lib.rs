//! tap-modectl: the mode controller (spec C7) — atomic SPAN↔bridge
//! transitions across capture, IDS engines, firewall and interface config.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod controller;
pub mod error;
pub mod services;
pub mod transitions;

pub use controller::{ModeController, NoopInvalidation, PathInvalidationHook, SwitchOutcome};
pub use error::ModeError;
pub use transitions::{next, Event};
