//! tap-daemon: background runtime + binary entrypoint (spec C10).

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod cli;
pub mod env;
pub mod logging;
pub mod runtime;
pub mod sampler;

pub use runtime::{Runtime, RuntimeError};
