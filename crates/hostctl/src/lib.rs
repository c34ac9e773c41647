//! tap-hostctl: the host adapter (spec C2) — the single choke point for
//! every operation with OS side-effects (subprocess execution, service
//! control, interface enumeration, reboot).

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapter;
pub mod error;
pub mod interfaces;
pub mod path_guard;
pub mod subprocess;
pub mod timeouts;

pub use adapter::{HostAdapter, SystemHostAdapter};
pub use error::HostError;
pub use path_guard::{resolve_under_root, PathGuardError};
pub use subprocess::{run_with_timeout, CommandOutput, ExecError, ScriptCommand};

#[cfg(any(test, feature = "test-support"))]
pub use adapter::fake::{FakeHostAdapter, RecordedCall};
