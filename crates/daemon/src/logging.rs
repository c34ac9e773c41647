//! Tracing setup (spec §6's `--log-level` flag). Unlike a user-spawned CLI
//! daemon, `networktapd` runs under a service manager that already captures
//! stdout, so logs go to a non-blocking stdout writer rather than a file.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `RUST_LOG` overrides `--log-level` when set, matching the rest of the
/// ecosystem's env-filter convention.
pub fn setup_logging(log_level: &str) -> WorkerGuard {
    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();

    guard
}
