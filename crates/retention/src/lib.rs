//! tap-retention: age/disk-pressure sweeps and event-log rotation (spec C6).

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod diskspace;
pub mod engine;
pub mod error;
pub mod rotate;
pub mod sweep;

pub use diskspace::{df_fallback_free_pct, free_pct, FreeSpaceSource, StatvfsSource};
pub use engine::{spawn_periodic, EngineHandle, RetentionEngine, RetentionSettings, DEFAULT_INTERVAL};
pub use error::RetentionError;
pub use rotate::{rotate_if_oversized, DEFAULT_ROTATE_THRESHOLD_BYTES};
pub use sweep::{sweep, DeletedArtifact, SweepOutcome};
