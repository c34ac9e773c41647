//! Capture artifact identity (spec §3). Owned by the retention engine,
//! created by the external capture tool.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureArtifact {
    /// Absolute path; identity of the artifact.
    pub path: PathBuf,
    pub size: u64,
    pub mtime_ms: u64,
    /// Rotation generation, parsed from the `capture_YYYYMMDD_HHMMSS` name
    /// ordering or assigned sequentially when names don't sort.
    pub generation: u64,
}
