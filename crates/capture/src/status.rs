use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tap_core::CaptureArtifact;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureStatus {
    pub running: bool,
    pub since_ms: Option<u64>,
    pub active_file: Option<PathBuf>,
    pub recent_files: Vec<CaptureArtifact>,
}
