use tap_core::error::{HasKind, Kind};
use thiserror::Error;

use crate::subprocess::ExecError;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("external command failed: {0}")]
    Command(#[from] ExecError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse interface list: {0}")]
    InterfaceParse(#[from] serde_json::Error),
    #[error("{0}")]
    PathTraversal(#[from] crate::path_guard::PathGuardError),
    #[error("unknown service: {0}")]
    UnknownService(String),
    #[error("{description} exited with status {code:?}: {stderr}")]
    ScriptFailed { description: String, code: Option<i32>, stderr: String },
}

impl HasKind for HostError {
    fn kind(&self) -> Kind {
        match self {
            HostError::Command(_) | HostError::ScriptFailed { .. } => Kind::ExternalCommand,
            HostError::Io(_) | HostError::InterfaceParse(_) => Kind::IoFailure,
            HostError::PathTraversal(_) => Kind::Forbidden,
            HostError::UnknownService(_) => Kind::NotFound,
        }
    }
}
