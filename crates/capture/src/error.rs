use tap_core::error::{HasKind, Kind};
use tap_hostctl::{HostError, PathGuardError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    PathTraversal(#[from] PathGuardError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid byte range: {0}")]
    RangeInvalid(String),
    #[error("capture artifact not found: {0}")]
    NotFound(String),
}

impl HasKind for CaptureError {
    fn kind(&self) -> Kind {
        match self {
            CaptureError::Host(e) => e.kind(),
            CaptureError::PathTraversal(_) => Kind::Forbidden,
            CaptureError::Io(_) => Kind::IoFailure,
            CaptureError::RangeInvalid(_) => Kind::ValidationError,
            CaptureError::NotFound(_) => Kind::NotFound,
        }
    }
}
