use tap_core::error::{HasKind, Kind};
use tap_hostctl::HostError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetentionError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Capture(#[from] tap_capture::CaptureError),
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("free-disk query failed: {0}")]
    DiskSpace(String),
}

impl HasKind for RetentionError {
    fn kind(&self) -> Kind {
        match self {
            RetentionError::Io(_) => Kind::IoFailure,
            RetentionError::Capture(e) => e.kind(),
            RetentionError::Host(e) => e.kind(),
            RetentionError::DiskSpace(_) => Kind::SourceUnavailable,
        }
    }
}
