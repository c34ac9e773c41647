use tap_core::error::{HasKind, Kind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TailError {
    #[error("source unavailable: {0}")]
    SourceUnavailable(#[source] std::io::Error),
    #[error("io error: {0}")]
    Io(#[source] std::io::Error),
}

impl HasKind for TailError {
    fn kind(&self) -> Kind {
        match self {
            TailError::SourceUnavailable(_) => Kind::SourceUnavailable,
            TailError::Io(_) => Kind::IoFailure,
        }
    }
}

/// Classify an I/O error per spec §4.3: permission errors are a source
/// availability problem, everything else is a plain I/O failure.
pub fn classify_io_error(err: std::io::Error) -> TailError {
    if err.kind() == std::io::ErrorKind::PermissionDenied {
        TailError::SourceUnavailable(err)
    } else {
        TailError::Io(err)
    }
}
