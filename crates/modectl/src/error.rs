use tap_core::error::{HasKind, Kind};
use tap_core::{Mode, ModeState};
use tap_hostctl::HostError;
use thiserror::Error;

use crate::transitions::Event;

#[derive(Debug, Error)]
pub enum ModeError {
    #[error("a mode transition is already in progress")]
    ModeBusy,
    #[error("mode controller is degraded; clear it before retrying")]
    Degraded,
    #[error("switch to {to} failed at stage {stage}; rolled back to {from}")]
    RolledBack { from: &'static str, to: &'static str, stage: &'static str, #[source] source: HostError },
    #[error("rollback after failed switch to {to} also failed; controller is now degraded")]
    RollbackFailed { to: &'static str, #[source] source: HostError },
    #[error("illegal mode transition from {from:?} on {event:?}")]
    IllegalTransition { from: ModeState, event: Event },
    #[error(transparent)]
    Host(#[from] HostError),
}

impl ModeError {
    pub(crate) fn rolled_back(from: Mode, to: Mode, stage: &'static str, source: HostError) -> Self {
        ModeError::RolledBack { from: from.as_str(), to: to.as_str(), stage, source }
    }

    pub(crate) fn rollback_failed(to: Mode, source: HostError) -> Self {
        ModeError::RollbackFailed { to: to.as_str(), source }
    }
}

impl HasKind for ModeError {
    fn kind(&self) -> Kind {
        match self {
            ModeError::ModeBusy => Kind::Conflict,
            ModeError::Degraded => Kind::Conflict,
            ModeError::RolledBack { .. } => Kind::ExternalCommand,
            ModeError::RollbackFailed { .. } => Kind::ExternalCommand,
            ModeError::IllegalTransition { .. } => Kind::Internal,
            ModeError::Host(e) => e.kind(),
        }
    }
}
