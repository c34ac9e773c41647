//! Explicit transition table for the SPAN↔bridge state machine (spec §4.7),
//! a hand-written function rather than a generic FSM crate.

use tap_core::{Mode, ModeState};

use crate::error::ModeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    BeginStopping,
    BeginReconfiguring,
    ReconfigureFailed,
    BeginStarting,
    Stabilized(Mode),
    RollbackFailed,
    ClearDegraded(Mode),
}

/// Advance `state` on `event`, or reject the combination outright.
pub fn next(state: ModeState, event: Event) -> Result<ModeState, ModeError> {
    use Event::*;
    use ModeState::*;

    match (state, event) {
        (StableSpan | StableBridge, BeginStopping) => Ok(Stopping),
        (Stopping, BeginReconfiguring) => Ok(Reconfiguring),
        (Reconfiguring, ReconfigureFailed) => Ok(RolledBack),
        (Reconfiguring, BeginStarting) => Ok(Starting),
        (Starting, Stabilized(mode)) => Ok(ModeState::stable_for(mode)),
        (RolledBack, Stabilized(mode)) => Ok(ModeState::stable_for(mode)),
        (RolledBack, RollbackFailed) => Ok(Degraded),
        (Degraded, ClearDegraded(mode)) => Ok(ModeState::stable_for(mode)),
        (from, event) => Err(ModeError::IllegalTransition { from, event }),
    }
}

#[cfg(test)]
#[path = "transitions_tests.rs"]
mod tests;
