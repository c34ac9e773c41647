//! Mode transition state machine states (spec §3, §4.7).

use serde::{Deserialize, Serialize};

use crate::config::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeState {
    StableSpan,
    StableBridge,
    Stopping,
    Reconfiguring,
    Starting,
    RolledBack,
    /// Terminal failure state reached when rollback itself fails
    /// (spec Open Question, resolved in DESIGN.md: daemon is authoritative).
    /// No further `switch` is accepted until an operator clears it.
    Degraded,
}

impl ModeState {
    pub fn stable_for(mode: Mode) -> Self {
        match mode {
            Mode::Span => ModeState::StableSpan,
            Mode::Bridge => ModeState::StableBridge,
        }
    }

    pub fn is_stable(self) -> bool {
        matches!(self, ModeState::StableSpan | ModeState::StableBridge)
    }

    pub fn stable_mode(self) -> Option<Mode> {
        match self {
            ModeState::StableSpan => Some(Mode::Span),
            ModeState::StableBridge => Some(Mode::Bridge),
            _ => None,
        }
    }
}
