//! The mode controller (C7, spec §4.7): the single place that drives an
//! atomic SPAN↔bridge transition across capture, IDS engines, firewall and
//! interface configuration.

use std::sync::Arc;
use std::time::Duration;

use tap_config::ConfigStore;
use tap_core::{Mode, ModeState};
use tap_hostctl::{HostAdapter, ScriptCommand};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::error::ModeError;
use crate::services;
use crate::transitions::{next, Event};

const SWITCH_MODE_SCRIPT_TIMEOUT: Duration = Duration::from_secs(60);

/// Invoked after a successful reconfiguration so the daemon can re-resolve
/// anything derived from paths/interfaces in the new config (spec §4.7 step
/// 6: "invalidate C1's computed interface derivation and C3's tracked
/// paths"). A no-op hook is fine when nothing needs re-resolving.
pub trait PathInvalidationHook: Send + Sync {
    fn on_mode_changed(&self, config: &tap_core::config::ConfigData);
}

pub struct NoopInvalidation;

impl PathInvalidationHook for NoopInvalidation {
    fn on_mode_changed(&self, _config: &tap_core::config::ConfigData) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchOutcome {
    pub from: Mode,
    pub to: Mode,
    pub stages_completed: Vec<&'static str>,
}

impl SwitchOutcome {
    fn no_op(mode: Mode) -> Self {
        Self { from: mode, to: mode, stages_completed: vec!["stable"] }
    }
}

pub struct ModeController {
    host: Arc<dyn HostAdapter>,
    config: Arc<ConfigStore>,
    invalidation: Arc<dyn PathInvalidationHook>,
    state: Mutex<ModeState>,
}

impl ModeController {
    pub fn new(host: Arc<dyn HostAdapter>, config: Arc<ConfigStore>) -> Self {
        let initial = ModeState::stable_for(config.get().mode);
        Self { host, config, invalidation: Arc::new(NoopInvalidation), state: Mutex::new(initial) }
    }

    pub fn with_invalidation_hook(mut self, hook: Arc<dyn PathInvalidationHook>) -> Self {
        self.invalidation = hook;
        self
    }

    /// Current machine state (always readable; spec §4.7 invariant "reads
    /// remain available" during a transition).
    pub async fn status(&self) -> ModeState {
        *self.state.lock().await
    }

    /// Drive a full SPAN↔bridge transition. Holds the mode lock across the
    /// whole sequence, so a concurrent `switch` call fails fast with
    /// `ModeBusy` rather than queuing behind this one.
    pub async fn switch(&self, target: Mode) -> Result<SwitchOutcome, ModeError> {
        let mut state = self.state.try_lock().map_err(|_| ModeError::ModeBusy)?;

        if *state == ModeState::Degraded {
            return Err(ModeError::Degraded);
        }
        let Some(from) = state.stable_mode() else {
            return Err(ModeError::ModeBusy);
        };
        if from == target {
            return Ok(SwitchOutcome::no_op(target));
        }

        let mut stages = Vec::new();

        *state = next(*state, Event::BeginStopping)?;
        services::stop_all(self.host.as_ref(), &self.config.get()).await;
        stages.push("stopping");

        *state = next(*state, Event::BeginReconfiguring)?;
        if let Err(source) = self.reconfigure(target).await {
            warn!(from = from.as_str(), to = target.as_str(), error = %source, "reconfigure failed, attempting rollback");
            *state = next(*state, Event::ReconfigureFailed)?;

            match self.reconfigure(from).await {
                Ok(()) => {
                    *state = next(*state, Event::Stabilized(from))?;
                    error!(from = from.as_str(), to = target.as_str(), "switch rolled back to previous mode");
                    return Err(ModeError::rolled_back(from, target, "reconfiguring", source));
                }
                Err(rollback_source) => {
                    *state = next(*state, Event::RollbackFailed)?;
                    error!(
                        to = target.as_str(),
                        error = %rollback_source,
                        "rollback itself failed; mode controller is now degraded"
                    );
                    return Err(ModeError::rollback_failed(target, rollback_source));
                }
            }
        }
        stages.push("reconfiguring");
        self.invalidation.on_mode_changed(&self.config.get());

        *state = next(*state, Event::BeginStarting)?;
        services::start_all(self.host.as_ref(), &self.config.get()).await;
        stages.push("starting");

        *state = next(*state, Event::Stabilized(target))?;
        stages.push("stable");

        info!(from = from.as_str(), to = target.as_str(), "mode switch completed");
        Ok(SwitchOutcome { from, to: target, stages_completed: stages })
    }

    /// Persist `mode` via the config store, then invoke the host's
    /// `switch_mode` script (network + firewall reconfiguration).
    async fn reconfigure(&self, mode: Mode) -> Result<(), tap_hostctl::HostError> {
        self.config
            .set(|c| c.mode = mode)
            .map_err(|e| tap_hostctl::HostError::ScriptFailed {
                description: "persist mode".to_string(),
                code: None,
                stderr: e.to_string(),
            })?;

        let cmd = ScriptCommand::new("switch_mode", SWITCH_MODE_SCRIPT_TIMEOUT).arg(mode.as_str());
        let output = self.host.run_script(cmd, "switch_mode").await?;
        if !output.success() {
            return Err(tap_hostctl::HostError::ScriptFailed {
                description: "switch_mode".to_string(),
                code: output.status_code,
                stderr: output.stderr,
            });
        }
        Ok(())
    }

    /// Admin-only recovery: resume at `resume_mode` after an operator has
    /// confirmed the host is actually in that state (spec Open Question,
    /// resolved: the daemon never auto-clears `Degraded`).
    pub async fn clear_degraded(&self, resume_mode: Mode) -> Result<(), ModeError> {
        let mut state = self.state.try_lock().map_err(|_| ModeError::ModeBusy)?;
        *state = next(*state, Event::ClearDegraded(resume_mode))?;
        info!(mode = resume_mode.as_str(), "mode controller cleared out of degraded state");
        Ok(())
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
