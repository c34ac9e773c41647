//! Call-recording fake adapter for tests (grounded on groblegark's
//! `FakeAgentAdapter`).

use async_trait::async_trait;
use parking_lot::Mutex;
use tap_core::service::{ServiceAction, ServiceState, ServiceStatus};
use tap_core::Interface;

use crate::adapter::HostAdapter;
use crate::error::HostError;
use crate::subprocess::{CommandOutput, ScriptCommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    ServiceStatus(String),
    ServiceAction(String, ServiceAction),
    ListInterfaces,
    RunScript(String),
    Reboot,
}

/// An in-memory [`HostAdapter`] for unit tests: no subprocesses, no
/// filesystem, every response scripted ahead of time.
#[derive(Default)]
pub struct FakeHostAdapter {
    calls: Mutex<Vec<RecordedCall>>,
    statuses: Mutex<std::collections::HashMap<String, ServiceStatus>>,
    interfaces: Mutex<Vec<Interface>>,
    fail_next_action: Mutex<bool>,
    /// Remaining scripted failures per program, decremented on use.
    fail_next_script: Mutex<std::collections::HashMap<String, u32>>,
}

impl FakeHostAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn set_status(&self, name: &str, state: ServiceState) {
        self.statuses.lock().insert(
            name.to_string(),
            ServiceStatus { name: name.to_string(), state, since_ms: None },
        );
    }

    pub fn set_interfaces(&self, ifaces: Vec<Interface>) {
        *self.interfaces.lock() = ifaces;
    }

    pub fn fail_next_action(&self) {
        *self.fail_next_action.lock() = true;
    }

    /// The next `run_script` invocation of `program` returns a nonzero exit.
    /// Calling this N times queues N consecutive failures.
    pub fn fail_next_script(&self, program: &str) {
        *self.fail_next_script.lock().entry(program.to_string()).or_insert(0) += 1;
    }
}

#[async_trait]
impl HostAdapter for FakeHostAdapter {
    async fn service_status(&self, name: &str) -> Result<ServiceStatus, HostError> {
        self.calls.lock().push(RecordedCall::ServiceStatus(name.to_string()));
        Ok(self.statuses.lock().get(name).cloned().unwrap_or_else(|| ServiceStatus {
            name: name.to_string(),
            state: ServiceState::Unknown,
            since_ms: None,
        }))
    }

    async fn service_action(
        &self,
        name: &str,
        action: ServiceAction,
    ) -> Result<ServiceStatus, HostError> {
        self.calls.lock().push(RecordedCall::ServiceAction(name.to_string(), action.clone()));
        if std::mem::take(&mut *self.fail_next_action.lock()) {
            return Err(HostError::UnknownService(name.to_string()));
        }
        let new_state = match action {
            ServiceAction::Start | ServiceAction::Restart | ServiceAction::Reload => ServiceState::Active,
            ServiceAction::Stop => ServiceState::Inactive,
        };
        self.set_status(name, new_state);
        self.service_status(name).await
    }

    async fn list_interfaces(&self) -> Result<Vec<Interface>, HostError> {
        self.calls.lock().push(RecordedCall::ListInterfaces);
        Ok(self.interfaces.lock().clone())
    }

    async fn run_script(&self, cmd: ScriptCommand, _description: &str) -> Result<CommandOutput, HostError> {
        self.calls.lock().push(RecordedCall::RunScript(cmd.program.clone()));
        let mut pending = self.fail_next_script.lock();
        if let Some(count) = pending.get_mut(&cmd.program) {
            if *count > 0 {
                *count -= 1;
                return Ok(CommandOutput {
                    status_code: Some(1),
                    stdout: String::new(),
                    stderr: format!("{} failed", cmd.program),
                });
            }
        }
        Ok(CommandOutput { status_code: Some(0), stdout: String::new(), stderr: String::new() })
    }

    async fn reboot(&self) -> Result<(), HostError> {
        self.calls.lock().push(RecordedCall::Reboot);
        Ok(())
    }
}
