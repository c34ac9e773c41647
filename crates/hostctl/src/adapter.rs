//! Host adapter (C2, spec §4.2) — the single choke point for every
//! operation with OS side-effects.

use async_trait::async_trait;
use tap_core::service::{ServiceAction, ServiceState, ServiceStatus};
use tap_core::Interface;

use crate::error::HostError;
use crate::interfaces;
use crate::subprocess::{run_with_timeout, CommandOutput, ScriptCommand};
use crate::timeouts;

#[async_trait]
pub trait HostAdapter: Send + Sync {
    async fn service_status(&self, name: &str) -> Result<ServiceStatus, HostError>;
    async fn service_action(
        &self,
        name: &str,
        action: ServiceAction,
    ) -> Result<ServiceStatus, HostError>;
    async fn list_interfaces(&self) -> Result<Vec<Interface>, HostError>;
    async fn run_script(&self, cmd: ScriptCommand, description: &str) -> Result<CommandOutput, HostError>;
    /// Detach before issuing; admin-gating happens at the API layer.
    async fn reboot(&self) -> Result<(), HostError>;
}

/// Real adapter: `systemctl` for services, `ip -json addr show` +
/// `/sys/class/net` for interfaces.
pub struct SystemHostAdapter;

impl Default for SystemHostAdapter {
    fn default() -> Self {
        Self
    }
}

#[async_trait]
impl HostAdapter for SystemHostAdapter {
    async fn service_status(&self, name: &str) -> Result<ServiceStatus, HostError> {
        let cmd = ScriptCommand::new("systemctl", timeouts::STATUS_TIMEOUT)
            .args(["show", name, "--property=ActiveState,StateChangeTimestamp", "--value"]);
        let output = run_with_timeout(&cmd, "systemctl show").await?;
        let mut lines = output.stdout.lines();
        let state = match lines.next().unwrap_or("").trim() {
            "active" => ServiceState::Active,
            "inactive" => ServiceState::Inactive,
            "failed" => ServiceState::Failed,
            _ => ServiceState::Unknown,
        };
        Ok(ServiceStatus { name: name.to_string(), state, since_ms: None })
    }

    async fn service_action(
        &self,
        name: &str,
        action: ServiceAction,
    ) -> Result<ServiceStatus, HostError> {
        let verb = match action {
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Restart => "restart",
            ServiceAction::Reload => "reload",
        };
        let cmd = ScriptCommand::new("systemctl", timeouts::START_STOP_TIMEOUT).args([verb, name]);
        run_with_timeout(&cmd, "systemctl action").await?;
        self.service_status(name).await
    }

    async fn list_interfaces(&self) -> Result<Vec<Interface>, HostError> {
        let cmd = ScriptCommand::new("ip", timeouts::STATUS_TIMEOUT).args(["-json", "addr", "show"]);
        let output = run_with_timeout(&cmd, "ip addr show").await?;
        let mut ifaces = interfaces::parse_ip_addr_json(&output.stdout)?;
        for iface in &mut ifaces {
            let (rx, tx) = interfaces::read_byte_counters(&iface.name);
            iface.rx_bytes = rx;
            iface.tx_bytes = tx;
        }
        Ok(ifaces)
    }

    async fn run_script(&self, cmd: ScriptCommand, description: &str) -> Result<CommandOutput, HostError> {
        Ok(run_with_timeout(&cmd, description).await?)
    }

    async fn reboot(&self) -> Result<(), HostError> {
        let cmd = ScriptCommand::new("systemctl", timeouts::START_STOP_TIMEOUT).arg("reboot");
        // Fire-and-forget: the caller (API layer) has already acknowledged
        // the request by the time the host actually goes down.
        tokio::spawn(async move {
            let _ = run_with_timeout(&cmd, "systemctl reboot").await;
        });
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
