//! Service names and ordered stop/start helpers driven by the host adapter
//! (spec §4.7 steps 3 and 5).

use std::time::Duration;

use tap_core::config::ConfigData;
use tap_core::service::ServiceAction;
use tap_hostctl::HostAdapter;
use tracing::warn;

pub const CAPTURE_SERVICE: &str = "networktap-capture.service";
pub const SURICATA_SERVICE: &str = "suricata.service";
pub const ZEEK_SERVICE: &str = "zeek.service";
pub const WEB_SERVICE: &str = "networktap-web.service";

const STOP_TIMEOUT: Duration = Duration::from_secs(30);
const START_TIMEOUT: Duration = Duration::from_secs(30);

/// Stop capture, then Suricata, then Zeek (only the engines the config has
/// enabled), each under a hard 30 s deadline. A timeout or failure is
/// logged and treated as force-stopped; it never aborts the transition.
pub async fn stop_all(host: &dyn HostAdapter, config: &ConfigData) {
    stop_one(host, CAPTURE_SERVICE).await;
    if config.features.suricata_enabled {
        stop_one(host, SURICATA_SERVICE).await;
    }
    if config.features.zeek_enabled {
        stop_one(host, ZEEK_SERVICE).await;
    }
}

/// Restart the web service (self-restart; the API request has already been
/// acknowledged by the caller), then start the IDS engines and capture per
/// the new config's flags.
pub async fn start_all(host: &dyn HostAdapter, config: &ConfigData) {
    start_one(host, WEB_SERVICE, ServiceAction::Restart).await;
    if config.features.suricata_enabled {
        start_one(host, SURICATA_SERVICE, ServiceAction::Start).await;
    }
    if config.features.zeek_enabled {
        start_one(host, ZEEK_SERVICE, ServiceAction::Start).await;
    }
    start_one(host, CAPTURE_SERVICE, ServiceAction::Start).await;
}

async fn stop_one(host: &dyn HostAdapter, name: &str) {
    match tokio::time::timeout(STOP_TIMEOUT, host.service_action(name, ServiceAction::Stop)).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => warn!(service = name, error = %e, "stop failed, treating as force-stopped"),
        Err(_) => warn!(service = name, "stop timed out after 30s, treating as force-stopped"),
    }
}

async fn start_one(host: &dyn HostAdapter, name: &str, action: ServiceAction) {
    match tokio::time::timeout(START_TIMEOUT, host.service_action(name, action)).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => warn!(service = name, error = %e, "start failed"),
        Err(_) => warn!(service = name, "start timed out after 30s"),
    }
}

#[cfg(test)]
#[path = "services_tests.rs"]
mod tests;
