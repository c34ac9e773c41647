//! System concern: status, interfaces, service control, reboot (spec §4.9).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Extension;
use serde::Serialize;
use tap_auth::{require_role, Principal};
use tap_core::config::Role;
use tap_core::error::Kind;
use tap_core::service::{ServiceAction, ServiceStatus};
use tap_modectl::services;

use crate::error::{envelope, ApiError};
use crate::request_id::RequestId;
use crate::state::ApiState;
use crate::stats_history::StatsSample;

const CONFIRM_HEADER: &str = "x-confirm-reboot";

#[derive(Serialize)]
struct SystemStatus {
    cpu_pct: f32,
    mem_used_pct: f32,
    disk_free_pct: u8,
    uptime_s: u64,
    services: Vec<ServiceStatus>,
    sparkline: Vec<StatsSample>,
}

pub async fn status(
    State(state): State<Arc<ApiState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<axum::Json<serde_json::Value>, ApiError> {
    let config = state.config.get();
    let latest = state.stats_history.latest();

    let disk_free_pct = state
        .retention
        .free_pct()
        .await
        .map_err(|e| ApiError::from_err(e, request_id))?;

    let mut service_names = vec![services::CAPTURE_SERVICE, services::WEB_SERVICE];
    if config.features.suricata_enabled {
        service_names.push(services::SURICATA_SERVICE);
    }
    if config.features.zeek_enabled {
        service_names.push(services::ZEEK_SERVICE);
    }
    let mut service_statuses = Vec::with_capacity(service_names.len());
    for name in service_names {
        match state.host.service_status(name).await {
            Ok(status) => service_statuses.push(status),
            Err(e) => tracing::warn!(service = name, error = %e, "service status query failed"),
        }
    }

    let body = SystemStatus {
        cpu_pct: latest.map(|s| s.cpu_pct).unwrap_or(0.0),
        mem_used_pct: latest.map(|s| s.mem_used_pct).unwrap_or_else(crate::stats_history::read_mem_used_pct),
        disk_free_pct,
        uptime_s: crate::stats_history::read_uptime_seconds(),
        services: service_statuses,
        sparkline: state.stats_history.snapshot(),
    };
    Ok(envelope(body))
}

pub async fn interfaces(
    State(state): State<Arc<ApiState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Result<axum::Json<serde_json::Value>, ApiError> {
    let ifaces = state.host.list_interfaces().await.map_err(|e| ApiError::from_err(e, request_id))?;
    Ok(envelope(ifaces))
}

pub async fn service_action(
    State(state): State<Arc<ApiState>>,
    Extension(principal): Extension<Principal>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Path((name, action)): Path<(String, String)>,
) -> Result<axum::Json<serde_json::Value>, ApiError> {
    require_role(&principal, Role::Admin).map_err(|e| ApiError::from_err(e, request_id))?;

    let action = match action.as_str() {
        "start" => ServiceAction::Start,
        "stop" => ServiceAction::Stop,
        "restart" => ServiceAction::Restart,
        other => {
            return Err(ApiError::new(
                Kind::ValidationError,
                format!("unknown service action {other:?}, expected start|stop|restart"),
                request_id,
            ))
        }
    };

    let status = state
        .host
        .service_action(&name, action)
        .await
        .map_err(|e| ApiError::from_err(e, request_id))?;
    Ok(envelope(status))
}

pub async fn reboot(
    State(state): State<Arc<ApiState>>,
    Extension(principal): Extension<Principal>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    headers: HeaderMap,
) -> Result<axum::Json<serde_json::Value>, ApiError> {
    require_role(&principal, Role::Admin).map_err(|e| ApiError::from_err(e, request_id))?;

    let confirmed = headers.get(CONFIRM_HEADER).and_then(|v| v.to_str().ok()) == Some("yes");
    if !confirmed {
        return Err(ApiError::new(
            Kind::ValidationError,
            format!("reboot requires the {CONFIRM_HEADER}: yes header"),
            request_id,
        ));
    }

    state.host.reboot().await.map_err(|e| ApiError::from_err(e, request_id))?;
    Ok(envelope(serde_json::json!({ "rebooting": true })))
}
