//! Router assembly: one `Router` per concern merged together, then the
//! middleware stack applied outside-in as `stamp_request_id -> TraceLayer ->
//! require_auth -> throttle_sensitive_endpoints -> handler` (spec §4.9).
//!
//! `axum::Router::layer` wraps outermost-last, so the build order below is
//! the mirror image of that request flow.

use std::sync::Arc;

use axum::http::Request;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::auth_middleware::require_auth;
use crate::request_id::RequestId;
use crate::routes::{alerts, capture, config, stats, system, updates_wifi, ws};
use crate::state::ApiState;
use crate::throttle::throttle_sensitive_endpoints;

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub fn build_router(state: Arc<ApiState>) -> Router {
    let system_routes = Router::new()
        .route("/system/status", get(system::status))
        .route("/system/interfaces", get(system::interfaces))
        .route("/system/service/{name}/{action}", post(system::service_action))
        .route("/system/reboot", post(system::reboot));

    let config_routes = Router::new()
        .route("/config", get(config::get_config).patch(config::patch_config))
        .route("/config/mode", get(config::get_mode).post(config::post_mode))
        .route("/config/mode/clear-degraded", post(config::clear_degraded));

    let capture_routes = Router::new()
        .route("/capture/status", get(capture::status))
        .route("/capture/start", post(capture::start))
        .route("/capture/stop", post(capture::stop))
        .route("/pcaps", get(capture::list_pcaps))
        .route("/pcaps/{name}", get(capture::download_pcap));

    let alerts_routes = Router::new()
        .route("/alerts", get(alerts::list_alerts))
        .route("/alerts/recent", get(alerts::recent_alias))
        .route("/zeek/logs/{type}", get(alerts::zeek_log));

    let stats_routes = Router::new()
        .route("/stats/dns/top", get(stats::dns_top))
        .route("/stats/dns/type", get(stats::dns_type))
        .route("/stats/protocol-distribution", get(stats::protocol_distribution))
        .route("/stats/services", get(stats::services))
        .route("/stats/top-talkers", get(stats::top_talkers))
        .route("/stats/connection-trends", get(stats::connection_trends));

    let updates_wifi_routes = Router::new()
        .route("/updates/start", post(updates_wifi::updates_start))
        .route("/updates/stop", post(updates_wifi::updates_stop))
        .route("/updates/status", get(updates_wifi::updates_status))
        .route("/wifi/start", post(updates_wifi::wifi_start))
        .route("/wifi/stop", post(updates_wifi::wifi_stop))
        .route("/wifi/status", get(updates_wifi::wifi_status));

    let ws_routes = Router::new().route("/ws/alerts", get(ws::ws_alerts));

    let health_route = Router::new().route("/health", get(health));

    let guarded = system_routes
        .merge(config_routes)
        .merge(capture_routes)
        .merge(alerts_routes)
        .merge(stats_routes)
        .merge(updates_wifi_routes)
        .merge(ws_routes)
        .layer(axum::middleware::from_fn_with_state(state.clone(), throttle_sensitive_endpoints))
        .layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));

    health_route
        .merge(guarded)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
                let request_id = req.extensions().get::<RequestId>().map(|id| id.0.to_string()).unwrap_or_default();
                tracing::info_span!("http_request", method = %req.method(), path = %req.uri().path(), request_id)
            }),
        )
        .layer(axum::middleware::from_fn(crate::request_id::stamp_request_id))
        .with_state(state)
}
