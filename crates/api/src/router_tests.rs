use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tap_capture::CaptureSupervisor;
use tap_config::ConfigStore;
use tap_eventbus::EventBus;
use tap_hostctl::FakeHostAdapter;
use tap_modectl::ModeController;
use tap_retention::{RetentionEngine, RetentionSettings};
use tap_tail::TailCache;
use tower::ServiceExt;

use crate::router::build_router;
use crate::state::ApiState;
use crate::stats_history::StatsHistory;

fn write_config(dir: &std::path::Path, admin_pass: &str, viewer_pass: &str) -> std::path::PathBuf {
    let admin_hash = tap_auth::hash_password(admin_pass, "admin-salt");
    let viewer_hash = tap_auth::hash_password(viewer_pass, "viewer-salt");
    let path = dir.join("networktap.conf");
    std::fs::write(
        &path,
        format!(
            "MODE=span\n\
             NIC1=eth0\n\
             NIC2=eth1\n\
             WEB_PORT=8443\n\
             WEB_USER=admin\n\
             WEB_PASS_HASH={admin_hash}\n\
             WEB_PASS_SALT=admin-salt\n\
             WEB_VIEWER_USER=viewer\n\
             WEB_VIEWER_PASS_HASH={viewer_hash}\n\
             WEB_VIEWER_PASS_SALT=viewer-salt\n\
             CAPTURE_DIR={dir}\n\
             CAPTURE_ROTATE_SECONDS=3600\n\
             CAPTURE_FILE_LIMIT=48\n\
             CAPTURE_SNAPLEN=65535\n\
             RETENTION_DAYS=7\n\
             MIN_FREE_DISK_PCT=20\n",
            dir = dir.display(),
        ),
    )
    .unwrap();
    path
}

fn test_app(tmp: &tempfile::TempDir) -> axum::Router {
    let config_path = write_config(tmp.path(), "admin-pass", "viewer-pass");
    let config = Arc::new(ConfigStore::load(config_path).unwrap());
    let host: Arc<dyn tap_hostctl::HostAdapter> = Arc::new(FakeHostAdapter::new());
    let mode = Arc::new(ModeController::new(host.clone(), config.clone()));
    let capture = Arc::new(CaptureSupervisor::new(host.clone(), tmp.path().to_path_buf(), "networktap-capture"));
    let bus = EventBus::new();
    let tail_cache = Arc::new(TailCache::new());
    let retention = Arc::new(RetentionEngine::new(
        host.clone(),
        RetentionSettings::new(tmp.path().to_path_buf(), 7, 20, "networktap-capture"),
    ));
    let stats_history = Arc::new(StatsHistory::new());

    let state = Arc::new(ApiState::new(config, host, mode, capture, bus, tail_cache, retention, stats_history, 0));
    build_router(state)
}

fn basic_auth(user: &str, pass: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{user}:{pass}")))
}

#[tokio::test]
async fn health_requires_no_auth() {
    let tmp = tempfile::tempdir().unwrap();
    let app = test_app(&tmp);
    let response = app.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn system_status_without_credentials_is_unauthorized() {
    let tmp = tempfile::tempdir().unwrap();
    let app = test_app(&tmp);
    let response =
        app.oneshot(Request::builder().uri("/system/status").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn system_status_with_valid_admin_credentials_succeeds() {
    let tmp = tempfile::tempdir().unwrap();
    let app = test_app(&tmp);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/system/status")
                .header("authorization", basic_auth("admin", "admin-pass"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn system_status_with_valid_viewer_credentials_succeeds() {
    let tmp = tempfile::tempdir().unwrap();
    let app = test_app(&tmp);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/system/status")
                .header("authorization", basic_auth("viewer", "viewer-pass"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn capture_start_as_viewer_is_forbidden() {
    let tmp = tempfile::tempdir().unwrap();
    let app = test_app(&tmp);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/capture/start")
                .header("authorization", basic_auth("viewer", "viewer-pass"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn capture_start_as_admin_succeeds() {
    let tmp = tempfile::tempdir().unwrap();
    let app = test_app(&tmp);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/capture/start")
                .header("authorization", basic_auth("admin", "admin-pass"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn reboot_without_confirm_header_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let app = test_app(&tmp);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/system/reboot")
                .header("authorization", basic_auth("admin", "admin-pass"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reboot_rate_limit_rejects_the_second_call_within_the_window() {
    let tmp = tempfile::tempdir().unwrap();
    let app = test_app(&tmp);

    let request = || {
        Request::builder()
            .method("POST")
            .uri("/system/reboot")
            .header("authorization", basic_auth("admin", "admin-pass"))
            .header("x-confirm-reboot", "yes")
            .body(Body::empty())
            .unwrap()
    };

    let first = app.clone().oneshot(request()).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(request()).await.unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}
