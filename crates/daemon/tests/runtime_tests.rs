//! End-to-end coverage for the pieces `tap-api`'s own tests can't reach:
//! real `Runtime::start`/`shutdown` wiring against an on-disk config file
//! (spec S3/S5-adjacent, exercised through the real component graph rather
//! than hand-built test doubles).

use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tap_daemon::Runtime;
use tower::ServiceExt;

fn write_config(dir: &std::path::Path) -> std::path::PathBuf {
    let admin_hash = tap_auth::hash_password("admin-pass", "admin-salt");
    let path = dir.join("networktap.conf");
    std::fs::write(
        &path,
        format!(
            "MODE=span\n\
             NIC1=eth0\n\
             NIC2=eth1\n\
             MGMT_IP=dhcp\n\
             WEB_PORT=8443\n\
             WEB_USER=admin\n\
             WEB_PASS_HASH={admin_hash}\n\
             WEB_PASS_SALT=admin-salt\n\
             CAPTURE_DIR={dir}\n\
             CAPTURE_ROTATE_SECONDS=3600\n\
             CAPTURE_FILE_LIMIT=48\n\
             CAPTURE_SNAPLEN=65535\n\
             RETENTION_DAYS=7\n\
             MIN_FREE_DISK_PCT=1\n\
             SURICATA_ENABLED=false\n\
             ZEEK_ENABLED=false\n",
            dir = dir.display(),
        ),
    )
    .unwrap();
    path
}

#[tokio::test]
async fn runtime_starts_serves_and_shuts_down_cleanly() {
    let tmp = tempfile::tempdir().unwrap();
    let config_path = write_config(tmp.path());

    let runtime = Runtime::start(config_path).await.unwrap();
    assert_eq!(runtime.api_state.config.get().mode.as_str(), "span");

    let router = tap_api::build_router(runtime.api_state.clone());
    let auth = format!("Basic {}", BASE64.encode("admin:admin-pass"));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/system/status")
                .header("authorization", auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    runtime.shutdown().await;
}

#[tokio::test]
async fn runtime_start_fails_on_invalid_config() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("broken.conf");
    std::fs::write(&path, "MODE=not-a-real-mode\n").unwrap();

    let result = Runtime::start(path).await;
    assert!(result.is_err());
}
