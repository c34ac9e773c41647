use super::*;
use std::fs;
use tap_core::service::ServiceState;
use tap_hostctl::FakeHostAdapter;
use tempfile::tempdir;

#[tokio::test]
async fn rotates_and_gzips_oversized_file_and_reloads_producer() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("eve.json");
    fs::write(&log_path, vec![b'x'; 100]).unwrap();

    let fake = FakeHostAdapter::new();
    fake.set_status("suricata.service", ServiceState::Active);

    let result = rotate_if_oversized(&log_path, 10, &fake, "suricata.service").await.unwrap();
    let gz_path = result.expect("file exceeds threshold, rotation expected");

    assert!(gz_path.to_string_lossy().ends_with(".gz"));
    assert!(gz_path.exists());
    assert!(!log_path.exists());

    let mut decoded = Vec::new();
    flate2::read::GzDecoder::new(fs::File::open(&gz_path).unwrap()).read_to_end(&mut decoded).unwrap();
    assert_eq!(decoded, vec![b'x'; 100]);

    let calls = fake.calls();
    assert!(calls.iter().any(|c| matches!(c, tap_hostctl::RecordedCall::ServiceAction(name, ServiceAction::Reload) if name == "suricata.service")));
}

#[tokio::test]
async fn leaves_file_alone_when_under_threshold() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("eve.json");
    fs::write(&log_path, vec![b'x'; 5]).unwrap();

    let fake = FakeHostAdapter::new();
    let result = rotate_if_oversized(&log_path, 1024, &fake, "suricata.service").await.unwrap();
    assert!(result.is_none());
    assert!(log_path.exists());
}

#[tokio::test]
async fn missing_file_is_not_an_error() {
    let fake = FakeHostAdapter::new();
    let result =
        rotate_if_oversized(Path::new("/nonexistent/eve.json"), 10, &fake, "suricata.service").await.unwrap();
    assert!(result.is_none());
}
