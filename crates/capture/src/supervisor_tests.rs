use super::*;
use std::fs;
use tap_core::service::ServiceState;
use tap_hostctl::FakeHostAdapter;
use tempfile::tempdir;
use tokio::io::AsyncReadExt;

fn supervisor(dir: &Path, fake: Arc<FakeHostAdapter>) -> CaptureSupervisor {
    CaptureSupervisor::new(fake, dir.to_path_buf(), "tap-capture.service")
}

#[tokio::test]
async fn status_reflects_running_service_and_active_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("capture_001.pcap"), b"data").unwrap();
    let fake = Arc::new(FakeHostAdapter::new());
    fake.set_status("tap-capture.service", ServiceState::Active);

    let sup = supervisor(dir.path(), fake);
    let status = sup.status().await.unwrap();
    assert!(status.running);
    assert!(status.active_file.is_some());
    assert_eq!(status.recent_files.len(), 1);
}

#[tokio::test]
async fn status_is_cached_within_ttl() {
    let dir = tempdir().unwrap();
    let fake = Arc::new(FakeHostAdapter::new());
    let sup = supervisor(dir.path(), fake.clone());

    sup.status().await.unwrap();
    sup.status().await.unwrap();
    let calls = fake.calls().into_iter().filter(|c| matches!(c, tap_hostctl::RecordedCall::ServiceStatus(_))).count();
    assert_eq!(calls, 1, "second call within TTL must not re-query the host adapter");
}

#[tokio::test]
async fn start_invalidates_cache_and_reflects_new_state() {
    let dir = tempdir().unwrap();
    let fake = Arc::new(FakeHostAdapter::new());
    fake.set_status("tap-capture.service", ServiceState::Inactive);
    let sup = supervisor(dir.path(), fake);

    let before = sup.status().await.unwrap();
    assert!(!before.running);

    let after = sup.start().await.unwrap();
    assert!(after.running);
}

#[tokio::test]
async fn list_paginates_and_filters() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("capture_a.pcap"), b"1").unwrap();
    fs::write(dir.path().join("capture_b.pcap"), b"22").unwrap();
    let fake = Arc::new(FakeHostAdapter::new());
    let sup = supervisor(dir.path(), fake);

    let all = sup.list(0, 10, None).await.unwrap();
    assert_eq!(all.len(), 2);
    let filtered = sup.list(0, 10, Some("_a")).await.unwrap();
    assert_eq!(filtered.len(), 1);
}

#[tokio::test]
async fn open_rejects_path_escaping_capture_dir() {
    let dir = tempdir().unwrap();
    let outside = tempdir().unwrap();
    fs::write(outside.path().join("secret.pcap"), b"data").unwrap();
    let fake = Arc::new(FakeHostAdapter::new());
    let sup = supervisor(dir.path(), fake);

    let result = sup.open(outside.path().join("secret.pcap").to_str().unwrap(), None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn open_honors_byte_range() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("capture_a.pcap"), b"0123456789").unwrap();
    let fake = Arc::new(FakeHostAdapter::new());
    let sup = supervisor(dir.path(), fake);

    let range = crate::byterange::parse_range_header("bytes=2-4").unwrap();
    let mut opened = sup.open("capture_a.pcap", Some(range)).await.unwrap();
    assert_eq!(opened.start, 2);
    assert_eq!(opened.len, 3);

    let mut buf = vec![0u8; opened.len as usize];
    opened.file.read_exact(&mut buf).await.unwrap();
    assert_eq!(&buf, b"234");
}
