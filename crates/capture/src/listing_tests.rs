use super::*;
use std::fs;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

fn touch(path: &Path, age_secs_ago: u64) {
    fs::write(path, b"data").unwrap();
    let mtime = SystemTime::now() - Duration::from_secs(age_secs_ago);
    let file = fs::File::open(path).unwrap();
    file.set_modified(mtime).unwrap();
}

#[tokio::test]
async fn scan_sorts_by_mtime_descending() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("capture_old.pcap"), 100);
    touch(&dir.path().join("capture_new.pcap"), 1);

    let artifacts = scan(dir.path()).await.unwrap();
    assert_eq!(artifacts.len(), 2);
    assert_eq!(artifacts[0].path.file_name().unwrap(), "capture_new.pcap");
}

#[tokio::test]
async fn scan_missing_dir_yields_empty() {
    let artifacts = scan(Path::new("/nonexistent/tap-capture-dir")).await.unwrap();
    assert!(artifacts.is_empty());
}

#[tokio::test]
async fn scan_skips_subdirectories() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("subdir")).unwrap();
    touch(&dir.path().join("capture_a.pcap"), 5);

    let artifacts = scan(dir.path()).await.unwrap();
    assert_eq!(artifacts.len(), 1);
}

#[test]
fn paginate_applies_offset_limit_and_filter() {
    let artifacts: Vec<CaptureArtifact> = (0..5)
        .map(|i| CaptureArtifact {
            path: Path::new(&format!("capture_{i}.pcap")).to_path_buf(),
            size: 10,
            mtime_ms: i,
            generation: i,
        })
        .collect();

    let page = paginate(&artifacts, 1, 2, None);
    assert_eq!(page.len(), 2);

    let filtered = paginate(&artifacts, 0, 10, Some("capture_3"));
    assert_eq!(filtered.len(), 1);
}
