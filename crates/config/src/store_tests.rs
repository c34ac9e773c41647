use super::*;
use tap_core::config::Mode;
use tempfile::NamedTempFile;

fn write_sample(file: &NamedTempFile) {
    std::fs::write(
        file.path(),
        "MODE=span\n\
         NIC1=eth0\n\
         NIC2=eth1\n\
         WEB_PORT=8443\n\
         WEB_USER=admin\n\
         WEB_PASS_HASH=hash\n\
         WEB_PASS_SALT=salt\n\
         CAPTURE_DIR=/var/lib/networktap/capture\n\
         CAPTURE_ROTATE_SECONDS=3600\n\
         CAPTURE_FILE_LIMIT=48\n\
         CAPTURE_SNAPLEN=65535\n\
         RETENTION_DAYS=7\n\
         MIN_FREE_DISK_PCT=20\n",
    )
    .unwrap();
}

#[test]
fn get_reflects_initial_file() {
    let file = NamedTempFile::new().unwrap();
    write_sample(&file);
    let store = ConfigStore::load(file.path()).unwrap();
    assert_eq!(store.get().mode, Mode::Span);
}

#[test]
fn successful_patch_is_immediately_visible() {
    let file = NamedTempFile::new().unwrap();
    write_sample(&file);
    let store = ConfigStore::load(file.path()).unwrap();
    store.set(|c| c.retention.max_age_days = 14).unwrap();
    assert_eq!(store.get().retention.max_age_days, 14);
}

#[test]
fn failed_patch_leaves_snapshot_and_file_untouched() {
    let file = NamedTempFile::new().unwrap();
    write_sample(&file);
    let store = ConfigStore::load(file.path()).unwrap();
    let before_text = std::fs::read_to_string(file.path()).unwrap();

    let result = store.set(|c| c.nic2 = c.nic1.clone());
    assert!(result.is_err());
    assert_eq!(store.get().nic2, "eth1");
    assert_eq!(std::fs::read_to_string(file.path()).unwrap(), before_text);
}

#[test]
fn no_op_patch_is_idempotent() {
    let file = NamedTempFile::new().unwrap();
    write_sample(&file);
    let store = ConfigStore::load(file.path()).unwrap();
    let before = store.get();
    store.set(|_| {}).unwrap();
    assert_eq!(store.get(), before);
}

#[test]
fn mode_change_notifies_watcher() {
    let file = NamedTempFile::new().unwrap();
    write_sample(&file);
    let store = ConfigStore::load(file.path()).unwrap();
    let mut rx = store.watch_mode();
    store.set(|c| c.mode = Mode::Bridge).unwrap();
    assert_eq!(*rx.borrow_and_update(), Mode::Bridge);
}

#[test]
fn reload_picks_up_external_edits() {
    let file = NamedTempFile::new().unwrap();
    write_sample(&file);
    let store = ConfigStore::load(file.path()).unwrap();
    let text = std::fs::read_to_string(file.path()).unwrap();
    std::fs::write(file.path(), text.replace("RETENTION_DAYS=7", "RETENTION_DAYS=30")).unwrap();
    let snapshot = store.reload().unwrap();
    assert_eq!(snapshot.retention.max_age_days, 30);
}

#[test]
fn old_snapshot_handle_stays_valid_after_reload() {
    let file = NamedTempFile::new().unwrap();
    write_sample(&file);
    let store = ConfigStore::load(file.path()).unwrap();
    let old = store.get();
    store.set(|c| c.retention.max_age_days = 99).unwrap();
    assert_eq!(old.retention.max_age_days, 7);
}
