use super::*;

#[test]
fn same_inode_growing_is_not_rotation() {
    let mut cursor = TailCursor::new(PathBuf::from("/tmp/eve.json"), 42);
    cursor.last_seen_size = 100;
    assert!(!cursor.is_rotation(42, 200));
}

#[test]
fn inode_change_is_rotation() {
    let mut cursor = TailCursor::new(PathBuf::from("/tmp/eve.json"), 42);
    cursor.last_seen_size = 100;
    assert!(cursor.is_rotation(43, 5));
}

#[test]
fn shrinking_size_same_inode_is_rotation() {
    let mut cursor = TailCursor::new(PathBuf::from("/tmp/eve.json"), 42);
    cursor.last_seen_size = 100;
    assert!(cursor.is_rotation(42, 10));
}

#[test]
fn fresh_cursor_starts_at_zero_offset() {
    let cursor = TailCursor::new(PathBuf::from("/tmp/eve.json"), 1);
    assert_eq!(cursor.offset, 0);
}
