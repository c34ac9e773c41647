use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn accepts_path_inside_root() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.pcap"), b"data").unwrap();
    let resolved = resolve_under_root(dir.path(), Path::new("a.pcap")).unwrap();
    assert_eq!(resolved, dir.path().canonicalize().unwrap().join("a.pcap"));
}

#[test]
fn rejects_dot_dot_escape() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("active");
    fs::create_dir(&sub).unwrap();
    fs::write(dir.path().join("outside.txt"), b"secret").unwrap();
    let result = resolve_under_root(&sub, Path::new("../outside.txt"));
    assert_eq!(result, Err(PathGuardError::Escapes));
}

#[test]
fn rejects_symlink_escaping_root() {
    let dir = tempdir().unwrap();
    let outside = tempdir().unwrap();
    fs::write(outside.path().join("secret.txt"), b"secret").unwrap();
    let root = dir.path().join("root");
    fs::create_dir(&root).unwrap();

    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), root.join("link.txt")).unwrap();
        let result = resolve_under_root(&root, Path::new("link.txt"));
        assert_eq!(result, Err(PathGuardError::Escapes));
    }
}

#[test]
fn missing_candidate_is_not_found() {
    let dir = tempdir().unwrap();
    let result = resolve_under_root(dir.path(), Path::new("nope.pcap"));
    assert_eq!(result, Err(PathGuardError::NotFound));
}

#[test]
fn missing_root_is_invalid_root() {
    let result = resolve_under_root(Path::new("/nonexistent/root"), Path::new("a"));
    assert!(matches!(result, Err(PathGuardError::InvalidRoot(_))));
}
