//! Canonicalise-and-check-prefix helper (Design Notes §9) used by every
//! path argument crossing a trust boundary (request → disk).

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PathGuardError {
    #[error("root does not exist or is not a directory: {0}")]
    InvalidRoot(String),
    #[error("path escapes allowed root")]
    Escapes,
    #[error("path does not exist")]
    NotFound,
}

/// Resolve `candidate` (joined under `root` if relative) and reject it if
/// the canonical form escapes the canonical `root` — including via a
/// symlink whose target points outside the root (spec §4.2).
pub fn resolve_under_root(root: &Path, candidate: &Path) -> Result<PathBuf, PathGuardError> {
    let canonical_root = root
        .canonicalize()
        .map_err(|_| PathGuardError::InvalidRoot(root.display().to_string()))?;

    let joined = if candidate.is_absolute() { candidate.to_path_buf() } else { root.join(candidate) };

    let canonical = joined.canonicalize().map_err(|_| PathGuardError::NotFound)?;

    if canonical.starts_with(&canonical_root) {
        Ok(canonical)
    } else {
        Err(PathGuardError::Escapes)
    }
}

#[cfg(test)]
#[path = "path_guard_tests.rs"]
mod tests;
