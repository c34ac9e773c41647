//! Config path resolution (spec §6): `--config` flag, else `NETWORKTAP_CONFIG`,
//! else `/etc/networktap.conf`.

use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/networktap.conf";

pub fn resolve_config_path(flag: Option<PathBuf>) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    if let Ok(path) = std::env::var("NETWORKTAP_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_CONFIG_PATH)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
