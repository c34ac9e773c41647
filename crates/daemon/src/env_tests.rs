use std::path::PathBuf;

use serial_test::serial;

use super::*;

#[test]
#[serial]
fn flag_wins_over_everything() {
    std::env::set_var("NETWORKTAP_CONFIG", "/from/env");
    let resolved = resolve_config_path(Some(PathBuf::from("/from/flag")));
    std::env::remove_var("NETWORKTAP_CONFIG");
    assert_eq!(resolved, PathBuf::from("/from/flag"));
}

#[test]
#[serial]
fn env_var_wins_over_default() {
    std::env::remove_var("NETWORKTAP_CONFIG");
    std::env::set_var("NETWORKTAP_CONFIG", "/from/env");
    let resolved = resolve_config_path(None);
    std::env::remove_var("NETWORKTAP_CONFIG");
    assert_eq!(resolved, PathBuf::from("/from/env"));
}

#[test]
#[serial]
fn falls_back_to_default_path() {
    std::env::remove_var("NETWORKTAP_CONFIG");
    let resolved = resolve_config_path(None);
    assert_eq!(resolved, PathBuf::from(DEFAULT_CONFIG_PATH));
}
