//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use indexmap::IndexMap;
use std::path::PathBuf;

use crate::config::{
    AuthAccount, CaptureConfig, ConfigData, EnginePaths, FeatureFlags, Mode, RetentionConfig,
    Role, TlsConfig, WebAuthConfig, WebConfig,
};

/// A complete, valid `ConfigData` for tests, overridable field-by-field.
pub fn sample_config() -> ConfigData {
    ConfigData {
        mode: Mode::Span,
        nic1: "eth0".to_string(),
        nic2: "eth1".to_string(),
        bridge_name: "br0".to_string(),
        mgmt_ip: "192.0.2.10/24".to_string(),
        mgmt_gateway: None,
        mgmt_dns: None,
        capture: CaptureConfig {
            dir: PathBuf::from("/var/lib/networktap/capture"),
            rotate_seconds: 3600,
            file_limit: 48,
            snaplen: 65535,
            compress: false,
            filter: None,
        },
        retention: RetentionConfig { max_age_days: 7, min_free_disk_pct: 20 },
        web: WebConfig {
            port: 8443,
            auth: WebAuthConfig {
                accounts: vec![
                    AuthAccount {
                        user: "admin".to_string(),
                        pass_hash: "deadbeef".to_string(),
                        pass_salt: "salt".to_string(),
                        role: Role::Admin,
                    },
                    AuthAccount {
                        user: "viewer".to_string(),
                        pass_hash: "cafefeed".to_string(),
                        pass_salt: "salt2".to_string(),
                        role: Role::Viewer,
                    },
                ],
            },
            tls: TlsConfig { enabled: false, cert: None, key: None },
        },
        features: FeatureFlags {
            suricata_enabled: true,
            zeek_enabled: true,
            ai_assistant_enabled: false,
        },
        paths: EnginePaths {
            capture_dir: PathBuf::from("/var/lib/networktap/capture"),
            suricata_eve_log: PathBuf::from("/var/log/suricata/eve.json"),
            zeek_log_dir: PathBuf::from("/var/log/zeek"),
        },
        suricata_iface: Some("eth0".to_string()),
        zeek_iface: Some("eth0".to_string()),
        extra: IndexMap::new(),
    }
}
