//! Conversion between the raw `KEY=VALUE` map and [`ConfigData`].

use indexmap::IndexMap;
use std::path::PathBuf;
use std::str::FromStr;
use tap_core::config::{
    AuthAccount, CaptureConfig, ConfigData, EnginePaths, FeatureFlags, Mode, RetentionConfig,
    Role, TlsConfig, WebAuthConfig, WebConfig,
};

use crate::error::ValidationIssue;

/// Keys recognized at the typed layer (spec §6). Anything else round-trips
/// through `ConfigData::extra` unmodified.
const RECOGNIZED_KEYS: &[&str] = &[
    "MODE",
    "NIC1",
    "NIC2",
    "BRIDGE_NAME",
    "MGMT_IP",
    "MGMT_GATEWAY",
    "MGMT_DNS",
    "WEB_PORT",
    "WEB_USER",
    "WEB_PASS_HASH",
    "WEB_PASS_SALT",
    "WEB_VIEWER_USER",
    "WEB_VIEWER_PASS_HASH",
    "WEB_VIEWER_PASS_SALT",
    "CAPTURE_DIR",
    "CAPTURE_ROTATE_SECONDS",
    "CAPTURE_FILE_LIMIT",
    "CAPTURE_SNAPLEN",
    "CAPTURE_COMPRESS",
    "CAPTURE_FILTER",
    "RETENTION_DAYS",
    "MIN_FREE_DISK_PCT",
    "SURICATA_ENABLED",
    "SURICATA_EVE_LOG",
    "SURICATA_IFACE",
    "ZEEK_ENABLED",
    "ZEEK_LOG_DIR",
    "ZEEK_IFACE",
    "TLS_ENABLED",
    "TLS_CERT",
    "TLS_KEY",
];

fn get<'a>(map: &'a IndexMap<String, String>, key: &str) -> Option<&'a str> {
    map.get(key).map(|s| s.as_str())
}

fn require<'a>(
    map: &'a IndexMap<String, String>,
    key: &'static str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<&'a str> {
    match get(map, key) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            issues.push(ValidationIssue { field: key, message: "missing or empty".to_string() });
            None
        }
    }
}

fn parse_bool(map: &IndexMap<String, String>, key: &'static str, default: bool) -> bool {
    match get(map, key) {
        Some("true") | Some("1") | Some("yes") => true,
        Some("false") | Some("0") | Some("no") => false,
        _ => default,
    }
}

fn parse_num<T: FromStr>(
    map: &IndexMap<String, String>,
    key: &'static str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<T> {
    let raw = require(map, key, issues)?;
    raw.parse::<T>().ok().or_else(|| {
        issues.push(ValidationIssue { field: key, message: format!("not a valid number: {raw}") });
        None
    })
}

/// Build a [`ConfigData`] from a raw key/value map, collecting every
/// validation issue found rather than failing on the first one (so the
/// caller can report everything wrong at once).
pub fn from_raw(map: &IndexMap<String, String>) -> Result<ConfigData, Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    let mode = require(map, "MODE", &mut issues)
        .and_then(|v| v.parse::<Mode>().map_err(|e| issues.push(ValidationIssue { field: "MODE", message: e })).ok());
    let nic1 = require(map, "NIC1", &mut issues).map(str::to_string);
    let nic2 = require(map, "NIC2", &mut issues).map(str::to_string);
    let bridge_name = get(map, "BRIDGE_NAME").unwrap_or("br0").to_string();
    let mgmt_ip = require(map, "MGMT_IP", &mut issues).map(str::to_string);

    let web_port: Option<u16> = parse_num(map, "WEB_PORT", &mut issues);
    if let Some(port) = web_port {
        if port == 0 {
            issues.push(ValidationIssue { field: "WEB_PORT", message: "must be 1-65535".to_string() });
        }
    }
    let web_user = require(map, "WEB_USER", &mut issues).map(str::to_string);
    let web_pass_hash = require(map, "WEB_PASS_HASH", &mut issues).map(str::to_string);
    let web_pass_salt = require(map, "WEB_PASS_SALT", &mut issues).map(str::to_string);
    let viewer_account = match (
        get(map, "WEB_VIEWER_USER"),
        get(map, "WEB_VIEWER_PASS_HASH"),
        get(map, "WEB_VIEWER_PASS_SALT"),
    ) {
        (Some(user), Some(hash), Some(salt)) => Some(AuthAccount {
            user: user.to_string(),
            pass_hash: hash.to_string(),
            pass_salt: salt.to_string(),
            role: Role::Viewer,
        }),
        (None, None, None) => None,
        _ => {
            issues.push(ValidationIssue {
                field: "WEB_VIEWER_USER",
                message: "WEB_VIEWER_USER/PASS_HASH/PASS_SALT must all be set together".to_string(),
            });
            None
        }
    };

    let capture_dir = require(map, "CAPTURE_DIR", &mut issues).map(PathBuf::from);
    if let Some(dir) = &capture_dir {
        if !dir.is_absolute() {
            issues.push(ValidationIssue {
                field: "CAPTURE_DIR",
                message: "must be an absolute path".to_string(),
            });
        }
    }
    let rotate_seconds: Option<u32> = parse_num(map, "CAPTURE_ROTATE_SECONDS", &mut issues);
    let file_limit: Option<u32> = parse_num(map, "CAPTURE_FILE_LIMIT", &mut issues);
    let snaplen: Option<u32> = parse_num(map, "CAPTURE_SNAPLEN", &mut issues);
    let compress = parse_bool(map, "CAPTURE_COMPRESS", false);
    let filter = get(map, "CAPTURE_FILTER").map(str::to_string);

    let retention_days: Option<u32> = parse_num(map, "RETENTION_DAYS", &mut issues);
    let min_free_disk_pct: Option<u8> = parse_num(map, "MIN_FREE_DISK_PCT", &mut issues);
    if let Some(pct) = min_free_disk_pct {
        if pct > 100 {
            issues.push(ValidationIssue {
                field: "MIN_FREE_DISK_PCT",
                message: "must be 0-100".to_string(),
            });
        }
    }

    let suricata_enabled = parse_bool(map, "SURICATA_ENABLED", false);
    let suricata_eve_log = get(map, "SURICATA_EVE_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/var/log/suricata/eve.json"));
    let suricata_iface = get(map, "SURICATA_IFACE").map(str::to_string);

    let zeek_enabled = parse_bool(map, "ZEEK_ENABLED", false);
    let zeek_log_dir =
        get(map, "ZEEK_LOG_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("/var/log/zeek"));
    let zeek_iface = get(map, "ZEEK_IFACE").map(str::to_string);

    let tls_enabled = parse_bool(map, "TLS_ENABLED", false);
    let tls_cert = get(map, "TLS_CERT").map(PathBuf::from);
    let tls_key = get(map, "TLS_KEY").map(PathBuf::from);
    if tls_enabled && (tls_cert.is_none() || tls_key.is_none()) {
        issues.push(ValidationIssue {
            field: "TLS_CERT",
            message: "TLS_CERT and TLS_KEY are required when TLS_ENABLED=true".to_string(),
        });
    }

    if let (Some(Mode::Span), Some(n1), Some(ip)) = (mode, nic1.as_deref(), mgmt_ip.as_str()) {
        let _ = (n1, ip); // nic1/nic2 distinctness checked below regardless of mode
    }
    if let (Some(n1), Some(n2)) = (nic1.as_deref(), nic2.as_deref()) {
        if n1 == n2 {
            issues.push(ValidationIssue {
                field: "NIC2",
                message: "NIC1 and NIC2 must differ".to_string(),
            });
        }
    }

    if !issues.is_empty() {
        return Err(issues);
    }

    let extra: IndexMap<String, String> = map
        .iter()
        .filter(|(k, _)| !RECOGNIZED_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Ok(ConfigData {
        mode: mode.expect("validated above"),
        nic1: nic1.expect("validated above"),
        nic2: nic2.expect("validated above"),
        bridge_name,
        mgmt_ip: mgmt_ip.expect("validated above"),
        mgmt_gateway: get(map, "MGMT_GATEWAY").map(str::to_string),
        mgmt_dns: get(map, "MGMT_DNS").map(str::to_string),
        capture: CaptureConfig {
            dir: capture_dir.expect("validated above"),
            rotate_seconds: rotate_seconds.expect("validated above"),
            file_limit: file_limit.expect("validated above"),
            snaplen: snaplen.expect("validated above"),
            compress,
            filter,
        },
        retention: RetentionConfig {
            max_age_days: retention_days.expect("validated above"),
            min_free_disk_pct: min_free_disk_pct.expect("validated above"),
        },
        web: WebConfig {
            port: web_port.expect("validated above"),
            auth: WebAuthConfig {
                accounts: {
                    let mut accounts = vec![AuthAccount {
                        user: web_user.expect("validated above"),
                        pass_hash: web_pass_hash.expect("validated above"),
                        pass_salt: web_pass_salt.expect("validated above"),
                        role: Role::Admin,
                    }];
                    accounts.extend(viewer_account);
                    accounts
                },
            },
            tls: TlsConfig { enabled: tls_enabled, cert: tls_cert, key: tls_key },
        },
        features: FeatureFlags {
            suricata_enabled,
            zeek_enabled,
            ai_assistant_enabled: parse_bool(map, "AI_ASSISTANT_ENABLED", false),
        },
        paths: EnginePaths {
            capture_dir: get(map, "CAPTURE_DIR").map(PathBuf::from).unwrap_or_default(),
            suricata_eve_log,
            zeek_log_dir,
        },
        suricata_iface,
        zeek_iface,
        extra,
    })
}

/// Serialize a [`ConfigData`] back to the raw key/value map, including
/// preserved unknown keys.
pub fn to_raw(config: &ConfigData) -> IndexMap<String, String> {
    let mut map = IndexMap::new();
    map.insert("MODE".to_string(), config.mode.as_str().to_string());
    map.insert("NIC1".to_string(), config.nic1.clone());
    map.insert("NIC2".to_string(), config.nic2.clone());
    map.insert("BRIDGE_NAME".to_string(), config.bridge_name.clone());
    map.insert("MGMT_IP".to_string(), config.mgmt_ip.clone());
    if let Some(gw) = &config.mgmt_gateway {
        map.insert("MGMT_GATEWAY".to_string(), gw.clone());
    }
    if let Some(dns) = &config.mgmt_dns {
        map.insert("MGMT_DNS".to_string(), dns.clone());
    }
    map.insert("WEB_PORT".to_string(), config.web.port.to_string());
    if let Some(admin) = config.web.auth.accounts.iter().find(|a| a.role == Role::Admin) {
        map.insert("WEB_USER".to_string(), admin.user.clone());
        map.insert("WEB_PASS_HASH".to_string(), admin.pass_hash.clone());
        map.insert("WEB_PASS_SALT".to_string(), admin.pass_salt.clone());
    }
    if let Some(viewer) = config.web.auth.accounts.iter().find(|a| a.role == Role::Viewer) {
        map.insert("WEB_VIEWER_USER".to_string(), viewer.user.clone());
        map.insert("WEB_VIEWER_PASS_HASH".to_string(), viewer.pass_hash.clone());
        map.insert("WEB_VIEWER_PASS_SALT".to_string(), viewer.pass_salt.clone());
    }
    map.insert("CAPTURE_DIR".to_string(), config.capture.dir.display().to_string());
    map.insert("CAPTURE_ROTATE_SECONDS".to_string(), config.capture.rotate_seconds.to_string());
    map.insert("CAPTURE_FILE_LIMIT".to_string(), config.capture.file_limit.to_string());
    map.insert("CAPTURE_SNAPLEN".to_string(), config.capture.snaplen.to_string());
    map.insert("CAPTURE_COMPRESS".to_string(), config.capture.compress.to_string());
    if let Some(filter) = &config.capture.filter {
        map.insert("CAPTURE_FILTER".to_string(), filter.clone());
    }
    map.insert("RETENTION_DAYS".to_string(), config.retention.max_age_days.to_string());
    map.insert("MIN_FREE_DISK_PCT".to_string(), config.retention.min_free_disk_pct.to_string());
    map.insert("SURICATA_ENABLED".to_string(), config.features.suricata_enabled.to_string());
    map.insert(
        "SURICATA_EVE_LOG".to_string(),
        config.paths.suricata_eve_log.display().to_string(),
    );
    if let Some(iface) = &config.suricata_iface {
        map.insert("SURICATA_IFACE".to_string(), iface.clone());
    }
    map.insert("ZEEK_ENABLED".to_string(), config.features.zeek_enabled.to_string());
    map.insert("ZEEK_LOG_DIR".to_string(), config.paths.zeek_log_dir.display().to_string());
    if let Some(iface) = &config.zeek_iface {
        map.insert("ZEEK_IFACE".to_string(), iface.clone());
    }
    map.insert("TLS_ENABLED".to_string(), config.web.tls.enabled.to_string());
    if let Some(cert) = &config.web.tls.cert {
        map.insert("TLS_CERT".to_string(), cert.display().to_string());
    }
    if let Some(key) = &config.web.tls.key {
        map.insert("TLS_KEY".to_string(), key.display().to_string());
    }
    for (k, v) in &config.extra {
        map.insert(k.clone(), v.clone());
    }
    map
}

#[cfg(test)]
#[path = "typed_tests.rs"]
mod tests;
