use super::*;
use crate::parser::parse;

fn valid_text() -> &'static str {
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
     MIN_FREE_DISK_PCT=20\n\
     CUSTOM_UNKNOWN_KEY=kept\n"
}

#[test]
fn valid_config_parses_and_preserves_unknown_keys() {
    let raw = parse(valid_text()).unwrap();
    let cfg = from_raw(&raw).unwrap();
    assert_eq!(cfg.nic1, "eth0");
    assert_eq!(cfg.extra.get("CUSTOM_UNKNOWN_KEY").unwrap(), "kept");
}

#[test]
fn missing_required_key_reports_validation_issue() {
    let raw = parse("MODE=span\nNIC1=eth0\nNIC2=eth1\n").unwrap();
    let issues = from_raw(&raw).unwrap_err();
    assert!(issues.iter().any(|i| i.field == "WEB_PORT"));
}

#[test]
fn nic1_equal_nic2_is_rejected() {
    let raw = parse(valid_text().replace("NIC2=eth1", "NIC2=eth0").as_str()).unwrap();
    let issues = from_raw(&raw).unwrap_err();
    assert!(issues.iter().any(|i| i.field == "NIC2"));
}

#[test]
fn port_out_of_range_is_rejected() {
    let raw = parse(valid_text().replace("WEB_PORT=8443", "WEB_PORT=0").as_str()).unwrap();
    let issues = from_raw(&raw).unwrap_err();
    assert!(issues.iter().any(|i| i.field == "WEB_PORT"));
}

#[test]
fn relative_capture_dir_is_rejected() {
    let raw = parse(valid_text().replace("CAPTURE_DIR=/var/lib/networktap/capture", "CAPTURE_DIR=relative/path").as_str())
        .unwrap();
    let issues = from_raw(&raw).unwrap_err();
    assert!(issues.iter().any(|i| i.field == "CAPTURE_DIR"));
}

#[test]
fn to_raw_then_from_raw_round_trips() {
    let raw = parse(valid_text()).unwrap();
    let cfg = from_raw(&raw).unwrap();
    let re_raw = to_raw(&cfg);
    let cfg2 = from_raw(&re_raw).unwrap();
    assert_eq!(cfg, cfg2);
}

#[test]
fn tls_enabled_requires_cert_and_key() {
    let raw = parse(&format!("{}TLS_ENABLED=true\n", valid_text())).unwrap();
    let issues = from_raw(&raw).unwrap_err();
    assert!(issues.iter().any(|i| i.field == "TLS_CERT"));
}
