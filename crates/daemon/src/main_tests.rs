use super::resolve_bind_addr;

#[test]
fn bind_flag_overrides_configured_port() {
    let addr = resolve_bind_addr(Some("127.0.0.1:9000"), 8443).unwrap();
    assert_eq!(addr.to_string(), "127.0.0.1:9000");
}

#[test]
fn no_flag_binds_every_interface_on_configured_port() {
    let addr = resolve_bind_addr(None, 8443).unwrap();
    assert_eq!(addr.to_string(), "0.0.0.0:8443");
}

#[test]
fn malformed_bind_flag_is_rejected() {
    assert!(resolve_bind_addr(Some("not-an-address"), 8443).is_err());
}
