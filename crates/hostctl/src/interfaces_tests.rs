use super::*;

const SAMPLE: &str = r#"[
    {
        "ifindex": 2,
        "ifname": "eth0",
        "operstate": "UP",
        "address": "00:11:22:33:44:55",
        "mtu": 1500,
        "addr_info": [
            {"family": "inet", "local": "192.0.2.10", "prefixlen": 24}
        ]
    },
    {
        "ifindex": 3,
        "ifname": "eth1",
        "operstate": "DOWN",
        "mtu": 9000,
        "addr_info": []
    }
]"#;

#[test]
fn parses_interface_list() {
    let ifaces = parse_ip_addr_json(SAMPLE).unwrap();
    assert_eq!(ifaces.len(), 2);
    assert_eq!(ifaces[0].name, "eth0");
    assert_eq!(ifaces[0].ipv4.as_deref(), Some("192.0.2.10/24"));
    assert_eq!(ifaces[1].ipv4, None);
}

#[test]
fn defaults_mtu_when_absent() {
    let json = r#"[{"ifindex":1,"ifname":"lo","operstate":"UNKNOWN"}]"#;
    let ifaces = parse_ip_addr_json(json).unwrap();
    assert_eq!(ifaces[0].mtu, 1500);
}

#[test]
fn malformed_json_is_an_error() {
    assert!(parse_ip_addr_json("not json").is_err());
}
