use super::*;
use crate::test_support::sample_config;

#[test]
fn span_mode_separates_capture_and_management_interfaces() {
    let cfg = sample_config();
    assert_ne!(cfg.capture_interface(), cfg.management_interface());
    assert_eq!(cfg.management_interface(), "eth1");
}

#[test]
fn bridge_mode_reports_bridge_as_management_interface() {
    let mut cfg = sample_config();
    cfg.mode = Mode::Bridge;
    assert_eq!(cfg.management_interface(), "br0");
}

#[test]
fn mode_round_trips_through_str() {
    assert_eq!("span".parse::<Mode>().unwrap(), Mode::Span);
    assert_eq!("bridge".parse::<Mode>().unwrap(), Mode::Bridge);
    assert!("both".parse::<Mode>().is_err());
}

#[test]
fn mode_other_is_involutive() {
    assert_eq!(Mode::Span.other().other(), Mode::Span);
}
