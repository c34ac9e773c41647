use super::*;
use tap_core::test_support::sample_config;
use tap_hostctl::{FakeHostAdapter, RecordedCall};

#[tokio::test]
async fn stop_all_stops_capture_and_enabled_engines_in_order() {
    let fake = FakeHostAdapter::new();
    let config = sample_config();
    stop_all(&fake, &config).await;

    let calls = fake.calls();
    let stops: Vec<&str> = calls
        .iter()
        .filter_map(|c| match c {
            RecordedCall::ServiceAction(name, ServiceAction::Stop) => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(stops, vec![CAPTURE_SERVICE, SURICATA_SERVICE, ZEEK_SERVICE]);
}

#[tokio::test]
async fn stop_all_skips_disabled_engines() {
    let fake = FakeHostAdapter::new();
    let mut config = sample_config();
    config.features.suricata_enabled = false;
    config.features.zeek_enabled = false;
    stop_all(&fake, &config).await;

    let calls = fake.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(&calls[0], RecordedCall::ServiceAction(name, ServiceAction::Stop) if name == CAPTURE_SERVICE));
}

#[tokio::test]
async fn start_all_restarts_web_first_then_engines_then_capture() {
    let fake = FakeHostAdapter::new();
    let config = sample_config();
    start_all(&fake, &config).await;

    let calls = fake.calls();
    let names: Vec<&str> = calls
        .iter()
        .filter_map(|c| match c {
            RecordedCall::ServiceAction(name, _) => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec![WEB_SERVICE, SURICATA_SERVICE, ZEEK_SERVICE, CAPTURE_SERVICE]);
}

#[tokio::test]
async fn failed_stop_does_not_panic_or_abort() {
    let fake = FakeHostAdapter::new();
    fake.fail_next_action();
    let config = sample_config();
    stop_all(&fake, &config).await;
    assert_eq!(fake.calls().len(), 3);
}
