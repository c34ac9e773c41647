use super::*;
use serde_json::Map;

fn event(source: Source, severity: i32) -> AlertEvent {
    AlertEvent {
        source,
        id: 1,
        timestamp: chrono::Utc::now(),
        severity,
        signature: "test".to_string(),
        src_ip: None,
        dst_ip: None,
        src_port: None,
        dst_port: None,
        proto: None,
        raw: Map::new(),
    }
}

#[test]
fn default_filter_matches_everything() {
    let filter = EventFilter::all();
    assert!(filter.matches(&event(Source::Suricata, 5)));
    assert!(filter.matches(&event(Source::Zeek, 1)));
}

#[test]
fn source_filter_excludes_other_sources() {
    let filter = EventFilter { sources: Some(vec![Source::Suricata]), severity_at_most: None };
    assert!(filter.matches(&event(Source::Suricata, 3)));
    assert!(!filter.matches(&event(Source::Zeek, 3)));
}

#[test]
fn severity_at_most_excludes_less_severe_events() {
    let filter = EventFilter { sources: None, severity_at_most: Some(2) };
    assert!(filter.matches(&event(Source::Suricata, 1)));
    assert!(filter.matches(&event(Source::Suricata, 2)));
    assert!(!filter.matches(&event(Source::Suricata, 3)));
}
