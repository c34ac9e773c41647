use super::*;
use serde_json::Map;

fn event(id: u64, source: Source) -> Arc<AlertEvent> {
    Arc::new(AlertEvent {
        source,
        id,
        timestamp: chrono::Utc::now(),
        severity: 3,
        signature: format!("sig-{id}"),
        src_ip: None,
        dst_ip: None,
        src_port: None,
        dst_port: None,
        proto: None,
        raw: Map::new(),
    })
}

#[test]
fn recent_returns_oldest_first_up_to_limit() {
    let ring = EventRing::new();
    for i in 0..5 {
        ring.push(&event(i, Source::Suricata));
    }
    let recent = ring.recent(Source::Suricata, 3);
    let ids: Vec<u64> = recent.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![2, 3, 4]);
}

#[test]
fn ring_evicts_oldest_beyond_capacity() {
    let ring = EventRing::new();
    for i in 0..(RING_CAPACITY as u64 + 10) {
        ring.push(&event(i, Source::Zeek));
    }
    let recent = ring.recent(Source::Zeek, RING_CAPACITY);
    assert_eq!(recent.len(), RING_CAPACITY);
    assert_eq!(recent.first().unwrap().id, 10);
}

#[test]
fn sources_are_isolated() {
    let ring = EventRing::new();
    ring.push(&event(1, Source::Suricata));
    ring.push(&event(2, Source::Zeek));
    assert_eq!(ring.recent(Source::Suricata, 10).len(), 1);
    assert_eq!(ring.recent(Source::Anomaly, 10).len(), 0);
}
