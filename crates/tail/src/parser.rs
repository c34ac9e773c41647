//! Line parsers turning raw JSON log lines into normalized [`AlertEvent`]s
//! (spec §4.3).

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;
use serde_json::{Map, Value};
use tap_core::{AlertEvent, Source};

/// Parses one complete line (without its trailing newline) into an event.
/// Implementations never panic; malformed input is a normal `Err`.
pub trait LineParser: Send + Sync {
    fn parse(&self, line: &str) -> Result<AlertEvent, serde_json::Error>;
}

#[derive(Debug, Deserialize)]
struct EveRecord {
    timestamp: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    alert: Option<EveAlert>,
    src_ip: Option<String>,
    dest_ip: Option<String>,
    src_port: Option<u16>,
    dest_port: Option<u16>,
    proto: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EveAlert {
    signature: Option<String>,
    severity: Option<i32>,
}

/// Parses Suricata `eve.json` / Zeek JSON-format log lines.
pub struct EveJsonParser {
    source: Source,
    next_id: AtomicU64,
}

impl EveJsonParser {
    pub fn new(source: Source) -> Self {
        Self { source, next_id: AtomicU64::new(1) }
    }
}

impl LineParser for EveJsonParser {
    fn parse(&self, line: &str) -> Result<AlertEvent, serde_json::Error> {
        let value: Value = serde_json::from_str(line)?;
        let raw = match &value {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        let record: EveRecord = serde_json::from_value(value)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let alert = record.alert.unwrap_or(EveAlert { signature: None, severity: None });
        Ok(AlertEvent {
            source: self.source,
            id,
            timestamp: record.timestamp.unwrap_or_else(chrono::Utc::now),
            severity: alert.severity.unwrap_or(3),
            signature: alert.signature.unwrap_or_else(|| "unknown".to_string()),
            src_ip: record.src_ip,
            dst_ip: record.dest_ip,
            src_port: record.src_port,
            dst_port: record.dest_port,
            proto: record.proto,
            raw,
        })
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
