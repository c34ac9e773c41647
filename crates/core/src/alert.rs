//! Alert event types (spec §3).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Suricata,
    Zeek,
    Anomaly,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Suricata => "suricata",
            Source::Zeek => "zeek",
            Source::Anomaly => "anomaly",
        }
    }
}

/// A normalized alert, emitted on the event bus (spec §3).
///
/// `raw` keeps the full original JSON object so the UI can expand a record
/// beyond the normalized fields, per the Design Notes' unknown-field policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub source: Source,
    /// Monotonic per-source id assigned by the tail engine follower.
    pub id: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub severity: i32,
    pub signature: String,
    pub src_ip: Option<String>,
    pub dst_ip: Option<String>,
    pub src_port: Option<u16>,
    pub dst_port: Option<u16>,
    pub proto: Option<String>,
    pub raw: Map<String, Value>,
}
