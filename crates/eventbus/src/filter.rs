use tap_core::{AlertEvent, Source};

/// Predicate over source/severity applied at `subscribe()` time (spec §4.4).
///
/// `severity_at_most` follows the Suricata/Zeek convention where a lower
/// numeric severity is *more* severe: `Some(2)` passes severities 1 and 2.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub sources: Option<Vec<Source>>,
    pub severity_at_most: Option<i32>,
}

impl EventFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, event: &AlertEvent) -> bool {
        if let Some(sources) = &self.sources {
            if !sources.contains(&event.source) {
                return false;
            }
        }
        if let Some(max) = self.severity_at_most {
            if event.severity > max {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
