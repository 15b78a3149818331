//! Leveled diagnostic events emitted by the chart engines
//!
//! The engines never log through a global side channel. They report to a
//! [`DiagnosticSink`] handed in by the caller: the binary uses
//! [`TracingSink`], tests use [`RecordingSink`] and assert on what was emitted.

use serde::Serialize;
use std::cell::RefCell;

/// Severity of a diagnostic event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
}

/// What went wrong (or what happened) while processing a chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A name or id lookup against a registry failed; the entity was dropped
    ResolutionMiss { entity: String, detail: String },
    /// Cusp or degree data fell outside the expected range; a fallback was used
    MalformedGeometryInput { detail: String },
    /// Enrichment finished
    ChartEnriched {
        planets: usize,
        aspects: usize,
        dropped_planets: usize,
        dropped_aspects: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticEvent {
    pub severity: Severity,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl DiagnosticEvent {
    pub fn warning(kind: DiagnosticKind) -> Self {
        Self { severity: Severity::Warning, kind }
    }

    pub fn info(kind: DiagnosticKind) -> Self {
        Self { severity: Severity::Info, kind }
    }
}

/// Capability the engines report diagnostics to
pub trait DiagnosticSink {
    fn emit(&self, event: DiagnosticEvent);
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, event: DiagnosticEvent) {
        match (&event.severity, &event.kind) {
            (Severity::Warning, DiagnosticKind::ResolutionMiss { entity, detail }) => {
                tracing::warn!(entity = %entity, "Dropped unresolved {}: {}", entity, detail);
            }
            (Severity::Warning, DiagnosticKind::MalformedGeometryInput { detail }) => {
                tracing::warn!("Malformed geometry input: {}", detail);
            }
            (_, DiagnosticKind::ChartEnriched { planets, aspects, dropped_planets, dropped_aspects }) => {
                tracing::info!(
                    planets,
                    aspects,
                    dropped_planets,
                    dropped_aspects,
                    "Chart enriched"
                );
            }
            (severity, kind) => {
                tracing::debug!(?severity, ?kind, "diagnostic");
            }
        }
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _event: DiagnosticEvent) {}
}

/// Collects events in memory for later inspection
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<DiagnosticEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.borrow().clone()
    }

    /// Number of warning-level events
    pub fn warning_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.severity == Severity::Warning)
            .count()
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, event: DiagnosticEvent) {
        self.events.borrow_mut().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_collects_in_order() {
        let sink = RecordingSink::new();
        sink.emit(DiagnosticEvent::warning(DiagnosticKind::MalformedGeometryInput {
            detail: "cusp 3 missing".into(),
        }));
        sink.emit(DiagnosticEvent::info(DiagnosticKind::ChartEnriched {
            planets: 10,
            aspects: 4,
            dropped_planets: 0,
            dropped_aspects: 1,
        }));

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(sink.warning_count(), 1);
        assert!(matches!(events[1].kind, DiagnosticKind::ChartEnriched { planets: 10, .. }));
    }

    #[test]
    fn test_event_serializes_flat() {
        let event = DiagnosticEvent::warning(DiagnosticKind::ResolutionMiss {
            entity: "planet".into(),
            detail: "Chiron".into(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["kind"], "resolution_miss");
        assert_eq!(json["detail"], "Chiron");
    }
}
