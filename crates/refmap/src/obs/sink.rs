//! Metrics sink boundary.
//!
//! This module is the only bridge between resolution logic and the
//! global metrics state.

use crate::{
    kind::RefKind,
    obs::metrics::{self, EventReport, EventState},
};

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent {
    /// One batched select completed, returning `rows` rows.
    Select { kind: RefKind, rows: u64 },
    /// A reference was seeded directly by the orchestrator.
    Seed { kind: RefKind },
    /// A kind's resolved mapping was discarded.
    Invalidate { kind: RefKind },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default thread-local sink that writes into global metrics state.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| match event {
            MetricsEvent::Select { kind, rows } => {
                m.ops.select_calls = m.ops.select_calls.saturating_add(1);
                m.ops.rows_fetched = m.ops.rows_fetched.saturating_add(rows);

                let entry = m.kinds.entry(kind.as_str().to_string()).or_default();
                entry.select_calls = entry.select_calls.saturating_add(1);
                entry.rows_fetched = entry.rows_fetched.saturating_add(rows);
            }
            MetricsEvent::Seed { kind } => {
                m.ops.seeds = m.ops.seeds.saturating_add(1);

                let entry = m.kinds.entry(kind.as_str().to_string()).or_default();
                entry.seeds = entry.seeds.saturating_add(1);
            }
            MetricsEvent::Invalidate { kind } => {
                m.ops.invalidations = m.ops.invalidations.saturating_add(1);

                let entry = m.kinds.entry(kind.as_str().to_string()).or_default();
                entry.invalidations = entry.invalidations.saturating_add(1);
            }
        });
    }
}

pub(crate) fn record(event: MetricsEvent) {
    GlobalMetricsSink.record(event);
}

/// Snapshot the global metrics state.
#[must_use]
pub fn metrics_report() -> EventReport {
    metrics::with_state(|m| EventReport {
        ops: m.ops.clone(),
        kinds: m.kinds.clone(),
        since_ms: m.since_ms,
    })
}

/// Reset all counters and restart the reporting window.
pub fn metrics_reset() {
    metrics::with_state_mut(|m| *m = EventState::default());
}
