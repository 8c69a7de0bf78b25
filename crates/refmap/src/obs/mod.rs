//! Observability: per-kind resolver telemetry.
//!
//! Resolver logic does not touch the metrics state directly; all
//! instrumentation flows through `MetricsEvent` and `MetricsSink`.

pub(crate) mod metrics;
pub(crate) mod sink;

pub use metrics::{EventOps, EventReport, KindCounters};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset};
