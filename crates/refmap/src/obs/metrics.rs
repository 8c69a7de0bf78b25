use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
///
/// Ephemeral, in-memory counters for resolver operations. Process- and
/// thread-local; discarded with the import run.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct EventState {
    pub ops: EventOps,
    pub kinds: BTreeMap<String, KindCounters>,
    pub since_ms: u64,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            ops: EventOps::default(),
            kinds: BTreeMap::new(),
            since_ms: now_millis(),
        }
    }
}

///
/// EventOps
///
/// Totals across all entity kinds.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    pub select_calls: u64,
    pub rows_fetched: u64,
    pub seeds: u64,
    pub invalidations: u64,
}

///
/// KindCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct KindCounters {
    pub select_calls: u64,
    pub rows_fetched: u64,
    pub seeds: u64,
    pub invalidations: u64,
}

///
/// EventReport
///
/// Point-in-time snapshot of the global metrics state.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub kinds: BTreeMap<String, KindCounters>,
    pub since_ms: u64,
}

pub(crate) fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}

thread_local! {
    static STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    STATE.with_borrow(f)
}

pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    STATE.with_borrow_mut(f)
}
