use crate::id::RefId;
use std::collections::BTreeMap;

///
/// InterfaceCache
///
/// Two-level `(host-id, interface-tag)` → interface-id map. Interfaces
/// are created earlier in the pipeline than anything that references
/// them, so the orchestrator seeds every pair up front; nothing is
/// ever fetched and a miss is a terminal not-found.
///

#[derive(Clone, Debug, Default)]
pub struct InterfaceCache {
    refs: BTreeMap<RefId, BTreeMap<String, RefId>>,
}

impl InterfaceCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, host: RefId, tag: impl Into<String>, id: RefId) {
        self.refs.entry(host).or_default().insert(tag.into(), id);
    }

    #[must_use]
    pub fn get(&self, host: RefId, tag: &str) -> Option<RefId> {
        self.refs.get(&host).and_then(|tags| tags.get(tag)).copied()
    }
}
