use crate::id::RefId;
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};

///
/// CacheState
///
/// Explicit load state for one entity kind. `Loaded` with an empty map
/// means a select ran and matched nothing; a key absent from a loaded
/// map is a terminal "not found", never "not yet checked".
///

#[derive(Clone, Debug)]
enum CacheState<K> {
    Unloaded,
    Loaded(BTreeMap<K, RefId>),
}

///
/// RefCache
///
/// Pending names plus the resolved mapping for one entity kind.
///
/// `P` is the pending (possibly partial) key registered before owners
/// are resolved; `K` is the full key store rows map back to. Plain
/// name-keyed kinds use `P = K = String`.
///
/// The seeded overlay holds direct insertions made by the orchestrator
/// for rows it just created. It is consulted before the loaded map and
/// answers while the kind is still unloaded, without consuming the
/// pending set. Invalidation clears the overlay together with the
/// loaded map; the pending set survives so names registered before the
/// invalidation remain candidates for the next select.
///

#[derive(Clone, Debug)]
pub(crate) struct RefCache<P, K = P> {
    pending: BTreeSet<P>,
    seeded: BTreeMap<K, RefId>,
    state: CacheState<K>,
}

impl<P: Ord, K: Ord> RefCache<P, K> {
    pub fn new() -> Self {
        Self {
            pending: BTreeSet::new(),
            seeded: BTreeMap::new(),
            state: CacheState::Unloaded,
        }
    }

    /// Merge names into the pending set. No I/O, idempotent.
    pub fn add<I>(&mut self, names: I)
    where
        I: IntoIterator<Item = P>,
    {
        self.pending.extend(names);
    }

    /// Direct cache insertion bypassing the select.
    pub fn seed(&mut self, key: K, id: RefId) {
        self.seeded.insert(key, id);
    }

    /// Overlay-only lookup; does not consult the loaded map.
    pub fn seeded<Q>(&self, key: &Q) -> Option<RefId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.seeded.get(key).copied()
    }

    pub const fn is_loaded(&self) -> bool {
        matches!(self.state, CacheState::Loaded(_))
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// True when a resolve must run a select first: either the kind has
    /// never loaded, or names were added after the last load and need a
    /// supplemental merge-fetch.
    pub fn needs_select(&self) -> bool {
        !self.is_loaded() || self.has_pending()
    }

    /// Consume the pending set for a select attempt.
    pub fn take_pending(&mut self) -> BTreeSet<P> {
        std::mem::take(&mut self.pending)
    }

    /// Put a consumed pending set back after a failed select. Unions
    /// with anything added in the meantime.
    pub fn restore_pending(&mut self, names: BTreeSet<P>) {
        self.pending.extend(names);
    }

    /// Merge fetched rows into the resolved mapping, transitioning to
    /// loaded if this was the first select.
    pub fn load<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = (K, RefId)>,
    {
        match &mut self.state {
            CacheState::Loaded(map) => map.extend(rows),
            CacheState::Unloaded => {
                self.state = CacheState::Loaded(rows.into_iter().collect());
            }
        }
    }

    /// Transition to loaded without rows (empty-set short circuit).
    /// No-op when already loaded.
    pub fn mark_loaded(&mut self) {
        if !self.is_loaded() {
            self.state = CacheState::Loaded(BTreeMap::new());
        }
    }

    /// Seeded overlay first, then the loaded map. `None` while unloaded
    /// means "not yet checked"; callers go through `needs_select`
    /// before trusting it as a terminal answer.
    pub fn lookup<Q>(&self, key: &Q) -> Option<RefId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if let Some(id) = self.seeded(key) {
            return Some(id);
        }

        match &self.state {
            CacheState::Loaded(map) => map.get(key).copied(),
            CacheState::Unloaded => None,
        }
    }

    /// Discard the resolved mapping and the seeded overlay; keep the
    /// pending set.
    pub fn invalidate(&mut self) {
        self.seeded.clear();
        self.state = CacheState::Unloaded;
    }
}

impl<P: Ord, K: Ord> Default for RefCache<P, K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(n: u64) -> RefId {
        RefId::new(n)
    }

    #[test]
    fn unloaded_cache_answers_nothing() {
        let cache: RefCache<String> = RefCache::new();

        assert!(!cache.is_loaded());
        assert!(cache.needs_select());
        assert_eq!(cache.lookup("alpha"), None);
    }

    #[test]
    fn load_transitions_and_serves_from_memory() {
        let mut cache: RefCache<String> = RefCache::new();
        cache.add(["alpha".to_string(), "beta".to_string()]);

        let pending = cache.take_pending();
        assert_eq!(pending.len(), 2);

        cache.load([("alpha".to_string(), id(1))]);

        assert!(cache.is_loaded());
        assert!(!cache.needs_select());
        assert_eq!(cache.lookup("alpha"), Some(id(1)));
        // fetched and absent: terminal not-found
        assert_eq!(cache.lookup("beta"), None);
    }

    #[test]
    fn seeded_overlay_wins_and_answers_while_unloaded() {
        let mut cache: RefCache<String> = RefCache::new();
        cache.add(["alpha".to_string()]);
        cache.seed("alpha".to_string(), id(9));

        assert_eq!(cache.lookup("alpha"), Some(id(9)));
        assert!(cache.has_pending(), "seeding must not consume pending");

        cache.load([("alpha".to_string(), id(1))]);
        assert_eq!(cache.lookup("alpha"), Some(id(9)), "overlay is fresher");
    }

    #[test]
    fn invalidate_clears_mapping_but_keeps_pending() {
        let mut cache: RefCache<String> = RefCache::new();
        cache.add(["alpha".to_string()]);
        cache.seed("beta".to_string(), id(2));
        cache.load([("alpha".to_string(), id(1))]);

        cache.invalidate();

        assert!(!cache.is_loaded());
        assert_eq!(cache.lookup("alpha"), None);
        assert_eq!(cache.lookup("beta"), None, "overlay discarded");
        assert!(cache.has_pending(), "pending survives invalidation");
    }

    #[test]
    fn restore_pending_unions_with_new_names() {
        let mut cache: RefCache<String> = RefCache::new();
        cache.add(["alpha".to_string()]);

        let taken = cache.take_pending();
        cache.add(["beta".to_string()]);
        cache.restore_pending(taken);

        assert_eq!(cache.take_pending().len(), 2);
    }

    #[test]
    fn mark_loaded_keeps_existing_rows() {
        let mut cache: RefCache<String> = RefCache::new();
        cache.load([("alpha".to_string(), id(1))]);
        cache.mark_loaded();

        assert_eq!(cache.lookup("alpha"), Some(id(1)));
    }

    proptest! {
        // add({A,B}) then add({A,B,C}) pends the same set as one
        // add({A,B,C}); duplicates never survive.
        #[test]
        fn add_is_idempotent(first in proptest::collection::vec("[a-z]{1,6}", 0..8),
                             second in proptest::collection::vec("[a-z]{1,6}", 0..8)) {
            let mut split: RefCache<String> = RefCache::new();
            split.add(first.clone());
            split.add(first.iter().chain(second.iter()).cloned());

            let mut merged: RefCache<String> = RefCache::new();
            merged.add(first.into_iter().chain(second));

            prop_assert_eq!(split.take_pending(), merged.take_pending());
        }
    }
}
