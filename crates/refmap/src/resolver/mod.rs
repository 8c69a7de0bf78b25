//! The per-kind resolution surface.
//!
//! One `Referencer` instance lives for the duration of an import run.
//! The orchestrator registers names while walking the parsed document,
//! resolves owners before dependents, invalidates a kind after
//! inserting rows of that kind, and seeds references for rows it just
//! created.

// Macros come before the kind submodules so their expansions are in
// scope there.

macro_rules! plain_kind_api {
    (
        kind: $kind:expr,
        field: $field:ident,
        label: $label:literal,
        add: $add:ident,
        add_ref: $add_ref:ident,
        resolve: $resolve:ident,
        invalidate: $invalidate:ident,
    ) => {
        #[doc = concat!("Queue ", $label, " names for the next batched select.")]
        pub fn $add<I, N>(&mut self, names: I)
        where
            I: IntoIterator<Item = N>,
            N: Into<String>,
        {
            self.$field.add(names.into_iter().map(Into::into));
        }

        #[doc = concat!(
            "Associate a ",
            $label,
            " name with a known identifier, bypassing the select."
        )]
        pub fn $add_ref(&mut self, name: impl Into<String>, id: RefId) {
            sink::record(MetricsEvent::Seed { kind: $kind });
            self.$field.seed(name.into(), id);
        }

        #[doc = concat!("Resolve a ", $label, " name; `Ok(None)` is resolved-as-not-found.")]
        pub fn $resolve(&mut self, name: &str) -> Result<Option<RefId>, ResolveError> {
            if let Some(id) = self.$field.seeded(name) {
                return Ok(Some(id));
            }

            if self.$field.needs_select() {
                Self::select_plain($kind, &self.store, &mut self.$field)?;
            }

            Ok(self.$field.lookup(name))
        }

        #[doc = concat!(
            "Discard resolved ",
            $label,
            " references so the next resolve re-reads the store."
        )]
        pub fn $invalidate(&mut self) {
            sink::record(MetricsEvent::Invalidate { kind: $kind });
            self.$field.invalidate();
        }
    };
}

macro_rules! owned_kind_api {
    (
        kind: $kind:expr,
        field: $field:ident,
        label: $label:literal,
        add: $add:ident,
        add_ref: $add_ref:ident,
        resolve: $resolve:ident,
        invalidate: $invalidate:ident,
        select: $select:ident,
    ) => {
        #[doc = concat!(
            "Queue owner-qualified ",
            $label,
            " names for the next batched select."
        )]
        pub fn $add<I, N>(&mut self, names: I)
        where
            I: IntoIterator<Item = N>,
            N: Into<OwnedName>,
        {
            self.$field.add(names.into_iter().map(Into::into));
        }

        #[doc = concat!("Associate `(owner, name)` of a ", $label, " with a known identifier.")]
        pub fn $add_ref(&mut self, owner: RefId, name: impl Into<String>, id: RefId) {
            sink::record(MetricsEvent::Seed { kind: $kind });
            self.$field.seed(OwnedKey::new(owner, name), id);
        }

        #[doc = concat!(
            "Resolve a ",
            $label,
            " under its resolved owner; `Ok(None)` is resolved-as-not-found."
        )]
        pub fn $resolve(&mut self, owner: RefId, name: &str) -> Result<Option<RefId>, ResolveError> {
            let key = OwnedKey::new(owner, name);

            if let Some(id) = self.$field.seeded(&key) {
                return Ok(Some(id));
            }

            if self.$field.needs_select() {
                self.$select()?;
            }

            Ok(self.$field.lookup(&key))
        }

        #[doc = concat!(
            "Discard resolved ",
            $label,
            " references so the next resolve re-reads the store."
        )]
        pub fn $invalidate(&mut self) {
            sink::record(MetricsEvent::Invalidate { kind: $kind });
            self.$field.invalidate();
        }

        fn $select(&mut self) -> Result<(), ResolveError> {
            let pending = self.$field.take_pending();
            if pending.is_empty() {
                self.$field.mark_loaded();
                return Ok(());
            }

            match self.fetch_owned($kind, &pending) {
                Ok(rows) => {
                    self.$field.load(rows);
                    self.$field.mark_loaded();
                    Ok(())
                }
                Err(err) => {
                    self.$field.restore_pending(pending);
                    Err(err)
                }
            }
        }
    };
}

mod chained;
mod owned;
mod trigger;


use crate::{
    cache::RefCache,
    error::ResolveError,
    id::RefId,
    interface::InterfaceCache,
    key::{OwnedKey, OwnedName, PrototypeKey, PrototypeName, StepKey, StepName, TriggerKey},
    kind::RefKind,
    obs::sink::{self, MetricsEvent},
    store::{ExpressionResolver, IdentityExpressions, ReferenceStore},
};
use log::debug;

///
/// Referencer
///
/// Per-entity-kind reference caches over one injected store executor.
/// Single-threaded and synchronous: every resolve either answers from
/// memory or blocks for exactly one batched select.
///

pub struct Referencer<S, X = IdentityExpressions> {
    store: S,
    expressions: X,

    // plain name keys
    groups: RefCache<String>,
    templates: RefCache<String>,
    hosts: RefCache<String>,
    icon_maps: RefCache<String>,
    maps: RefCache<String>,
    proxies: RefCache<String>,

    // owner-qualified keys
    items: RefCache<OwnedName, OwnedKey>,
    value_maps: RefCache<OwnedName, OwnedKey>,
    graphs: RefCache<OwnedName, OwnedKey>,
    dashboards: RefCache<OwnedName, OwnedKey>,
    macros: RefCache<OwnedName, OwnedKey>,
    web_scenarios: RefCache<OwnedName, OwnedKey>,

    // textual and chained keys
    triggers: RefCache<TriggerKey>,
    host_prototypes: RefCache<PrototypeName, PrototypeKey>,
    web_steps: RefCache<StepName, StepKey>,

    interfaces: InterfaceCache,
}

impl<S: ReferenceStore> Referencer<S> {
    /// Referencer over a store whose trigger expressions are already in
    /// canonical textual form.
    pub fn new(store: S) -> Self {
        Self::with_expressions(store, IdentityExpressions)
    }
}

impl<S: ReferenceStore, X: ExpressionResolver> Referencer<S, X> {
    pub fn with_expressions(store: S, expressions: X) -> Self {
        Self {
            store,
            expressions,
            groups: RefCache::new(),
            templates: RefCache::new(),
            hosts: RefCache::new(),
            icon_maps: RefCache::new(),
            maps: RefCache::new(),
            proxies: RefCache::new(),
            items: RefCache::new(),
            value_maps: RefCache::new(),
            graphs: RefCache::new(),
            dashboards: RefCache::new(),
            macros: RefCache::new(),
            web_scenarios: RefCache::new(),
            triggers: RefCache::new(),
            host_prototypes: RefCache::new(),
            web_steps: RefCache::new(),
            interfaces: InterfaceCache::new(),
        }
    }

    // ── Plain name-keyed kinds ─────────────────────────────────────

    plain_kind_api! {
        kind: RefKind::Group,
        field: groups,
        label: "group",
        add: add_groups,
        add_ref: add_group_ref,
        resolve: resolve_group,
        invalidate: invalidate_groups,
    }

    plain_kind_api! {
        kind: RefKind::Template,
        field: templates,
        label: "template",
        add: add_templates,
        add_ref: add_template_ref,
        resolve: resolve_template,
        invalidate: invalidate_templates,
    }

    plain_kind_api! {
        kind: RefKind::Host,
        field: hosts,
        label: "host",
        add: add_hosts,
        add_ref: add_host_ref,
        resolve: resolve_host,
        invalidate: invalidate_hosts,
    }

    plain_kind_api! {
        kind: RefKind::IconMap,
        field: icon_maps,
        label: "icon map",
        add: add_icon_maps,
        add_ref: add_icon_map_ref,
        resolve: resolve_icon_map,
        invalidate: invalidate_icon_maps,
    }

    plain_kind_api! {
        kind: RefKind::Map,
        field: maps,
        label: "map",
        add: add_maps,
        add_ref: add_map_ref,
        resolve: resolve_map,
        invalidate: invalidate_maps,
    }

    plain_kind_api! {
        kind: RefKind::Proxy,
        field: proxies,
        label: "proxy",
        add: add_proxies,
        add_ref: add_proxy_ref,
        resolve: resolve_proxy,
        invalidate: invalidate_proxies,
    }

    /// Resolve a name against the union of templates and hosts,
    /// template first. Owner-qualified selects use this to turn an
    /// owner name into an owner identifier.
    pub fn resolve_host_or_template(&mut self, name: &str) -> Result<Option<RefId>, ResolveError> {
        if let Some(id) = self.resolve_template(name)? {
            return Ok(Some(id));
        }

        self.resolve_host(name)
    }

    // ── Interface sub-cache ────────────────────────────────────────

    /// Seed one `(host, tag)` interface reference. Interfaces are never
    /// fetched; the orchestrator pre-populates them.
    pub fn add_interface_ref(&mut self, host: RefId, tag: impl Into<String>, id: RefId) {
        sink::record(MetricsEvent::Seed {
            kind: RefKind::Interface,
        });
        self.interfaces.insert(host, tag, id);
    }

    /// Pure lookup; `None` is a terminal not-found.
    #[must_use]
    pub fn resolve_interface(&self, host: RefId, tag: &str) -> Option<RefId> {
        self.interfaces.get(host, tag)
    }

    // ── Shared select machinery ────────────────────────────────────

    fn select_plain(
        kind: RefKind,
        store: &S,
        cache: &mut RefCache<String>,
    ) -> Result<(), ResolveError> {
        let pending = cache.take_pending();
        if pending.is_empty() {
            cache.mark_loaded();
            return Ok(());
        }

        debug!("selecting {} {kind} name(s)", pending.len());

        match store.select_names(kind, &pending) {
            Ok(rows) => {
                sink::record(MetricsEvent::Select {
                    kind,
                    rows: rows.len() as u64,
                });
                cache.load(rows.into_iter().map(|row| (row.name, row.id)));
                cache.mark_loaded();
                Ok(())
            }
            Err(err) => {
                cache.restore_pending(pending);
                Err(ResolveError::new(kind, err))
            }
        }
    }
}
