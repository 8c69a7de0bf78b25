//! Owner-qualified kinds: item, value map, graph, template dashboard,
//! macro, web scenario.
//!
//! All six share one select driver: distinct owner names resolve
//! through host-or-template first, surviving names group into one
//! clause per owner identifier, and the whole batch goes out in a
//! single round trip. An owner that does not resolve contributes no
//! clause; its names are implicitly unresolved once the kind is
//! loaded. That is policy, not an error: one broken owner must not
//! abort the batch.

use super::Referencer;
use crate::{
    error::ResolveError,
    id::RefId,
    key::{OwnedKey, OwnedName},
    kind::RefKind,
    obs::sink::{self, MetricsEvent},
    store::{ExpressionResolver, OwnerClause, ReferenceStore},
};
use log::{debug, trace};
use std::collections::{BTreeMap, BTreeSet};

impl<S: ReferenceStore, X: ExpressionResolver> Referencer<S, X> {
    owned_kind_api! {
        kind: RefKind::Item,
        field: items,
        label: "item",
        add: add_items,
        add_ref: add_item_ref,
        resolve: resolve_item,
        invalidate: invalidate_items,
        select: select_items,
    }

    owned_kind_api! {
        kind: RefKind::ValueMap,
        field: value_maps,
        label: "value map",
        add: add_value_maps,
        add_ref: add_value_map_ref,
        resolve: resolve_value_map,
        invalidate: invalidate_value_maps,
        select: select_value_maps,
    }

    owned_kind_api! {
        kind: RefKind::Graph,
        field: graphs,
        label: "graph",
        add: add_graphs,
        add_ref: add_graph_ref,
        resolve: resolve_graph,
        invalidate: invalidate_graphs,
        select: select_graphs,
    }

    owned_kind_api! {
        kind: RefKind::TemplateDashboard,
        field: dashboards,
        label: "template dashboard",
        add: add_template_dashboards,
        add_ref: add_template_dashboard_ref,
        resolve: resolve_template_dashboard,
        invalidate: invalidate_template_dashboards,
        select: select_template_dashboards,
    }

    owned_kind_api! {
        kind: RefKind::Macro,
        field: macros,
        label: "macro",
        add: add_macros,
        add_ref: add_macro_ref,
        resolve: resolve_macro,
        invalidate: invalidate_macros,
        select: select_macros,
    }

    owned_kind_api! {
        kind: RefKind::WebScenario,
        field: web_scenarios,
        label: "web scenario",
        add: add_web_scenarios,
        add_ref: add_web_scenario_ref,
        resolve: resolve_web_scenario,
        invalidate: invalidate_web_scenarios,
        select: select_web_scenarios,
    }

    /// Ensure item references are loaded. Orchestrators call this
    /// before a burst of item lookups (e.g. while wiring triggers) to
    /// pay the fetch once at a predictable point.
    pub fn prime_items(&mut self) -> Result<(), ResolveError> {
        if self.items.needs_select() {
            self.select_items()?;
        }

        Ok(())
    }

    /// Resolve owners and run the single batched owner-claused query
    /// for one kind. Returns fully-keyed rows ready for the cache.
    fn fetch_owned(
        &mut self,
        kind: RefKind,
        pending: &BTreeSet<OwnedName>,
    ) -> Result<Vec<(OwnedKey, RefId)>, ResolveError> {
        let mut grouped: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
        for entry in pending {
            grouped
                .entry(entry.owner.as_str())
                .or_default()
                .insert(entry.name.clone());
        }

        let mut clauses = Vec::new();
        for (owner, names) in grouped {
            match self.resolve_host_or_template(owner)? {
                Some(owner_id) => clauses.push(OwnerClause {
                    owner: owner_id,
                    names,
                }),
                None => trace!("dropping {} {kind} name(s): owner {owner:?} unresolved", names.len()),
            }
        }

        if clauses.is_empty() {
            return Ok(Vec::new());
        }

        debug!("selecting {kind} names across {} owner(s)", clauses.len());

        let rows = self
            .store
            .select_owned(kind, &clauses)
            .map_err(|err| ResolveError::new(kind, err))?;

        sink::record(MetricsEvent::Select {
            kind,
            rows: rows.len() as u64,
        });

        Ok(rows
            .into_iter()
            .map(|row| (OwnedKey::new(row.owner, row.name), row.id))
            .collect())
    }
}
