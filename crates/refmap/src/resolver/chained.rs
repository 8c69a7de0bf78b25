//! Double-chained kinds: host prototypes and web scenario steps.
//!
//! A host prototype key embeds a discovery-rule item id, itself the
//! result of resolving an item under the owning host. A web scenario
//! step embeds a scenario id resolved the same way. Either link in the
//! chain failing drops the candidate from the batched query; the
//! candidate then resolves to not-found rather than raising an error.

use super::Referencer;
use crate::{
    error::ResolveError,
    id::RefId,
    key::{PrototypeKey, PrototypeName, StepKey, StepName},
    kind::RefKind,
    obs::sink::{self, MetricsEvent},
    store::{ExpressionResolver, PrototypeClause, ReferenceStore, StepClause},
};
use log::{debug, trace};
use std::collections::{BTreeMap, BTreeSet};

impl<S: ReferenceStore, X: ExpressionResolver> Referencer<S, X> {
    // ── Host prototypes ────────────────────────────────────────────

    /// Queue host prototype names (host, discovery rule, prototype) for
    /// the next batched select.
    pub fn add_host_prototypes<I, N>(&mut self, names: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<PrototypeName>,
    {
        self.host_prototypes.add(names.into_iter().map(Into::into));
    }

    /// Associate a resolved prototype key with a known identifier.
    pub fn add_host_prototype_ref(
        &mut self,
        host: RefId,
        discovery_rule: RefId,
        name: impl Into<String>,
        id: RefId,
    ) {
        sink::record(MetricsEvent::Seed {
            kind: RefKind::HostPrototype,
        });
        self.host_prototypes
            .seed(PrototypeKey::new(host, discovery_rule, name), id);
    }

    /// Resolve a host prototype under its resolved host and discovery
    /// rule; `Ok(None)` is resolved-as-not-found.
    pub fn resolve_host_prototype(
        &mut self,
        host: RefId,
        discovery_rule: RefId,
        name: &str,
    ) -> Result<Option<RefId>, ResolveError> {
        let key = PrototypeKey::new(host, discovery_rule, name);

        if let Some(id) = self.host_prototypes.seeded(&key) {
            return Ok(Some(id));
        }

        if self.host_prototypes.needs_select() {
            self.select_host_prototypes()?;
        }

        Ok(self.host_prototypes.lookup(&key))
    }

    /// Discard resolved host prototype references so the next resolve
    /// re-reads the store.
    pub fn invalidate_host_prototypes(&mut self) {
        sink::record(MetricsEvent::Invalidate {
            kind: RefKind::HostPrototype,
        });
        self.host_prototypes.invalidate();
    }

    fn select_host_prototypes(&mut self) -> Result<(), ResolveError> {
        let pending = self.host_prototypes.take_pending();
        if pending.is_empty() {
            self.host_prototypes.mark_loaded();
            return Ok(());
        }

        match self.fetch_host_prototypes(&pending) {
            Ok(rows) => {
                self.host_prototypes.load(rows);
                self.host_prototypes.mark_loaded();
                Ok(())
            }
            Err(err) => {
                self.host_prototypes.restore_pending(pending);
                Err(err)
            }
        }
    }

    fn fetch_host_prototypes(
        &mut self,
        pending: &BTreeSet<PrototypeName>,
    ) -> Result<Vec<(PrototypeKey, RefId)>, ResolveError> {
        let mut grouped: BTreeMap<(&str, &str), BTreeSet<String>> = BTreeMap::new();
        for entry in pending {
            grouped
                .entry((entry.host.as_str(), entry.discovery_rule.as_str()))
                .or_default()
                .insert(entry.name.clone());
        }

        let mut clauses = Vec::new();
        for ((host, rule), names) in grouped {
            let Some(host_id) = self.resolve_host_or_template(host)? else {
                trace!("dropping host prototype name(s): host {host:?} unresolved");
                continue;
            };
            let Some(rule_id) = self.resolve_item(host_id, rule)? else {
                trace!("dropping host prototype name(s): discovery rule {rule:?} unresolved");
                continue;
            };

            clauses.push(PrototypeClause {
                parent_item: rule_id,
                names,
            });
        }

        if clauses.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            "selecting host prototypes across {} discovery rule(s)",
            clauses.len()
        );

        let rows = self
            .store
            .select_host_prototypes(&clauses)
            .map_err(|err| ResolveError::new(RefKind::HostPrototype, err))?;

        sink::record(MetricsEvent::Select {
            kind: RefKind::HostPrototype,
            rows: rows.len() as u64,
        });

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    PrototypeKey::new(row.parent_host, row.parent_item, row.name),
                    row.id,
                )
            })
            .collect())
    }

    // ── Web scenario steps ─────────────────────────────────────────

    /// Queue web scenario step names (host, scenario, step) for the
    /// next batched select.
    pub fn add_web_steps<I, N>(&mut self, names: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<StepName>,
    {
        self.web_steps.add(names.into_iter().map(Into::into));
    }

    /// Associate a resolved step key with a known identifier.
    pub fn add_web_step_ref(
        &mut self,
        host: RefId,
        scenario: RefId,
        name: impl Into<String>,
        id: RefId,
    ) {
        sink::record(MetricsEvent::Seed {
            kind: RefKind::WebScenarioStep,
        });
        self.web_steps.seed(StepKey::new(host, scenario, name), id);
    }

    /// Resolve a web scenario step under its resolved host and
    /// scenario; `Ok(None)` is resolved-as-not-found.
    pub fn resolve_web_step(
        &mut self,
        host: RefId,
        scenario: RefId,
        name: &str,
    ) -> Result<Option<RefId>, ResolveError> {
        let key = StepKey::new(host, scenario, name);

        if let Some(id) = self.web_steps.seeded(&key) {
            return Ok(Some(id));
        }

        if self.web_steps.needs_select() {
            self.select_web_steps()?;
        }

        Ok(self.web_steps.lookup(&key))
    }

    /// Discard resolved step references so the next resolve re-reads
    /// the store.
    pub fn invalidate_web_steps(&mut self) {
        sink::record(MetricsEvent::Invalidate {
            kind: RefKind::WebScenarioStep,
        });
        self.web_steps.invalidate();
    }

    fn select_web_steps(&mut self) -> Result<(), ResolveError> {
        let pending = self.web_steps.take_pending();
        if pending.is_empty() {
            self.web_steps.mark_loaded();
            return Ok(());
        }

        match self.fetch_web_steps(&pending) {
            Ok(rows) => {
                self.web_steps.load(rows);
                self.web_steps.mark_loaded();
                Ok(())
            }
            Err(err) => {
                self.web_steps.restore_pending(pending);
                Err(err)
            }
        }
    }

    fn fetch_web_steps(
        &mut self,
        pending: &BTreeSet<StepName>,
    ) -> Result<Vec<(StepKey, RefId)>, ResolveError> {
        let mut grouped: BTreeMap<(&str, &str), BTreeSet<String>> = BTreeMap::new();
        for entry in pending {
            grouped
                .entry((entry.host.as_str(), entry.scenario.as_str()))
                .or_default()
                .insert(entry.name.clone());
        }

        let mut clauses = Vec::new();
        for ((host, scenario), names) in grouped {
            let Some(host_id) = self.resolve_host_or_template(host)? else {
                trace!("dropping web step name(s): host {host:?} unresolved");
                continue;
            };
            let Some(scenario_id) = self.resolve_web_scenario(host_id, scenario)? else {
                trace!("dropping web step name(s): scenario {scenario:?} unresolved");
                continue;
            };

            clauses.push(StepClause {
                scenario: scenario_id,
                names,
            });
        }

        if clauses.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            "selecting web scenario steps across {} scenario(s)",
            clauses.len()
        );

        let rows = self
            .store
            .select_web_steps(&clauses)
            .map_err(|err| ResolveError::new(RefKind::WebScenarioStep, err))?;

        sink::record(MetricsEvent::Select {
            kind: RefKind::WebScenarioStep,
            rows: rows.len() as u64,
        });

        Ok(rows
            .into_iter()
            .map(|row| (StepKey::new(row.host, row.scenario, row.name), row.id))
            .collect())
    }
}
