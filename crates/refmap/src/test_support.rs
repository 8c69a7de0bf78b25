//! In-memory store and expression fixtures for resolver tests.

use crate::{
    error::StoreError,
    id::RefId,
    kind::RefKind,
    store::{
        DiscoveryFlag, ExpressionResolver, NamedRow, OwnedRow, OwnerClause, PrototypeClause,
        PrototypeRow, ReferenceStore, StepClause, StepRow, TriggerFilter, TriggerRow,
    },
};
use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
    rc::Rc,
};

pub(crate) fn rid(n: u64) -> RefId {
    RefId::new(n)
}

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

///
/// SelectCall
///
/// One recorded executor invocation, exactly as the resolver issued it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum SelectCall {
    Names {
        kind: RefKind,
        names: BTreeSet<String>,
    },
    Owned {
        kind: RefKind,
        clauses: Vec<OwnerClause>,
    },
    Triggers {
        descriptions: BTreeSet<String>,
    },
    Prototypes {
        clauses: Vec<PrototypeClause>,
    },
    Steps {
        clauses: Vec<StepClause>,
    },
}

impl SelectCall {
    pub fn kind(&self) -> RefKind {
        match self {
            Self::Names { kind, .. } | Self::Owned { kind, .. } => *kind,
            Self::Triggers { .. } => RefKind::Trigger,
            Self::Prototypes { .. } => RefKind::HostPrototype,
            Self::Steps { .. } => RefKind::WebScenarioStep,
        }
    }
}

#[derive(Default)]
struct MemoryState {
    names: BTreeMap<RefKind, BTreeMap<String, RefId>>,
    owned: BTreeMap<RefKind, BTreeMap<(RefId, String), RefId>>,
    triggers: Vec<(TriggerRow, DiscoveryFlag)>,
    prototypes: Vec<PrototypeRow>,
    steps: Vec<StepRow>,
    calls: Vec<SelectCall>,
    fail_next: Option<StoreError>,
}

///
/// MemoryStore
///
/// Shared-handle in-memory `ReferenceStore`. Tests keep a clone of the
/// handle to mutate rows mid-run (invalidate round trips) and to
/// inspect the call log afterwards.
///

#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_name(&self, kind: RefKind, name: &str, id: u64) {
        self.state
            .borrow_mut()
            .names
            .entry(kind)
            .or_default()
            .insert(name.to_string(), rid(id));
    }

    pub fn remove_name(&self, kind: RefKind, name: &str) {
        if let Some(rows) = self.state.borrow_mut().names.get_mut(&kind) {
            rows.remove(name);
        }
    }

    pub fn put_owned(&self, kind: RefKind, owner: u64, name: &str, id: u64) {
        self.state
            .borrow_mut()
            .owned
            .entry(kind)
            .or_default()
            .insert((rid(owner), name.to_string()), rid(id));
    }

    pub fn put_trigger(
        &self,
        id: u64,
        description: &str,
        expression: &str,
        recovery_expression: &str,
        flag: DiscoveryFlag,
    ) {
        self.state.borrow_mut().triggers.push((
            TriggerRow {
                id: rid(id),
                description: description.to_string(),
                expression: expression.to_string(),
                recovery_expression: recovery_expression.to_string(),
            },
            flag,
        ));
    }

    pub fn put_prototype(&self, id: u64, parent_host: u64, parent_item: u64, name: &str) {
        self.state.borrow_mut().prototypes.push(PrototypeRow {
            id: rid(id),
            parent_host: rid(parent_host),
            parent_item: rid(parent_item),
            name: name.to_string(),
        });
    }

    pub fn put_step(&self, id: u64, host: u64, scenario: u64, name: &str) {
        self.state.borrow_mut().steps.push(StepRow {
            id: rid(id),
            host: rid(host),
            scenario: rid(scenario),
            name: name.to_string(),
        });
    }

    /// Make the next executor call fail with `err`.
    pub fn fail_next(&self, err: StoreError) {
        self.state.borrow_mut().fail_next = Some(err);
    }

    pub fn calls(&self) -> Vec<SelectCall> {
        self.state.borrow().calls.clone()
    }

    pub fn select_count(&self, kind: RefKind) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| call.kind() == kind)
            .count()
    }

    fn take_failure(&self) -> Option<StoreError> {
        self.state.borrow_mut().fail_next.take()
    }

    fn record(&self, call: SelectCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl ReferenceStore for MemoryStore {
    fn select_names(
        &self,
        kind: RefKind,
        names: &BTreeSet<String>,
    ) -> Result<Vec<NamedRow>, StoreError> {
        self.record(SelectCall::Names {
            kind,
            names: names.clone(),
        });
        if let Some(err) = self.take_failure() {
            return Err(err);
        }

        let state = self.state.borrow();
        let rows = state.names.get(&kind).into_iter().flatten();

        Ok(rows
            .filter(|(name, _)| names.contains(name.as_str()))
            .map(|(name, id)| NamedRow {
                id: *id,
                name: name.clone(),
            })
            .collect())
    }

    fn select_owned(
        &self,
        kind: RefKind,
        clauses: &[OwnerClause],
    ) -> Result<Vec<OwnedRow>, StoreError> {
        self.record(SelectCall::Owned {
            kind,
            clauses: clauses.to_vec(),
        });
        if let Some(err) = self.take_failure() {
            return Err(err);
        }

        let state = self.state.borrow();
        let rows = state.owned.get(&kind).into_iter().flatten();

        Ok(rows
            .filter(|((owner, name), _)| {
                clauses
                    .iter()
                    .any(|clause| clause.owner == *owner && clause.names.contains(name))
            })
            .map(|((owner, name), id)| OwnedRow {
                id: *id,
                owner: *owner,
                name: name.clone(),
            })
            .collect())
    }

    fn select_triggers(&self, filter: &TriggerFilter) -> Result<Vec<TriggerRow>, StoreError> {
        self.record(SelectCall::Triggers {
            descriptions: filter.descriptions.clone(),
        });
        if let Some(err) = self.take_failure() {
            return Err(err);
        }

        let state = self.state.borrow();

        Ok(state
            .triggers
            .iter()
            .filter(|(row, flag)| {
                filter.descriptions.contains(&row.description) && filter.flags.contains(flag)
            })
            .map(|(row, _)| row.clone())
            .collect())
    }

    fn select_host_prototypes(
        &self,
        clauses: &[PrototypeClause],
    ) -> Result<Vec<PrototypeRow>, StoreError> {
        self.record(SelectCall::Prototypes {
            clauses: clauses.to_vec(),
        });
        if let Some(err) = self.take_failure() {
            return Err(err);
        }

        let state = self.state.borrow();

        Ok(state
            .prototypes
            .iter()
            .filter(|row| {
                clauses.iter().any(|clause| {
                    clause.parent_item == row.parent_item && clause.names.contains(&row.name)
                })
            })
            .cloned()
            .collect())
    }

    fn select_web_steps(&self, clauses: &[StepClause]) -> Result<Vec<StepRow>, StoreError> {
        self.record(SelectCall::Steps {
            clauses: clauses.to_vec(),
        });
        if let Some(err) = self.take_failure() {
            return Err(err);
        }

        let state = self.state.borrow();

        Ok(state
            .steps
            .iter()
            .filter(|row| {
                clauses
                    .iter()
                    .any(|clause| clause.scenario == row.scenario && clause.names.contains(&row.name))
            })
            .cloned()
            .collect())
    }
}

///
/// MapExpressions
///
/// Expression transform backed by an explicit stored → canonical map;
/// unknown expressions pass through unchanged.
///

#[derive(Clone, Debug, Default)]
pub(crate) struct MapExpressions {
    map: BTreeMap<String, String>,
}

impl MapExpressions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, stored: &str, canonical: &str) -> Self {
        self.map.insert(stored.to_string(), canonical.to_string());
        self
    }
}

impl ExpressionResolver for MapExpressions {
    fn canonical_expression(&self, stored: &str) -> String {
        self.map
            .get(stored)
            .cloned()
            .unwrap_or_else(|| stored.to_string())
    }
}
