use crate::{error::StoreError, id::RefId, kind::RefKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

///
/// DiscoveryFlag
///
/// Provenance a stored trigger row may carry. Rule rows (the discovery
/// rules themselves) are never matched during import; everything else
/// is.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum DiscoveryFlag {
    /// Plain, hand-created row.
    Normal,
    /// A discovery rule.
    Rule,
    /// A prototype generated under a discovery rule.
    Prototype,
    /// A row previously created by discovery.
    Discovered,
}

impl DiscoveryFlag {
    /// Flag set admissible when matching triggers against an imported
    /// document.
    pub const IMPORTABLE: [Self; 3] = [Self::Normal, Self::Prototype, Self::Discovered];
}

///
/// NamedRow
///
/// Store row for a plain name-keyed kind.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NamedRow {
    pub id: RefId,
    pub name: String,
}

///
/// OwnedRow
///
/// Store row for an owner-qualified kind.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OwnedRow {
    pub id: RefId,
    pub owner: RefId,
    pub name: String,
}

///
/// TriggerRow
///
/// Store row for a trigger, expressions still in stored (resolved
/// identifier) form. The resolver canonicalizes them before matching.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TriggerRow {
    pub id: RefId,
    pub description: String,
    pub expression: String,
    pub recovery_expression: String,
}

///
/// PrototypeRow
///
/// Store row for a host prototype, joined through the discovery
/// linkage: `parent_host` owns the discovery rule `parent_item`, which
/// generated the prototype.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PrototypeRow {
    pub id: RefId,
    pub parent_host: RefId,
    pub parent_item: RefId,
    pub name: String,
}

///
/// StepRow
///
/// Store row for a web scenario step, joined through scenario
/// ownership so the owning host comes back with the row.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct StepRow {
    pub id: RefId,
    pub host: RefId,
    pub scenario: RefId,
    pub name: String,
}

///
/// OwnerClause
///
/// One disjunct of an owner-qualified batched query:
/// `(owner = X AND name IN {...})`. All clauses for a kind go out in a
/// single round trip.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OwnerClause {
    pub owner: RefId,
    pub names: BTreeSet<String>,
}

///
/// PrototypeClause
///
/// One disjunct of the host prototype query, scoped to a resolved
/// discovery rule item.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PrototypeClause {
    pub parent_item: RefId,
    pub names: BTreeSet<String>,
}

///
/// StepClause
///
/// One disjunct of the web scenario step query, scoped to a resolved
/// scenario.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct StepClause {
    pub scenario: RefId,
    pub names: BTreeSet<String>,
}

///
/// TriggerFilter
///
/// Batched trigger query: candidate descriptions plus the admissible
/// discovery flags.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TriggerFilter {
    pub descriptions: BTreeSet<String>,
    pub flags: Vec<DiscoveryFlag>,
}

///
/// ReferenceStore
///
/// The batched-equality query executor the resolver is layered over.
/// The resolver issues at most one call per kind per load; clause
/// grouping guarantees one round trip regardless of owner count.
///
/// Kind-specific predicates that do not vary per call (for example
/// which host classes are importable) are the implementation's
/// concern, keyed off `kind`.
///

pub trait ReferenceStore {
    /// All rows of `kind` whose name is in `names`.
    fn select_names(&self, kind: RefKind, names: &BTreeSet<String>)
    -> Result<Vec<NamedRow>, StoreError>;

    /// All rows of `kind` matching any `(owner, name)` clause.
    fn select_owned(
        &self,
        kind: RefKind,
        clauses: &[OwnerClause],
    ) -> Result<Vec<OwnedRow>, StoreError>;

    /// All triggers matching the description set and flag filter.
    fn select_triggers(&self, filter: &TriggerFilter) -> Result<Vec<TriggerRow>, StoreError>;

    /// All host prototypes under any of the resolved discovery rules,
    /// joined through discovery linkage and item ownership.
    fn select_host_prototypes(
        &self,
        clauses: &[PrototypeClause],
    ) -> Result<Vec<PrototypeRow>, StoreError>;

    /// All web scenario steps under any of the resolved scenarios.
    fn select_web_steps(&self, clauses: &[StepClause]) -> Result<Vec<StepRow>, StoreError>;
}

///
/// ExpressionResolver
///
/// Macro/expression-resolution transform converting a stored trigger
/// expression into the textual canonical form used by imported
/// documents. Applied to both the expression and the recovery
/// expression of every candidate row before matching.
///

pub trait ExpressionResolver {
    fn canonical_expression(&self, stored: &str) -> String;
}

///
/// IdentityExpressions
///
/// Pass-through transform for stores that already hold canonical text.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityExpressions;

impl ExpressionResolver for IdentityExpressions {
    fn canonical_expression(&self, stored: &str) -> String {
        stored.to_string()
    }
}
