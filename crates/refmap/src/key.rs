use crate::id::RefId;
use serde::{Deserialize, Serialize};

///
/// OwnedName
///
/// Pending partial key for an owner-qualified kind: the owner is still
/// a document name because it has not been resolved yet. The select
/// driver turns the owner segment into a [`RefId`] (via
/// host-or-template resolution) before the batched query runs.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct OwnedName {
    pub owner: String,
    pub name: String,
}

impl OwnedName {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl<O: Into<String>, N: Into<String>> From<(O, N)> for OwnedName {
    fn from((owner, name): (O, N)) -> Self {
        Self::new(owner, name)
    }
}

///
/// OwnedKey
///
/// Fully resolved key for an owner-qualified kind.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct OwnedKey {
    pub owner: RefId,
    pub name: String,
}

impl OwnedKey {
    pub fn new(owner: RefId, name: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
        }
    }
}

///
/// TriggerKey
///
/// Trigger identity as it appears textually in the imported document.
/// Stored rows carry expressions in resolved form; they are run
/// through the expression-resolution transform before being compared
/// against this key, and all three fields must match exactly.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct TriggerKey {
    pub description: String,
    pub expression: String,
    pub recovery_expression: String,
}

impl TriggerKey {
    pub fn new(
        description: impl Into<String>,
        expression: impl Into<String>,
        recovery_expression: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            expression: expression.into(),
            recovery_expression: recovery_expression.into(),
        }
    }
}

impl<D: Into<String>, E: Into<String>, R: Into<String>> From<(D, E, R)> for TriggerKey {
    fn from((description, expression, recovery_expression): (D, E, R)) -> Self {
        Self::new(description, expression, recovery_expression)
    }
}

///
/// PrototypeName
///
/// Pending key for a host prototype: owning host and discovery rule
/// are both document names. Resolution chains through host-or-template
/// and then through the Item cache for the rule key.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PrototypeName {
    pub host: String,
    pub discovery_rule: String,
    pub name: String,
}

impl PrototypeName {
    pub fn new(
        host: impl Into<String>,
        discovery_rule: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            discovery_rule: discovery_rule.into(),
            name: name.into(),
        }
    }
}

impl<H: Into<String>, D: Into<String>, N: Into<String>> From<(H, D, N)> for PrototypeName {
    fn from((host, discovery_rule, name): (H, D, N)) -> Self {
        Self::new(host, discovery_rule, name)
    }
}

///
/// PrototypeKey
///
/// Fully resolved host prototype key: `(host-id, discovery-rule-item-id, name)`.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PrototypeKey {
    pub host: RefId,
    pub discovery_rule: RefId,
    pub name: String,
}

impl PrototypeKey {
    pub fn new(host: RefId, discovery_rule: RefId, name: impl Into<String>) -> Self {
        Self {
            host,
            discovery_rule,
            name: name.into(),
        }
    }
}

///
/// StepName
///
/// Pending key for a web scenario step: owning host and scenario are
/// document names, resolved through host-or-template and the
/// WebScenario cache respectively.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct StepName {
    pub host: String,
    pub scenario: String,
    pub name: String,
}

impl StepName {
    pub fn new(
        host: impl Into<String>,
        scenario: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            scenario: scenario.into(),
            name: name.into(),
        }
    }
}

impl<H: Into<String>, S: Into<String>, N: Into<String>> From<(H, S, N)> for StepName {
    fn from((host, scenario, name): (H, S, N)) -> Self {
        Self::new(host, scenario, name)
    }
}

///
/// StepKey
///
/// Fully resolved web scenario step key: `(host-id, scenario-id, name)`.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct StepKey {
    pub host: RefId,
    pub scenario: RefId,
    pub name: String,
}

impl StepKey {
    pub fn new(host: RefId, scenario: RefId, name: impl Into<String>) -> Self {
        Self {
            host,
            scenario,
            name: name.into(),
        }
    }
}
