use serde::{Deserialize, Serialize};
use std::fmt;

///
/// RefKind
///
/// The categories of importable configuration object. Every kind owns
/// an independent pending/loaded cache; the dependency edges between
/// kinds (owner-qualified and chained keys) live in the resolver, not
/// here.
///
/// `Interface` is listed for labelling only: its cache is seeded by
/// the orchestrator and never reaches the store executor.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum RefKind {
    Group,
    Template,
    Host,
    Item,
    ValueMap,
    Trigger,
    Graph,
    IconMap,
    Map,
    TemplateDashboard,
    Macro,
    Proxy,
    HostPrototype,
    WebScenario,
    WebScenarioStep,
    Interface,
}

impl RefKind {
    pub const ALL: [Self; 16] = [
        Self::Group,
        Self::Template,
        Self::Host,
        Self::Item,
        Self::ValueMap,
        Self::Trigger,
        Self::Graph,
        Self::IconMap,
        Self::Map,
        Self::TemplateDashboard,
        Self::Macro,
        Self::Proxy,
        Self::HostPrototype,
        Self::WebScenario,
        Self::WebScenarioStep,
        Self::Interface,
    ];

    /// Stable label used in logs and metrics reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Template => "template",
            Self::Host => "host",
            Self::Item => "item",
            Self::ValueMap => "value_map",
            Self::Trigger => "trigger",
            Self::Graph => "graph",
            Self::IconMap => "icon_map",
            Self::Map => "map",
            Self::TemplateDashboard => "template_dashboard",
            Self::Macro => "macro",
            Self::Proxy => "proxy",
            Self::HostPrototype => "host_prototype",
            Self::WebScenario => "web_scenario",
            Self::WebScenarioStep => "web_scenario_step",
            Self::Interface => "interface",
        }
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
