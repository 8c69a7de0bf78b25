//! Batched, lazily-populated reference resolution for bulk
//! configuration imports.
//!
//! An imported document refers to everything by human-readable name;
//! the persistent store works in durable identifiers. [`Referencer`]
//! accumulates every name the import will need, defers lookups until
//! the first resolution request for a kind, then resolves the whole
//! accumulated set in a single batched query against an injected
//! [`ReferenceStore`]. Later requests for the same kind are answered
//! from memory until the caller invalidates it.
//!
//! ## Crate layout
//! - `cache`: the generic pending/loaded state machine shared by every
//!   entity kind.
//! - `resolver`: the per-kind surface (`add`, `add_*_ref`, `resolve_*`,
//!   `invalidate_*`) and the batched select drivers.
//! - `store`: the executor and expression-resolution traits the crate
//!   consumes from its environment, plus row and clause types.
//! - `interface`: the pre-populated host/interface sub-cache.
//! - `obs`: per-kind select and cache telemetry.

mod cache;
mod error;
mod id;
mod interface;
mod key;
mod kind;
pub mod obs;
mod resolver;
mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{ErrorClass, ResolveError, StoreError};
pub use id::RefId;
pub use interface::InterfaceCache;
pub use key::{OwnedKey, OwnedName, PrototypeKey, PrototypeName, StepKey, StepName, TriggerKey};
pub use kind::RefKind;
pub use resolver::Referencer;
pub use store::{
    DiscoveryFlag, ExpressionResolver, IdentityExpressions, NamedRow, OwnedRow, OwnerClause,
    PrototypeClause, PrototypeRow, ReferenceStore, StepClause, StepRow, TriggerFilter, TriggerRow,
};

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///
/// Domain vocabulary only; traits and row types stay one level down.
///

pub mod prelude {
    pub use crate::{
        OwnedName, PrototypeName, RefId, RefKind, Referencer, ResolveError, StepName, TriggerKey,
    };
}
