use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// RefId
///
/// Durable identifier assigned by the persistent store. The resolver
/// never mints these; they only enter through store rows or through
/// the orchestrator seeding a freshly created entity.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[display("{_0}")]
pub struct RefId(u64);

impl RefId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for RefId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
