use crate::kind::RefKind;
use thiserror::Error as ThisError;

///
/// ErrorClass
///
/// Stable classification for resolver failures. `Unavailable` failures
/// are retriable: the failing kind stays unloaded, so a later resolve
/// re-attempts the select.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Unavailable,
    Internal,
}

///
/// StoreError
///
/// Failure surfaced by the injected batched-equality executor. The
/// resolver performs no retries; the error propagates unchanged to the
/// caller that triggered the select.
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),
}

impl StoreError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Unavailable(_) => ErrorClass::Unavailable,
            Self::Query(_) => ErrorClass::Internal,
        }
    }
}

///
/// ResolveError
///
/// A batched select failed for one entity kind. The kind's pending set
/// is restored before this is returned, so the select can be retried.
///

#[derive(Debug, ThisError)]
#[error("select for {kind} failed: {source}")]
pub struct ResolveError {
    pub kind: RefKind,
    #[source]
    pub source: StoreError,
}

impl ResolveError {
    pub(crate) const fn new(kind: RefKind, source: StoreError) -> Self {
        Self { kind, source }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        self.source.class()
    }
}
