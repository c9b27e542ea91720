//! Durable storage contract for event documents.
//!
//! The store holds one document per event and guards writes with optimistic
//! concurrency: every load returns a [`Version`], and a commit succeeds only
//! if the stored version still matches. A [`StoreError::VersionConflict`]
//! tells the engine a concurrent writer won and the whole decision must be
//! re-derived from a fresh load.

use crate::roster::MatchEvent;
use crate::types::EventId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Monotonic document version used for compare-and-swap commits
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version(u64);

impl Version {
    /// The version a document has when first inserted
    #[must_use]
    pub const fn initial() -> Self {
        Self(0)
    }

    /// Constructs a version from a raw counter
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw counter value
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The version a successful commit at this version produces
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Errors from the roster store
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document exists for the requested event
    #[error("event {event_id} not found")]
    NotFound {
        /// The missing event
        event_id: EventId,
    },

    /// A document already exists for the event being inserted
    #[error("event {event_id} already exists")]
    AlreadyExists {
        /// The conflicting event
        event_id: EventId,
    },

    /// The commit lost a compare-and-swap race
    #[error("version conflict: expected {expected}, found {actual}")]
    VersionConflict {
        /// The version the commit was predicated on
        expected: Version,
        /// The version actually stored
        actual: Version,
    },

    /// The document could not be serialized or deserialized
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The backing store failed
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Boxed future returned by store operations
pub type StoreFuture<T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send>>;

/// Versioned document store for [`MatchEvent`]s.
///
/// Dyn-compatible so the engine can hold a trait object; implementations
/// return boxed futures for that reason.
pub trait RosterStore: Send + Sync {
    /// Loads a document together with its current version.
    fn load(&self, event_id: EventId) -> StoreFuture<(MatchEvent, Version)>;

    /// Writes a document, predicated on `expected` still being the stored
    /// version. Returns the new version on success.
    fn commit(&self, expected: Version, document: MatchEvent) -> StoreFuture<Version>;

    /// Inserts a brand-new document, failing if one already exists.
    fn insert(&self, document: MatchEvent) -> StoreFuture<Version>;

    /// Lists the identifiers of all stored events.
    fn list_events(&self) -> StoreFuture<Vec<EventId>>;
}
