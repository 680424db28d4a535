use hbnb_types::{Kind, Record, StoreKey};
use indexmap::IndexMap;

use crate::error::StoreResult;

/// The store's collection: composite key to record, in insertion order.
pub type Collection = IndexMap<StoreKey, Record>;

/// Outcome of a successful reload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReloadReport {
    /// Number of records registered from the backing file.
    pub loaded: usize,
}

/// Keyed record store.
///
/// All implementations must satisfy these invariants:
/// - At most one record per `(kind, id)` key.
/// - Iteration follows insertion order; removal keeps the order of the rest.
/// - In-memory changes are durable only after [`persist`](ObjectStore::persist).
/// - Persistence errors are propagated, never silently ignored.
pub trait ObjectStore {
    /// The live collection. Not a copy.
    fn all(&self) -> &Collection;

    /// Mutable access to the live collection. Changes here are store changes.
    fn all_mut(&mut self) -> &mut Collection;

    /// Insert a record at its key, replacing any record already there.
    ///
    /// No validation happens here; the record constructor guarantees a
    /// complete record.
    fn register(&mut self, record: Record) {
        self.all_mut().insert(record.key(), record);
    }

    /// Look up a record by key.
    fn get(&self, key: &StoreKey) -> Option<&Record> {
        self.all().get(key)
    }

    /// Look up a record by key for in-place mutation.
    fn get_mut(&mut self, key: &StoreKey) -> Option<&mut Record> {
        self.all_mut().get_mut(key)
    }

    /// Remove a record. Returns it if it was present.
    fn remove(&mut self, key: &StoreKey) -> Option<Record> {
        self.all_mut().shift_remove(key)
    }

    /// Number of records of the given kind.
    fn count(&self, kind: Kind) -> usize {
        self.all().keys().filter(|key| key.kind == kind).count()
    }

    /// Write the whole collection to durable storage.
    fn persist(&self) -> StoreResult<()>;

    /// Load durable storage into the collection.
    ///
    /// Called once at startup, before any command runs.
    fn reload(&mut self) -> StoreResult<ReloadReport>;
}
