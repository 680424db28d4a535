use crate::error::StoreResult;
use crate::traits::{Collection, ObjectStore, ReloadReport};

/// Object store without a backing file.
///
/// Intended for tests and embedding. `persist` and `reload` do nothing, so
/// the collection lives exactly as long as the store.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Collection,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn all(&self) -> &Collection {
        &self.objects
    }

    fn all_mut(&mut self) -> &mut Collection {
        &mut self.objects
    }

    fn persist(&self) -> StoreResult<()> {
        Ok(())
    }

    fn reload(&mut self) -> StoreResult<ReloadReport> {
        Ok(ReloadReport::default())
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("record_count", &self.len())
            .finish()
    }
}
