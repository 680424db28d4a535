//! Object store for the HBNB console.
//!
//! The store is the sole owner of the record collection: a map from
//! [`StoreKey`](hbnb_types::StoreKey) (`"{kind}.{id}"`) to
//! [`Record`](hbnb_types::Record), iterated in insertion order. It is also
//! the only writer of the backing file and the only thing that reloads it.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`FileStorage`] -- collection persisted as one JSON object in a file
//! - [`InMemoryObjectStore`] -- no backing file, for tests and embedding
//!
//! # Design Rules
//!
//! 1. Every flush rewrites the whole file. There is no append or partial update.
//! 2. Flushes replace the file atomically (temp file + rename).
//! 3. Write errors are propagated, never swallowed.
//! 4. Reload is all-or-nothing: one malformed entry fails the whole reload
//!    and leaves the collection untouched, with every failing key reported.
//! 5. A missing backing file reloads as an empty collection.

pub mod codec;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{ReloadFailure, StoreError, StoreResult};
pub use file::FileStorage;
pub use memory::InMemoryObjectStore;
pub use traits::{Collection, ObjectStore, ReloadReport};
