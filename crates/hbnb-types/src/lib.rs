//! Record model for the HBNB console.
//!
//! This crate defines the typed records the console manages and the pieces
//! they are built from. Every other HBNB crate depends on `hbnb-types`.
//!
//! # Key Types
//!
//! - [`Kind`] — Closed set of record kinds, each with a declared field schema
//! - [`Record`] — A record of some kind: identity, timestamps, and fields
//! - [`RecordId`] — Opaque record identifier (UUID v4 for fresh records)
//! - [`Timestamp`] — Microsecond-precision local wall-clock time
//! - [`Value`] — A field value (string, integer, float, or list)
//! - [`StoreKey`] — Composite `"{kind}.{id}"` key used by the object store

pub mod error;
pub mod id;
pub mod kind;
pub mod record;
pub mod timestamp;
pub mod value;

pub use error::TypeError;
pub use id::RecordId;
pub use kind::{FieldSpec, FieldType, Kind};
pub use record::{Record, StoreKey, CLASS_KEY, RESERVED_FIELDS};
pub use timestamp::{Timestamp, TIMESTAMP_FORMAT};
pub use value::Value;
