//! Canonical schema definition.

mod canonical;

pub use canonical::{CanonicalSchema, SchemaSnapshot};
