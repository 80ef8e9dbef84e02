//! Column mappings and the reconciliation policy that edits them.

mod column;
mod reconciler;
pub mod variations;

pub use column::{ColumnMapping, MappingSet, SourceFile, SourceValue, EMPTY_SENTINEL};
pub use reconciler::{MappingProgress, Reconciler};
