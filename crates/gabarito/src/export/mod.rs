//! Config assembly and output.

mod assembler;
mod persistence;

pub use assembler::{
    ConfigAssembler, ExportedConfig, FileDescriptor, FileDescriptors, ProductVariant, Readiness,
    IMMUTABLE_DEFAULT_NAME, MERGE_LOCKED_NAME,
};
pub use persistence::export_file_name;
