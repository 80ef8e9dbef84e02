//! CLI command implementations.

pub mod build;
pub mod preview;
pub mod sheets;
pub mod status;
