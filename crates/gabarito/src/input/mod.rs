//! Input loading and data source handling.

mod address;
pub mod delimited;
mod loader;
mod source;
mod workbook;

pub use address::{column_letters, CellRange, CellRef};
pub use loader::{Loader, LoaderConfig, SourceFormat, CSV_SHEET_NAME};
pub use source::{CellLocation, SourceMetadata, SourceTable};
pub(crate) use source::fit_row;
pub use workbook::{Cell, CellValue, Sheet, Workbook};
