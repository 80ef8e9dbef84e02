//! Source tables and their metadata.

use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Metadata about a loaded source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, csv-semicolon, tsv, xlsx, xls, xlsm).
    pub format: String,
    /// Number of sheets in the workbook.
    pub sheet_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        sheet_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            sheet_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Where an extracted value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellLocation {
    /// Zero-based sheet row.
    pub row: u32,
    /// Zero-based sheet column.
    pub column: u32,
    pub sheet: String,
    /// Spreadsheet address, e.g. "C12".
    pub address: String,
}

/// One parsed tabular source (cost or sale).
///
/// Every row has exactly `columns.len()` values.
#[derive(Debug, Clone, Serialize)]
pub struct SourceTable {
    /// Display name (file name).
    pub name: String,
    /// Column names in first-seen order.
    pub columns: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
    /// Sheets that contributed rows.
    pub origin_sheets: Vec<String>,
    /// Per-value provenance, parallel to `rows` when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_locations: Option<Vec<Vec<CellLocation>>>,
    /// Metadata of the file the table was read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SourceMetadata>,
}

impl SourceTable {
    /// Create a table, padding or truncating rows to the column count.
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows.into_iter().map(|row| fit_row(row, width)).collect();

        Self {
            name: name.into(),
            columns,
            rows,
            origin_sheets: Vec::new(),
            cell_locations: None,
            metadata: None,
        }
    }

    pub fn with_origin_sheets(mut self, sheets: Vec<String>) -> Self {
        self.origin_sheets = sheets;
        self
    }

    pub fn with_cell_locations(mut self, locations: Vec<Vec<CellLocation>>) -> Self {
        self.cell_locations = Some(locations);
        self
    }

    pub fn with_metadata(mut self, metadata: SourceMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Write the table as CSV, header first.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(&self.columns)?;
        for row in &self.rows {
            out.write_record(row)?;
        }
        out.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

/// Pad with empty strings or truncate to `width`.
pub(crate) fn fit_row(mut row: Vec<String>, width: usize) -> Vec<String> {
    row.resize(width, String::new());
    row
}
