//! In-memory workbook model shared by the CSV and spreadsheet readers.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::address::{CellRange, CellRef};
use super::source::SourceMetadata;

/// Raw cell content as read from the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Spreadsheet error value such as `#DIV/0!`.
    Error(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

/// One non-empty cell: its raw value plus the display string, when the
/// reader provides one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub raw: CellValue,
    pub formatted: Option<String>,
}

impl Cell {
    /// Text cell without a separate display string.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            raw: CellValue::Text(value.into()),
            formatted: None,
        }
    }

    pub fn number(value: f64) -> Self {
        Self {
            raw: CellValue::Number(value),
            formatted: None,
        }
    }

    pub fn with_formatted(mut self, formatted: impl Into<String>) -> Self {
        self.formatted = Some(formatted.into());
        self
    }

    /// Display string if present, else the raw value as string.
    pub fn display(&self) -> String {
        match &self.formatted {
            Some(formatted) => formatted.clone(),
            None => self.raw.to_string(),
        }
    }
}

/// One page of a workbook: a sparse grid with its used range and merges.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    cells: HashMap<CellRef, Cell>,
    used_range: Option<CellRange>,
    merges: Vec<CellRange>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a sheet of text cells from rows, starting at A1.
    pub fn from_rows<R, S>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sheet = Self::new(name);
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                sheet.set_cell(r as u32, c as u32, Cell::text(value));
            }
        }
        sheet
    }

    /// Place a cell, growing the used range to cover it.
    pub fn set_cell(&mut self, row: u32, col: u32, cell: Cell) {
        let at = CellRef::new(row, col);
        self.used_range = Some(match self.used_range {
            None => CellRange::new(at, at),
            Some(range) => CellRange::new(
                CellRef::new(range.start.row.min(row), range.start.col.min(col)),
                CellRef::new(range.end.row.max(row), range.end.col.max(col)),
            ),
        });
        self.cells.insert(at, cell);
    }

    /// Override the used range (readers report the declared dimensions).
    pub fn set_used_range(&mut self, range: Option<CellRange>) {
        self.used_range = range;
    }

    pub fn add_merge(&mut self, range: CellRange) {
        self.merges.push(range);
    }

    pub fn with_merge(mut self, range: CellRange) -> Self {
        self.add_merge(range);
        self
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&CellRef::new(row, col))
    }

    pub fn used_range(&self) -> Option<CellRange> {
        self.used_range
    }

    pub fn merges(&self) -> &[CellRange] {
        &self.merges
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Direct value of a cell ignoring merges: display string, else raw,
    /// else empty.
    pub fn plain_value(&self, row: u32, col: u32) -> String {
        self.cell(row, col).map(Cell::display).unwrap_or_default()
    }

    /// Value of a cell taking merged regions into account.
    ///
    /// Any cell inside a merge reads the anchor (top-left) cell; when the
    /// anchor holds nothing the whole region reads as empty.
    pub fn merged_value(&self, row: u32, col: u32) -> String {
        match self.merges.iter().find(|m| m.contains(row, col)) {
            Some(merge) => self.plain_value(merge.start.row, merge.start.col),
            None => self.plain_value(row, col),
        }
    }
}

/// A loaded file: one or more named sheets plus source metadata.
#[derive(Debug, Clone)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
    pub metadata: SourceMetadata,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>, metadata: SourceMetadata) -> Self {
        Self { sheets, metadata }
    }

    /// Display name of the source (file name).
    pub fn name(&self) -> &str {
        &self.metadata.file
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}
