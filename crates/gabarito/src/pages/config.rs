//! Per-page extraction settings.

use serde::{Deserialize, Serialize};

use crate::mapping::{ColumnMapping, SourceFile};

/// Start cell used for a page that has not been configured.
pub const DEFAULT_START_CELL: &str = "A1";

/// How one page of a workbook is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    pub page_index: usize,
    pub page_name: String,
    pub start_cell: String,
    /// Columns detected for `start_cell` when the page was last previewed.
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub column_mappings: Vec<ColumnMapping>,
    #[serde(default)]
    pub is_approved: bool,
    /// 1-based sheet row, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_row: Option<u32>,
}

impl PageConfig {
    /// Unapproved page starting at `A1`.
    pub fn new(page_index: usize, page_name: impl Into<String>) -> Self {
        Self {
            page_index,
            page_name: page_name.into(),
            start_cell: DEFAULT_START_CELL.to_string(),
            columns: Vec::new(),
            column_mappings: Vec::new(),
            is_approved: false,
            stop_row: None,
        }
    }

    pub fn with_start_cell(mut self, start_cell: impl Into<String>) -> Self {
        self.start_cell = start_cell.into().to_uppercase();
        self
    }

    pub fn with_stop_row(mut self, stop_row: Option<u32>) -> Self {
        self.stop_row = stop_row;
        self
    }

    /// Copy whose page-level mappings all point at `file`.
    pub fn stamped(&self, file: SourceFile) -> Self {
        let mut page = self.clone();
        for mapping in &mut page.column_mappings {
            mapping.source_file = file;
        }
        page
    }
}
