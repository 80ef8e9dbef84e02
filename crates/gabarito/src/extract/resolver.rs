//! Header and range resolution for one sheet.

use tracing::debug;

use crate::error::{GabaritoError, Result};
use crate::input::{CellLocation, CellRef, Sheet, SourceTable, Workbook};

use super::header::HeaderPolicy;

/// Output of one extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRange {
    /// Column names, one per used-range column.
    pub columns: Vec<String>,
    /// Data rows, same width as `columns`.
    pub data_rows: Vec<Vec<String>>,
    /// Zero-based sheet row the header was read from.
    pub header_row_index: u32,
    /// Zero-based sheet row of each data row.
    pub source_rows: Vec<u32>,
}

impl ExtractedRange {
    /// Provenance for every extracted value.
    pub fn cell_locations(&self, sheet: &str) -> Vec<Vec<CellLocation>> {
        self.source_rows
            .iter()
            .map(|&row| {
                (0..self.columns.len() as u32)
                    .map(|column| CellLocation {
                        row,
                        column,
                        sheet: sheet.to_string(),
                        address: CellRef::new(row, column).address(),
                    })
                    .collect()
            })
            .collect()
    }
}

/// Locates header rows and extracts data rows from a sheet.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    policy: HeaderPolicy,
}

/// Header row plus the first data row it was found for.
struct HeaderMatch {
    row: u32,
    values: Vec<String>,
    columns: Vec<String>,
    data_start: u32,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: HeaderPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &HeaderPolicy {
        &self.policy
    }

    /// Detect the header for `start_cell` without extracting data rows.
    pub fn columns(&self, sheet: &Sheet, start_cell: &str) -> Result<Vec<String>> {
        Ok(self.locate_header(sheet, start_cell)?.columns)
    }

    /// Extract header and data rows.
    ///
    /// `stop_row` is a 1-based sheet row, inclusive.
    pub fn extract(
        &self,
        sheet: &Sheet,
        start_cell: &str,
        stop_row: Option<u32>,
    ) -> Result<ExtractedRange> {
        let header = self.locate_header(sheet, start_cell)?;
        let used = sheet.used_range().ok_or_else(|| GabaritoError::EmptySheet {
            sheet: sheet.name.clone(),
        })?;
        let width = header.columns.len() as u32;

        let last_row = match stop_row {
            Some(stop) => match stop.checked_sub(1) {
                Some(last) => used.end.row.min(last),
                None => return Ok(self.empty_range(header)),
            },
            None => used.end.row,
        };

        let mut data_rows = Vec::new();
        let mut source_rows = Vec::new();
        let mut skipped_headers = 0usize;

        if header.data_start <= last_row {
            for row in header.data_start..=last_row {
                let values: Vec<String> = (0..width).map(|c| sheet.merged_value(row, c)).collect();

                if values.iter().all(|v| v.trim().is_empty()) {
                    continue;
                }
                if repeats_header(&values, &header.values) {
                    skipped_headers += 1;
                    continue;
                }

                data_rows.push(values);
                source_rows.push(row);
            }
        }

        debug!(
            sheet = %sheet.name,
            header_row = header.row,
            rows = data_rows.len(),
            skipped_headers,
            "extracted range"
        );

        Ok(ExtractedRange {
            columns: header.columns,
            data_rows,
            header_row_index: header.row,
            source_rows,
        })
    }

    /// Extract one sheet into a source table.
    pub fn extract_table(
        &self,
        workbook: &Workbook,
        sheet_index: usize,
        start_cell: &str,
        stop_row: Option<u32>,
    ) -> Result<SourceTable> {
        let sheet = workbook
            .sheet(sheet_index)
            .ok_or_else(|| GabaritoError::SheetNotFound(format!("page {}", sheet_index)))?;
        let range = self.extract(sheet, start_cell, stop_row)?;
        let locations = range.cell_locations(&sheet.name);

        Ok(SourceTable::new(workbook.name(), range.columns, range.data_rows)
            .with_origin_sheets(vec![sheet.name.clone()])
            .with_cell_locations(locations)
            .with_metadata(workbook.metadata.clone()))
    }

    fn empty_range(&self, header: HeaderMatch) -> ExtractedRange {
        ExtractedRange {
            columns: header.columns,
            data_rows: Vec::new(),
            header_row_index: header.row,
            source_rows: Vec::new(),
        }
    }

    fn locate_header(&self, sheet: &Sheet, start_cell: &str) -> Result<HeaderMatch> {
        let start = CellRef::parse(start_cell)?;
        let used = sheet.used_range().ok_or_else(|| GabaritoError::EmptySheet {
            sheet: sheet.name.clone(),
        })?;

        let data_start = start.row.saturating_add(self.policy.start_row_offset);
        let width = used.end.col + 1;
        let row_values =
            |row: u32| -> Vec<String> { (0..width).map(|c| sheet.merged_value(row, c)).collect() };

        // Row directly above the data start; used when nothing else matches.
        let fallback = data_start.saturating_sub(1);
        let mut header_row = fallback;

        for step in 1..=self.policy.lookback {
            let Some(row) = data_start.checked_sub(step) else {
                break;
            };
            let values = row_values(row);
            if values.iter().all(|v| v.trim().is_empty()) {
                continue;
            }
            if self.policy.is_mostly_text(&values) || row == fallback {
                header_row = row;
                break;
            }
        }

        let values = row_values(header_row);
        let columns = values
            .iter()
            .enumerate()
            .map(|(c, value)| {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    return trimmed.to_string();
                }
                let plain = sheet.plain_value(header_row, c as u32);
                let plain = plain.trim();
                if !plain.is_empty() {
                    return plain.to_string();
                }
                format!("Coluna_{}", c + 1)
            })
            .collect();

        debug!(sheet = %sheet.name, start_cell, header_row, "located header");

        Ok(HeaderMatch {
            row: header_row,
            values,
            columns,
            data_start,
        })
    }
}

impl SourceTable {
    /// Build a table from a single page of `workbook`.
    pub fn from_single_page(
        workbook: &Workbook,
        sheet_index: usize,
        start_cell: &str,
        stop_row: Option<u32>,
    ) -> Result<Self> {
        Resolver::new().extract_table(workbook, sheet_index, start_cell, stop_row)
    }
}

/// A row repeats the header when every non-blank value equals the header
/// value in the same column, trimmed and case-insensitive.
fn repeats_header(values: &[String], header: &[String]) -> bool {
    let mut non_blank = 0;
    for (c, value) in values.iter().enumerate() {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        non_blank += 1;
        let expected = header.get(c).map(|h| h.trim()).unwrap_or("");
        if value.to_lowercase() != expected.to_lowercase() {
            return false;
        }
    }
    non_blank > 0
}
