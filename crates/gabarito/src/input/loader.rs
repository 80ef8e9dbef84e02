//! Tabular source loader: turns csv/xls/xlsx/xlsm bytes into a [`Workbook`].

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use calamine::{open_workbook_from_rs, Data, Dimensions, Range, Reader, Xls, Xlsx};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{GabaritoError, Result};

use super::address::{CellRange, CellRef};
use super::delimited;
use super::source::SourceMetadata;
use super::workbook::{Cell, CellValue, Sheet, Workbook};

/// Name given to the single sheet of a CSV source.
pub const CSV_SHEET_NAME: &str = "Sheet1";

/// Accepted input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx,
    Xlsm,
    Xls,
}

impl SourceFormat {
    /// Resolve a file extension, case-insensitive.
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            "xlsm" => Ok(Self::Xlsm),
            "xls" => Ok(Self::Xls),
            other => Err(GabaritoError::UnsupportedFormat(format!(
                "'.{}' (expected .csv, .xls, .xlsx or .xlsm)",
                other
            ))),
        }
    }

    /// Resolve from a file name's extension.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_extension(&ext)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Xlsm => "xlsm",
            Self::Xls => "xls",
        }
    }
}

/// Loader configuration.
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
    /// CSV delimiter to use (None = detect from the first line).
    pub delimiter: Option<u8>,
}

/// Loads tabular files into workbooks.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Create a loader with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Read and parse a file from disk.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Workbook> {
        let path = path.as_ref();
        let format = SourceFormat::from_file_name(&path.to_string_lossy())?;

        let mut file = File::open(path).map_err(|e| GabaritoError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| GabaritoError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        self.load(path.to_path_buf(), format, &contents)
    }

    /// Parse in-memory bytes; the format comes from `name`'s extension.
    pub fn load_bytes(&self, name: &str, bytes: &[u8]) -> Result<Workbook> {
        let format = SourceFormat::from_file_name(name)?;
        self.load(PathBuf::from(name), format, bytes)
    }

    fn load(&self, path: PathBuf, format: SourceFormat, bytes: &[u8]) -> Result<Workbook> {
        let display = path.display().to_string();
        if bytes.is_empty() {
            return Err(GabaritoError::EmptyData(format!("'{}' is empty", display)));
        }

        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let (sheets, format_label) = match format {
            SourceFormat::Csv => {
                let text = String::from_utf8_lossy(bytes);
                let grid = delimited::parse_text(&text, self.config.delimiter)?;
                let label = grid.format_label().to_string();
                (vec![sheet_from_grid(grid.rows)], label)
            }
            SourceFormat::Xlsx | SourceFormat::Xlsm => {
                (read_xlsx(bytes, &display)?, format.as_str().to_string())
            }
            SourceFormat::Xls => (read_xls(bytes, &display)?, format.as_str().to_string()),
        };

        if sheets.is_empty() {
            return Err(GabaritoError::NoSheets(display));
        }

        let metadata = SourceMetadata::new(
            path,
            hash,
            bytes.len() as u64,
            format_label,
            sheets.len(),
        );
        info!(
            file = %metadata.file,
            format = %metadata.format,
            sheets = sheets.len(),
            "loaded workbook"
        );

        Ok(Workbook::new(sheets, metadata))
    }
}

fn sheet_from_grid(rows: Vec<Vec<String>>) -> Sheet {
    let height = rows.len() as u32;
    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;

    let mut sheet = Sheet::from_rows(CSV_SHEET_NAME, rows);
    if height > 0 && width > 0 {
        sheet.set_used_range(Some(CellRange::new(
            CellRef::new(0, 0),
            CellRef::new(height - 1, width - 1),
        )));
    }
    sheet
}

fn read_xlsx(bytes: &[u8], name: &str) -> Result<Vec<Sheet>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e| GabaritoError::Workbook(format!("{}: {}", name, e)))?;
    workbook
        .load_merged_regions()
        .map_err(|e| GabaritoError::Workbook(format!("{}: {}", name, e)))?;

    let mut sheets = Vec::new();
    for sheet_name in workbook.sheet_names() {
        let merges: Vec<CellRange> = workbook
            .merged_regions_by_sheet(&sheet_name)
            .into_iter()
            .map(|(_, _, dims)| range_from_dimensions(dims))
            .collect();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| GabaritoError::Workbook(format!("{} [{}]: {}", name, sheet_name, e)))?;
        sheets.push(sheet_from_range(&sheet_name, &range, merges));
    }
    Ok(sheets)
}

fn read_xls(bytes: &[u8], name: &str) -> Result<Vec<Sheet>> {
    let mut workbook: Xls<_> = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e| GabaritoError::Workbook(format!("{}: {}", name, e)))?;

    let mut sheets = Vec::new();
    for sheet_name in workbook.sheet_names() {
        let merges: Vec<CellRange> = workbook
            .worksheet_merge_cells(&sheet_name)
            .unwrap_or_default()
            .iter()
            .map(range_from_dimensions)
            .collect();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| GabaritoError::Workbook(format!("{} [{}]: {}", name, sheet_name, e)))?;
        sheets.push(sheet_from_range(&sheet_name, &range, merges));
    }
    Ok(sheets)
}

fn range_from_dimensions(dims: &Dimensions) -> CellRange {
    CellRange::new(
        CellRef::new(dims.start.0, dims.start.1),
        CellRef::new(dims.end.0, dims.end.1),
    )
}

fn sheet_from_range(name: &str, range: &Range<Data>, merges: Vec<CellRange>) -> Sheet {
    let mut sheet = Sheet::new(name);

    if let (Some(start), Some(end)) = (range.start(), range.end()) {
        for (row, col, data) in range.used_cells() {
            if let Some(cell) = cell_from_data(data) {
                sheet.set_cell(start.0 + row as u32, start.1 + col as u32, cell);
            }
        }
        sheet.set_used_range(Some(CellRange::new(
            CellRef::new(start.0, start.1),
            CellRef::new(end.0, end.1),
        )));
    }

    for merge in merges {
        sheet.add_merge(merge);
    }

    debug!(
        sheet = name,
        cells = sheet.cell_count(),
        merges = sheet.merges().len(),
        "read sheet"
    );
    sheet
}

/// Keep both the raw value and calamine's display string. Formulas are read
/// as their cached values and dates as serial numbers; nothing is recomputed.
fn cell_from_data(data: &Data) -> Option<Cell> {
    let raw = match data {
        Data::Empty => return None,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => CellValue::Error(e.to_string()),
        other => CellValue::Text(other.to_string()),
    };

    Some(Cell {
        raw,
        formatted: Some(data.to_string()),
    })
}
