//! Error types for the gabarito library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gabarito operations.
///
/// Readiness gaps (missing required mappings, unset merge keys) and an
/// aggregation with no approved pages are not errors; they are reported as
/// values by the assembler and the page manager.
#[derive(Debug, Error)]
pub enum GabaritoError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension not one of csv, xls, xlsx, xlsm.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no data to read.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Workbook opened but contains no sheets.
    #[error("Workbook '{0}' has no sheets")]
    NoSheets(String),

    /// Corrupt or unreadable workbook bytes.
    #[error("Unreadable workbook: {0}")]
    Workbook(String),

    /// Start cell did not decode as column letters followed by row digits.
    #[error("Invalid cell address '{address}': use format A5")]
    InvalidAddress { address: String },

    /// Sheet has no used range to extract from.
    #[error("Sheet '{sheet}' has no used range")]
    EmptySheet { sheet: String },

    /// Page index or sheet name does not exist in the workbook.
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error saving or loading plan and config files.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Output name is empty after sanitizing.
    #[error("Invalid file name '{0}': use letters, digits, '_' or '-' (e.g. MEU_ARQUIVO)")]
    InvalidFileName(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for gabarito operations.
pub type Result<T> = std::result::Result<T, GabaritoError>;
