//! Line-oriented delimited-text reader with delimiter detection.
//!
//! Each physical line is one record: quotes suppress delimiter splitting
//! within the line but never join lines together.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{GabaritoError, Result};

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n").unwrap());

/// Rows read from delimited text.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvGrid {
    /// Delimiter used to split fields.
    pub delimiter: u8,
    /// One entry per non-blank line, ragged.
    pub rows: Vec<Vec<String>>,
}

impl CsvGrid {
    /// Widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Format label reported in source metadata.
    pub fn format_label(&self) -> &'static str {
        match self.delimiter {
            b'\t' => "tsv",
            b';' => "csv-semicolon",
            _ => "csv",
        }
    }
}

/// Parse delimited text.
///
/// Blank lines are dropped before anything else. With `delimiter` unset the
/// delimiter is chosen from the first remaining line.
pub fn parse_text(text: &str, delimiter: Option<u8>) -> Result<CsvGrid> {
    let lines: Vec<&str> = LINE_BREAK
        .split(text)
        .filter(|line| !line.trim().is_empty())
        .collect();

    let Some(first) = lines.first() else {
        return Err(GabaritoError::EmptyData(
            "No rows found in CSV text".to_string(),
        ));
    };

    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(first));
    debug!(delimiter = %(delimiter as char).escape_default(), lines = lines.len(), "parsing csv");

    let rows = lines
        .iter()
        .map(|line| split_line(line, delimiter as char))
        .collect();

    Ok(CsvGrid { delimiter, rows })
}

/// Pick the delimiter by raw counts in one line.
///
/// Tab wins only when it strictly outnumbers both others, semicolon only when
/// it strictly outnumbers commas; comma otherwise.
pub fn detect_delimiter(line: &str) -> u8 {
    let count = |c: char| line.chars().filter(|&ch| ch == c).count();
    let commas = count(',');
    let semicolons = count(';');
    let tabs = count('\t');

    if tabs > commas.max(semicolons) {
        b'\t'
    } else if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// Split one line into fields.
///
/// Inside quotes a doubled quote is one literal quote; any other quote flips
/// the quoted state. Fields are not trimmed.
pub fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                current.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if ch == delimiter && !in_quotes {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);

    fields
}
