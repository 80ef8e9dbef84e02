//! Header-row heuristics.

use serde::{Deserialize, Serialize};

/// Rows scanned upward from the data start when looking for a header.
pub const HEADER_LOOKBACK: u32 = 5;

/// Values longer than this count as header text even when numeric.
pub const TEXT_LENGTH_THRESHOLD: usize = 10;

/// Rows added to the decoded start cell to reach the first data row.
///
/// A start cell of `A5` means data begins on sheet row 6 (zero-based 5) and
/// the header is searched from row 5 upward. Existing plans depend on this.
pub const START_ROW_OFFSET: u32 = 1;

/// Tunables for header detection. The default matches the constants above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderPolicy {
    pub lookback: u32,
    pub text_length_threshold: usize,
    pub start_row_offset: u32,
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        Self {
            lookback: HEADER_LOOKBACK,
            text_length_threshold: TEXT_LENGTH_THRESHOLD,
            start_row_offset: START_ROW_OFFSET,
        }
    }
}

impl HeaderPolicy {
    /// Whether a value looks like header text: after trimming it is
    /// non-empty and either not a number or longer than the threshold.
    pub fn looks_like_text(&self, value: &str) -> bool {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return false;
        }
        !is_numeric(trimmed) || trimmed.chars().count() > self.text_length_threshold
    }

    /// Whether a candidate row is mostly header text: more than half of its
    /// non-blank cells look like text. Rows with no non-blank cell never are.
    pub fn is_mostly_text(&self, values: &[String]) -> bool {
        let non_blank: Vec<&String> = values.iter().filter(|v| !v.trim().is_empty()).collect();
        if non_blank.is_empty() {
            return false;
        }
        let text_like = non_blank.iter().filter(|v| self.looks_like_text(v)).count();
        text_like * 2 > non_blank.len()
    }
}

fn is_numeric(value: &str) -> bool {
    match value.parse::<f64>() {
        Ok(n) => !n.is_nan(),
        Err(_) => false,
    }
}
