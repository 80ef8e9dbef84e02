//! Spreadsheet cell addresses ("A5", "AB12").

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{GabaritoError, Result};

static ADDRESS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+)([0-9]+)$").unwrap());

/// Zero-based cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Decode an address like `"B7"` into `(row 6, col 1)`.
    ///
    /// Letters are case-insensitive. Row `0` is rejected since addresses
    /// are 1-based.
    pub fn parse(address: &str) -> Result<Self> {
        let invalid = || GabaritoError::InvalidAddress {
            address: address.to_string(),
        };

        let caps = ADDRESS_PATTERN.captures(address.trim()).ok_or_else(invalid)?;

        let mut col: u64 = 0;
        for ch in caps[1].chars() {
            let digit = (ch.to_ascii_uppercase() as u8 - b'A') as u64 + 1;
            col = col * 26 + digit;
            if col > u32::MAX as u64 {
                return Err(invalid());
            }
        }

        let row: u32 = caps[2].parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }

        Ok(Self {
            row: row - 1,
            col: (col - 1) as u32,
        })
    }

    /// Encode back to an address (`CellRef::new(6, 1)` is `"B7"`).
    pub fn address(&self) -> String {
        format!("{}{}", column_letters(self.col), self.row as u64 + 1)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address())
    }
}

/// Column index to letters, base-26 without a zero digit.
pub fn column_letters(col: u32) -> String {
    let mut n = col as u64 + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Rectangular block of cells, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl CellRange {
    pub fn new(start: CellRef, end: CellRef) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.start.row && row <= self.end.row && col >= self.start.col && col <= self.end.col
    }

    pub fn height(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    pub fn width(&self) -> u32 {
        self.end.col - self.start.col + 1
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}
