//! Fuzz target for cell address decoding.
//!
//! Accepted addresses must render back to the same cell.

#![no_main]

use gabarito::input::CellRef;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(cell) = CellRef::parse(input) {
            let rendered = cell.address();
            assert_eq!(CellRef::parse(&rendered).ok(), Some(cell));
        }
    }
});
