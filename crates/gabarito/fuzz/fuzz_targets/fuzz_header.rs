//! Fuzz target for header location on arbitrary grids.

#![no_main]

use arbitrary::Arbitrary;
use gabarito::input::Sheet;
use gabarito::Resolver;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    rows: Vec<Vec<String>>,
    start_row: u8,
    start_col: u8,
    stop_row: Option<u16>,
}

fuzz_target!(|input: Input| {
    if input.rows.len() > 200 || input.rows.iter().any(|r| r.len() > 50) {
        return;
    }

    let sheet = Sheet::from_rows("fuzz", input.rows);
    let start = gabarito::input::CellRef::new(input.start_row as u32, input.start_col as u32);
    let stop_row = input.stop_row.map(u32::from);

    if let Ok(range) = Resolver::new().extract(&sheet, &start.address(), stop_row) {
        assert!(range.data_rows.iter().all(|r| r.len() == range.columns.len()));
    }
});
