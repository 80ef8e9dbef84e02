//! Fuzz target for delimited-text loading.
//!
//! Any byte string must either load into a workbook whose rows can be
//! extracted from A1, or fail with an error. Never a panic.

#![no_main]

use gabarito::{Loader, Resolver};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let loader = Loader::new();
    for name in ["f.csv", "f.tsv"] {
        if let Ok(workbook) = loader.load_bytes(name, data) {
            let sheet = &workbook.sheets[0];
            let _ = sheet.used_range();
            let _ = Resolver::new().extract_table(&workbook, 0, "A1", None);
            let _ = Resolver::new().extract_table(&workbook, 0, "B3", Some(2));
        }
    }
});
