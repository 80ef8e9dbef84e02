//! Property-based tests for the mapping reconciler and the CSV reader.
//!
//! These tests use proptest to generate random edit sequences and inputs
//! and check that the core invariants hold for all of them.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p gabarito --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p gabarito --test property_tests
//! ```

use std::collections::HashSet;

use proptest::prelude::*;

use gabarito::input::delimited;
use gabarito::input::CellRef;
use gabarito::schema::CanonicalSchema;
use gabarito::{MappingAction, Session, SourceFile, SourceTable};

// =============================================================================
// Test Strategies
// =============================================================================

const COLUMNS: [&str; 4] = ["ID", "COR", "PRICE", "NOTE"];
const VALUES: [&str; 5] = ["SKU", "COLOR", "PRICE", "__EMPTY__", "TYPED"];

fn schema() -> CanonicalSchema {
    CanonicalSchema::new(["ID", "COR", "PRICE"], ["NOTE"], "COR")
}

fn session() -> Session {
    let table = |cols: &[&str]| {
        SourceTable::new("t", cols.iter().map(|c| c.to_string()).collect(), vec![])
    };
    Session::new(schema())
        .with_source(SourceFile::Custo, table(&["SKU", "COLOR"]))
        .with_source(SourceFile::Venda, table(&["SKU", "PRICE"]))
}

fn source_file() -> impl Strategy<Value = SourceFile> {
    prop_oneof![Just(SourceFile::Custo), Just(SourceFile::Venda)]
}

fn set_single() -> impl Strategy<Value = MappingAction> {
    (0..COLUMNS.len(), 0..VALUES.len(), source_file()).prop_map(|(c, v, file)| {
        MappingAction::SetSingle {
            column: COLUMNS[c].to_string(),
            value: VALUES[v].to_string(),
            file,
        }
    })
}

fn any_action() -> impl Strategy<Value = MappingAction> {
    prop_oneof![
        4 => set_single(),
        1 => (0..COLUMNS.len(), "[A-Z ]{1,8}").prop_map(|(c, name)| MappingAction::SetSharedName {
            column: COLUMNS[c].to_string(),
            name,
        }),
        1 => (0..VALUES.len(), source_file(), any::<bool>()).prop_map(|(v, file, checked)| {
            MappingAction::ToggleVariation {
                column: None,
                value: VALUES[v].to_string(),
                file,
                checked,
            }
        }),
        1 => "[a-z0-9, ]{0,12}".prop_map(|text| MappingAction::AddExtraVariations { text }),
        1 => Just(MappingAction::ClearExtraVariations),
    ]
}

// =============================================================================
// Reconciler Invariants
// =============================================================================

proptest! {
    /// At most one record per (column, source) after any edit sequence.
    #[test]
    fn pair_uniqueness(actions in prop::collection::vec(any_action(), 0..40)) {
        let s = session().apply_all(&actions);
        let mut seen = HashSet::new();
        for m in s.mappings() {
            prop_assert!(seen.insert((m.gabarito_column.clone(), m.source_file)));
        }
    }

    /// A shared name leaves exactly one record for the column.
    #[test]
    fn shared_name_collapses(
        actions in prop::collection::vec(any_action(), 0..30),
        c in 0..COLUMNS.len(),
    ) {
        let column = COLUMNS[c];
        let s = session().apply_all(&actions).apply(&MappingAction::SetSharedName {
            column: column.to_string(),
            name: "LITERAL".to_string(),
        });

        let records: Vec<_> = s.mappings().for_column(column).collect();
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(records[0].name.as_deref(), Some("LITERAL"));
    }

    /// Extra variations never change what is selected.
    #[test]
    fn extras_never_touch_selection(
        actions in prop::collection::vec(any_action(), 0..30),
        text in "[a-z0-9, ]{0,20}",
    ) {
        let before = session().apply_all(&actions);
        let after = before.apply(&MappingAction::AddExtraVariations { text });

        for file in SourceFile::ALL {
            let selected = |s: &Session| {
                s.mappings().get("COR", file).map(|m| m.source_column.clone()).unwrap_or_default()
            };
            prop_assert_eq!(selected(&before), selected(&after));
        }
    }

    /// Progress never reports more mapped columns than exist.
    #[test]
    fn progress_bounded(actions in prop::collection::vec(any_action(), 0..30)) {
        let s = session().apply_all(&actions);
        let all = s.schema().all_columns();
        let progress = s.reconciler().progress(s.mappings(), &all);
        prop_assert!(progress.mapped <= progress.total);
        prop_assert!((0.0..=1.0).contains(&progress.fraction()));
    }
}

// =============================================================================
// Reader Robustness
// =============================================================================

proptest! {
    /// Parsing never panics and every row has at least one field.
    #[test]
    fn csv_parse_no_panic(text in "[a-z0-9,;\t\"\n ]{0,200}") {
        if let Ok(grid) = delimited::parse_text(&text, None) {
            prop_assert!(!grid.rows.is_empty());
            prop_assert!(grid.rows.iter().all(|r| !r.is_empty()));
        }
    }

    /// Rendering an address and parsing it back gives the same cell.
    #[test]
    fn address_round_trip(row in 0u32..1_000_000, col in 0u32..20_000) {
        let cell = CellRef::new(row, col);
        prop_assert_eq!(CellRef::parse(&cell.address()).unwrap(), cell);
    }

    /// Anything that is not letters then digits is rejected, never panics.
    #[test]
    fn address_parse_no_panic(s in "\\PC{0,12}") {
        let _ = CellRef::parse(&s);
    }
}
