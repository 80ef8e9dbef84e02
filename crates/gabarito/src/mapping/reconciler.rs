//! Mapping reconciliation policy.
//!
//! Every update takes the current [`MappingSet`] and returns a new one; the
//! input snapshot is never modified. Nothing here fails: an absent mapping
//! reads as empty and a single value reads as a one-element list.

use indexmap::IndexSet;
use serde::Serialize;

use crate::input::SourceTable;
use crate::schema::CanonicalSchema;

use super::column::{ColumnMapping, MappingSet, SourceFile, SourceValue};
use super::variations::{join_variations, merge_variations, parse_variation_list};

/// Mapped versus total canonical columns for one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MappingProgress {
    pub mapped: usize,
    pub total: usize,
}

impl MappingProgress {
    /// Share of columns mapped; an empty view counts as complete.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.mapped as f64 / self.total as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.mapped == self.total
    }
}

/// Applies mapping edits against a schema and the attached sources.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    schema: &'a CanonicalSchema,
    custo: Option<&'a [String]>,
    venda: Option<&'a [String]>,
}

impl<'a> Reconciler<'a> {
    /// Reconciler with no sources attached.
    pub fn new(schema: &'a CanonicalSchema) -> Self {
        Self {
            schema,
            custo: None,
            venda: None,
        }
    }

    /// Attach a source by its column list.
    pub fn with_source(mut self, file: SourceFile, columns: &'a [String]) -> Self {
        match file {
            SourceFile::Custo => self.custo = Some(columns),
            SourceFile::Venda => self.venda = Some(columns),
        }
        self
    }

    /// Attach whichever tables are present.
    pub fn with_tables(
        mut self,
        custo: Option<&'a SourceTable>,
        venda: Option<&'a SourceTable>,
    ) -> Self {
        self.custo = custo.map(|t| t.columns.as_slice());
        self.venda = venda.map(|t| t.columns.as_slice());
        self
    }

    pub fn schema(&self) -> &CanonicalSchema {
        self.schema
    }

    pub fn columns(&self, file: SourceFile) -> Option<&'a [String]> {
        match file {
            SourceFile::Custo => self.custo,
            SourceFile::Venda => self.venda,
        }
    }

    pub fn is_attached(&self, file: SourceFile) -> bool {
        self.columns(file).is_some()
    }

    pub fn both_attached(&self) -> bool {
        self.custo.is_some() && self.venda.is_some()
    }

    pub fn any_attached(&self) -> bool {
        self.custo.is_some() || self.venda.is_some()
    }

    /// File that receives single shared records: custo when attached.
    pub fn primary_file(&self) -> SourceFile {
        if self.custo.is_some() || self.venda.is_none() {
            SourceFile::Custo
        } else {
            SourceFile::Venda
        }
    }

    /// A value is custom when the source is attached and does not have a
    /// column by that name.
    pub fn is_custom(&self, file: SourceFile, value: &str) -> bool {
        self.columns(file)
            .is_some_and(|cols| !cols.iter().any(|c| c == value))
    }

    // -------------------------------------------------------------------------
    // Updates
    // -------------------------------------------------------------------------

    /// Bind `column` on `file` to one source column, a custom literal, or
    /// the empty sentinel.
    ///
    /// With both sources attached, a non-custom value on a non-variation
    /// column removes the other source's record for that column first.
    pub fn set_single(
        &self,
        mappings: &MappingSet,
        column: &str,
        value: &str,
        file: SourceFile,
    ) -> MappingSet {
        let mut next = mappings.clone();
        let value = SourceValue::from_text(value);

        if let SourceValue::Single(selected) = &value {
            let exclusive = !self.schema.is_variation(column) && self.both_attached();
            if exclusive && !self.is_custom(file, selected) {
                next.remove(column, file.other());
            }
        }

        next.upsert(ColumnMapping::new(column, value, file));
        next
    }

    /// Replace every record for `column` with one record carrying `name`.
    pub fn set_shared_name(&self, mappings: &MappingSet, column: &str, name: &str) -> MappingSet {
        let mut next = mappings.clone();
        next.remove_column(column);
        next.upsert(
            ColumnMapping::new(column, SourceValue::Empty, self.primary_file()).with_name(name),
        );
        next
    }

    /// Add or remove one value from a list selection.
    ///
    /// Extra variations already recorded on the pair are kept.
    pub fn toggle_multi(
        &self,
        mappings: &MappingSet,
        column: &str,
        value: &str,
        file: SourceFile,
        checked: bool,
    ) -> MappingSet {
        let mut next = mappings.clone();
        let existing = mappings.get(column, file);

        let mut selected: IndexSet<String> = existing
            .map(|m| m.source_column.values().into_iter().map(String::from).collect())
            .unwrap_or_default();
        if checked {
            selected.insert(value.to_string());
        } else {
            selected.shift_remove(value);
        }

        let mut mapping = ColumnMapping::new(column, SourceValue::multi(selected), file);
        mapping.extra_variations = existing.and_then(|m| m.extra_variations.clone());
        next.upsert(mapping);
        next
    }

    /// Record extra variations on the variation column of every attached
    /// source. The selection in `source_column` is left as it is.
    pub fn add_extra_variations(&self, mappings: &MappingSet, text: &str) -> MappingSet {
        let additions = parse_variation_list(text);
        if additions.is_empty() {
            return mappings.clone();
        }

        let column = self.schema.variation_column.as_str();
        let mut next = mappings.clone();

        for file in SourceFile::ALL {
            if !self.is_attached(file) {
                continue;
            }
            let mut mapping = mappings
                .get(column, file)
                .cloned()
                .unwrap_or_else(|| ColumnMapping::new(column, SourceValue::Empty, file));
            let combined = merge_variations(&mapping.extra_variation_list(), &additions);
            mapping.extra_variations = join_variations(&combined);
            next.upsert(mapping);
        }
        next
    }

    /// Drop one extra variation wherever it is recorded.
    pub fn remove_extra_variation(&self, mappings: &MappingSet, value: &str) -> MappingSet {
        let target = value.trim().to_uppercase();
        let mut next = mappings.clone();

        for mapping in next.iter_mut() {
            if mapping.extra_variations.is_none() {
                continue;
            }
            let remaining: Vec<String> = mapping
                .extra_variation_list()
                .into_iter()
                .filter(|v| *v != target)
                .collect();
            mapping.extra_variations = join_variations(&remaining);
        }
        next
    }

    /// Remove all extra variations.
    pub fn clear_extra_variations(&self, mappings: &MappingSet) -> MappingSet {
        let mut next = mappings.clone();
        for mapping in next.iter_mut() {
            mapping.extra_variations = None;
        }
        next
    }

    /// Forget the record for one (column, source) pair.
    pub fn clear_mapping(&self, mappings: &MappingSet, column: &str, file: SourceFile) -> MappingSet {
        let mut next = mappings.clone();
        next.remove(column, file);
        next
    }

    /// Forget every record for a column.
    pub fn clear_column(&self, mappings: &MappingSet, column: &str) -> MappingSet {
        let mut next = mappings.clone();
        next.remove_column(column);
        next
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Whether `column` counts as mapped.
    ///
    /// The variation column needs a selected value that is either one of
    /// the source's columns or an individually added value that is not just
    /// an echo of the extra variations. Other columns need a shared name or
    /// a non-empty source value on any record.
    pub fn is_mapped(&self, mappings: &MappingSet, column: &str) -> bool {
        if !self.schema.is_variation(column) {
            return mappings.for_column(column).any(ColumnMapping::has_binding);
        }

        let extras: IndexSet<String> = mappings
            .for_column(column)
            .flat_map(|m| m.extra_variation_list())
            .collect();

        SourceFile::ALL.iter().any(|&file| {
            let (Some(mapping), Some(cols)) = (mappings.get(column, file), self.columns(file))
            else {
                return false;
            };
            mapping.source_column.values().iter().any(|v| {
                let in_source = cols.iter().any(|c| c.as_str() == *v);
                in_source || !extras.contains(*v)
            })
        })
    }

    /// Whether `column` has a binding on one specific source.
    pub fn is_mapped_for(&self, mappings: &MappingSet, column: &str, file: SourceFile) -> bool {
        mappings.get(column, file).is_some_and(ColumnMapping::has_binding)
    }

    /// Mapped count over the distinct names in `columns`.
    pub fn progress(&self, mappings: &MappingSet, columns: &[String]) -> MappingProgress {
        let distinct: IndexSet<&str> = columns.iter().map(|c| c.as_str()).collect();
        let mapped = distinct
            .iter()
            .filter(|c| self.is_mapped(mappings, c))
            .count();
        MappingProgress {
            mapped,
            total: distinct.len(),
        }
    }

    /// Columns of `columns` that are not mapped, in order.
    pub fn unmapped(&self, mappings: &MappingSet, columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .filter(|c| !self.is_mapped(mappings, c))
            .cloned()
            .collect()
    }

    /// Values selected for a pair, as a list.
    pub fn selected_values(&self, mappings: &MappingSet, column: &str, file: SourceFile) -> Vec<String> {
        mappings
            .get(column, file)
            .map(|m| m.source_column.values().into_iter().map(String::from).collect())
            .unwrap_or_default()
    }

    /// All extra variations across sources, de-duplicated.
    pub fn extra_variations(&self, mappings: &MappingSet) -> Vec<String> {
        let all: IndexSet<String> = mappings
            .for_column(&self.schema.variation_column)
            .flat_map(|m| m.extra_variation_list())
            .collect();
        all.into_iter().collect()
    }

    /// Distinct variation values: selections on either source plus extras.
    pub fn unique_variation_count(&self, mappings: &MappingSet) -> usize {
        let column = self.schema.variation_column.as_str();
        let mut all: IndexSet<String> = mappings
            .for_column(column)
            .flat_map(|m| m.source_column.values().into_iter().map(String::from))
            .collect();
        all.extend(self.extra_variations(mappings));
        all.len()
    }

    /// Whether a pair selects at least one real column of its source.
    pub fn has_valid_selection(&self, mappings: &MappingSet, column: &str, file: SourceFile) -> bool {
        let Some(cols) = self.columns(file) else {
            return false;
        };
        mappings.get(column, file).is_some_and(|m| {
            m.source_column
                .values()
                .iter()
                .any(|v| cols.iter().any(|c| c.as_str() == *v))
        })
    }

    /// Literal value typed for a pair: the column's shared name, or the
    /// pair's single value when it is custom.
    pub fn custom_value(&self, mappings: &MappingSet, column: &str, file: SourceFile) -> Option<String> {
        if let Some(name) = mappings.for_column(column).find_map(|m| m.name.clone()) {
            return Some(name);
        }
        match &mappings.get(column, file)?.source_column {
            SourceValue::Single(value) if self.is_custom(file, value) => Some(value.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> CanonicalSchema {
        CanonicalSchema::new(["ID", "COR", "PRICE"], ["NOTE"], "COR")
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_set_single_upserts() {
        let schema = schema();
        let custo = cols(&["SKU", "COST"]);
        let r = Reconciler::new(&schema).with_source(SourceFile::Custo, &custo);

        let m = r.set_single(&MappingSet::new(), "ID", "SKU", SourceFile::Custo);
        let m = r.set_single(&m, "ID", "COST", SourceFile::Custo);

        assert_eq!(m.len(), 1);
        assert_eq!(
            m.get("ID", SourceFile::Custo).unwrap().source_column,
            SourceValue::Single("COST".into())
        );
    }

    #[test]
    fn test_input_snapshot_untouched() {
        let schema = schema();
        let custo = cols(&["SKU"]);
        let r = Reconciler::new(&schema).with_source(SourceFile::Custo, &custo);

        let before = r.set_single(&MappingSet::new(), "ID", "SKU", SourceFile::Custo);
        let after = r.clear_column(&before, "ID");
        assert_eq!(before.len(), 1);
        assert!(after.is_empty());
    }

    #[test]
    fn test_non_custom_excludes_other_source() {
        let schema = schema();
        let custo = cols(&["SKU", "COST"]);
        let venda = cols(&["SKU", "PRICE"]);
        let r = Reconciler::new(&schema)
            .with_source(SourceFile::Custo, &custo)
            .with_source(SourceFile::Venda, &venda);

        let m = r.set_single(&MappingSet::new(), "ID", "SKU", SourceFile::Custo);
        let m = r.set_single(&m, "ID", "SKU", SourceFile::Venda);

        assert_eq!(m.len(), 1);
        assert!(m.get("ID", SourceFile::Custo).is_none());
        assert!(m.get("ID", SourceFile::Venda).is_some());
    }

    #[test]
    fn test_custom_keeps_other_source() {
        let schema = schema();
        let custo = cols(&["SKU", "COST"]);
        let venda = cols(&["SKU", "PRICE"]);
        let r = Reconciler::new(&schema)
            .with_source(SourceFile::Custo, &custo)
            .with_source(SourceFile::Venda, &venda);

        let m = r.set_single(&MappingSet::new(), "ID", "SKU", SourceFile::Custo);
        let m = r.set_single(&m, "ID", "TYPED BY HAND", SourceFile::Venda);

        assert_eq!(m.len(), 2);
        assert_eq!(
            r.custom_value(&m, "ID", SourceFile::Venda).as_deref(),
            Some("TYPED BY HAND")
        );
        assert_eq!(r.custom_value(&m, "ID", SourceFile::Custo), None);
    }

    #[test]
    fn test_variation_column_not_exclusive() {
        let schema = schema();
        let custo = cols(&["SKU", "RED"]);
        let venda = cols(&["SKU", "RED"]);
        let r = Reconciler::new(&schema)
            .with_source(SourceFile::Custo, &custo)
            .with_source(SourceFile::Venda, &venda);

        let m = r.set_single(&MappingSet::new(), "COR", "RED", SourceFile::Custo);
        let m = r.set_single(&m, "COR", "RED", SourceFile::Venda);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn test_single_source_no_cross_interaction() {
        let schema = schema();
        let custo = cols(&["SKU"]);
        let r = Reconciler::new(&schema).with_source(SourceFile::Custo, &custo);

        // a stale venda record survives while venda is detached
        let m = MappingSet::from_mappings(vec![ColumnMapping::new(
            "ID",
            "SKU".into(),
            SourceFile::Venda,
        )]);
        let m = r.set_single(&m, "ID", "SKU", SourceFile::Custo);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn test_empty_overwrites_pair_only() {
        let schema = schema();
        let custo = cols(&["SKU"]);
        let venda = cols(&["SKU", "PRICE"]);
        let r = Reconciler::new(&schema)
            .with_source(SourceFile::Custo, &custo)
            .with_source(SourceFile::Venda, &venda);

        let m = r.set_single(&MappingSet::new(), "PRICE", "PRICE", SourceFile::Venda);
        let m = r.set_single(&m, "PRICE", "__EMPTY__", SourceFile::Custo);

        assert_eq!(m.len(), 2);
        assert_eq!(
            m.get("PRICE", SourceFile::Custo).unwrap().source_column,
            SourceValue::Empty
        );
        assert!(r.is_mapped(&m, "PRICE"));
    }

    #[test]
    fn test_shared_name_collapses_column() {
        let schema = schema();
        let custo = cols(&["SKU"]);
        let venda = cols(&["SKU"]);
        let r = Reconciler::new(&schema)
            .with_source(SourceFile::Custo, &custo)
            .with_source(SourceFile::Venda, &venda);

        let m = r.set_single(&MappingSet::new(), "NOTE", "a", SourceFile::Custo);
        let m = r.set_single(&m, "NOTE", "b", SourceFile::Venda);
        let m = r.set_single(&m, "ID", "SKU", SourceFile::Custo);
        let m = r.set_shared_name(&m, "NOTE", "IMPORTADO");

        let notes: Vec<&ColumnMapping> = m.for_column("NOTE").collect();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].name.as_deref(), Some("IMPORTADO"));
        assert_eq!(notes[0].source_file, SourceFile::Custo);
        assert_eq!(notes[0].source_column, SourceValue::Empty);
        assert_eq!(m.len(), 2);
        assert!(r.is_mapped(&m, "NOTE"));
    }

    #[test]
    fn test_shared_name_uses_venda_when_alone() {
        let schema = schema();
        let venda = cols(&["SKU"]);
        let r = Reconciler::new(&schema).with_source(SourceFile::Venda, &venda);

        let m = r.set_shared_name(&MappingSet::new(), "NOTE", "X");
        assert_eq!(m.as_slice()[0].source_file, SourceFile::Venda);
    }

    #[test]
    fn test_toggle_multi_builds_list() {
        let schema = schema();
        let custo = cols(&["RED", "BLUE"]);
        let r = Reconciler::new(&schema).with_source(SourceFile::Custo, &custo);

        let m = r.set_single(&MappingSet::new(), "COR", "RED", SourceFile::Custo);
        let m = r.toggle_multi(&m, "COR", "BLUE", SourceFile::Custo, true);
        assert_eq!(
            m.get("COR", SourceFile::Custo).unwrap().source_column,
            SourceValue::multi(["RED", "BLUE"])
        );

        let m = r.toggle_multi(&m, "COR", "RED", SourceFile::Custo, false);
        let m = r.toggle_multi(&m, "COR", "BLUE", SourceFile::Custo, false);
        assert_eq!(
            m.get("COR", SourceFile::Custo).unwrap().source_column,
            SourceValue::Empty
        );
        assert!(!r.is_mapped(&m, "COR"));
    }

    #[test]
    fn test_toggle_same_value_twice_is_idempotent() {
        let schema = schema();
        let custo = cols(&["RED"]);
        let r = Reconciler::new(&schema).with_source(SourceFile::Custo, &custo);

        let m = r.toggle_multi(&MappingSet::new(), "COR", "RED", SourceFile::Custo, true);
        let m = r.toggle_multi(&m, "COR", "RED", SourceFile::Custo, true);
        assert_eq!(r.selected_values(&m, "COR", SourceFile::Custo), vec!["RED"]);
    }

    #[test]
    fn test_extra_variations_never_touch_source_column() {
        let schema = schema();
        let custo = cols(&["RED"]);
        let r = Reconciler::new(&schema).with_source(SourceFile::Custo, &custo);

        let m = r.toggle_multi(&MappingSet::new(), "COR", "RED", SourceFile::Custo, true);
        let m = r.add_extra_variations(&m, "A1,A2");

        let mapping = m.get("COR", SourceFile::Custo).unwrap();
        assert_eq!(mapping.source_column, SourceValue::multi(["RED"]));
        assert_eq!(mapping.extra_variations.as_deref(), Some("A1,A2"));
    }

    #[test]
    fn test_toggle_keeps_extra_variations() {
        let schema = schema();
        let custo = cols(&["RED", "BLUE"]);
        let r = Reconciler::new(&schema).with_source(SourceFile::Custo, &custo);

        let m = r.toggle_multi(&MappingSet::new(), "COR", "RED", SourceFile::Custo, true);
        let m = r.add_extra_variations(&m, "a1, a2");
        let m = r.toggle_multi(&m, "COR", "BLUE", SourceFile::Custo, true);
        let m = r.toggle_multi(&m, "COR", "RED", SourceFile::Custo, false);

        let mapping = m.get("COR", SourceFile::Custo).unwrap();
        assert_eq!(mapping.source_column, SourceValue::multi(["BLUE"]));
        assert_eq!(mapping.extra_variations.as_deref(), Some("A1,A2"));

        // unchecking the last value empties the selection but not the extras
        let m = r.toggle_multi(&m, "COR", "BLUE", SourceFile::Custo, false);
        let mapping = m.get("COR", SourceFile::Custo).unwrap();
        assert_eq!(mapping.source_column, SourceValue::Empty);
        assert_eq!(mapping.extra_variations.as_deref(), Some("A1,A2"));
    }

    #[test]
    fn test_extra_variations_accumulate_per_source() {
        let schema = schema();
        let custo = cols(&["RED"]);
        let venda = cols(&["AZUL"]);
        let r = Reconciler::new(&schema)
            .with_source(SourceFile::Custo, &custo)
            .with_source(SourceFile::Venda, &venda);

        let m = r.add_extra_variations(&MappingSet::new(), "a1, a2");
        let m = r.add_extra_variations(&m, "A2,b3,,");

        for file in SourceFile::ALL {
            let mapping = m.get("COR", file).unwrap();
            assert_eq!(mapping.extra_variations.as_deref(), Some("A1,A2,B3"));
            assert_eq!(mapping.source_column, SourceValue::Empty);
        }
        assert_eq!(r.extra_variations(&m), vec!["A1", "A2", "B3"]);
        assert_eq!(r.unique_variation_count(&m), 3);

        let unchanged = r.add_extra_variations(&m, " , ");
        assert_eq!(unchanged, m);
    }

    #[test]
    fn test_remove_and_clear_extra_variations() {
        let schema = schema();
        let custo = cols(&["RED"]);
        let r = Reconciler::new(&schema).with_source(SourceFile::Custo, &custo);

        let m = r.toggle_multi(&MappingSet::new(), "COR", "RED", SourceFile::Custo, true);
        let m = r.add_extra_variations(&m, "A1,A2");

        let m = r.remove_extra_variation(&m, "a1");
        assert_eq!(
            m.get("COR", SourceFile::Custo).unwrap().extra_variations.as_deref(),
            Some("A2")
        );

        let m = r.remove_extra_variation(&m, "A2");
        let mapping = m.get("COR", SourceFile::Custo).unwrap();
        assert_eq!(mapping.extra_variations, None);
        assert_eq!(mapping.source_column, SourceValue::multi(["RED"]));

        let m = r.add_extra_variations(&m, "Z9");
        let m = r.clear_extra_variations(&m);
        assert!(m.iter().all(|mm| mm.extra_variations.is_none()));
        assert_eq!(
            m.get("COR", SourceFile::Custo).unwrap().source_column,
            SourceValue::multi(["RED"])
        );
    }

    #[test]
    fn test_variation_mapped_rules() {
        let schema = schema();
        let custo = cols(&["RED", "BLUE"]);
        let r = Reconciler::new(&schema).with_source(SourceFile::Custo, &custo);

        // extras alone do not count
        let m = r.add_extra_variations(&MappingSet::new(), "VERDE");
        assert!(!r.is_mapped(&m, "COR"));

        // echoing an extra into the selection still does not count
        let m = r.toggle_multi(&m, "COR", "VERDE", SourceFile::Custo, true);
        assert!(!r.is_mapped(&m, "COR"));

        // an individually added value that is not an extra counts
        let m2 = r.toggle_multi(&m, "COR", "ROXO", SourceFile::Custo, true);
        assert!(r.is_mapped(&m2, "COR"));

        // a checkbox selection counts
        let m3 = r.toggle_multi(&m, "COR", "RED", SourceFile::Custo, true);
        assert!(r.is_mapped(&m3, "COR"));
    }

    #[test]
    fn test_variation_ignores_detached_source() {
        let schema = schema();
        let custo = cols(&["RED"]);
        let r = Reconciler::new(&schema).with_source(SourceFile::Custo, &custo);

        let m = MappingSet::from_mappings(vec![ColumnMapping::new(
            "COR",
            SourceValue::multi(["RED"]),
            SourceFile::Venda,
        )]);
        assert!(!r.is_mapped(&m, "COR"));
    }

    #[test]
    fn test_progress_counts_distinct_columns() {
        let schema = schema();
        let custo = cols(&["SKU", "RED"]);
        let venda = cols(&["SKU", "PRICE"]);
        let r = Reconciler::new(&schema)
            .with_source(SourceFile::Custo, &custo)
            .with_source(SourceFile::Venda, &venda);

        let m = r.set_single(&MappingSet::new(), "PRICE", "custom a", SourceFile::Custo);
        let m = r.set_single(&m, "PRICE", "custom b", SourceFile::Venda);
        let m = r.set_single(&m, "ID", "SKU", SourceFile::Custo);

        let progress = r.progress(&m, &schema.required_columns);
        assert_eq!(progress, MappingProgress { mapped: 2, total: 3 });
        assert!((progress.fraction() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(r.unmapped(&m, &schema.required_columns), vec!["COR"]);

        let empty_view = r.progress(&m, &[]);
        assert_eq!(empty_view.fraction(), 1.0);
    }

    #[test]
    fn test_clear_mapping_removes_pair() {
        let schema = schema();
        let custo = cols(&["SKU"]);
        let r = Reconciler::new(&schema).with_source(SourceFile::Custo, &custo);

        let m = r.set_single(&MappingSet::new(), "ID", "SKU", SourceFile::Custo);
        let m = r.set_single(&m, "NOTE", "x", SourceFile::Custo);
        let m = r.clear_mapping(&m, "ID", SourceFile::Custo);
        assert_eq!(m.len(), 1);
        assert!(!r.is_mapped(&m, "ID"));
        assert!(r.is_mapped_for(&m, "NOTE", SourceFile::Custo));
    }

    #[test]
    fn test_valid_selection_needs_real_column() {
        let schema = schema();
        let custo = cols(&["COR_A", "COR_B"]);
        let r = Reconciler::new(&schema).with_source(SourceFile::Custo, &custo);

        let m = r.toggle_multi(&MappingSet::new(), "COR", "TYPED", SourceFile::Custo, true);
        assert!(!r.has_valid_selection(&m, "COR", SourceFile::Custo));

        let m = r.toggle_multi(&m, "COR", "COR_B", SourceFile::Custo, true);
        assert!(r.has_valid_selection(&m, "COR", SourceFile::Custo));
        assert!(!r.has_valid_selection(&m, "COR", SourceFile::Venda));
    }
}
