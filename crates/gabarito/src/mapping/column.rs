//! Column mapping records.

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Token written for a slot intentionally bound to no data.
pub const EMPTY_SENTINEL: &str = "__EMPTY__";

/// Which uploaded file a mapping refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFile {
    Custo,
    Venda,
}

impl SourceFile {
    pub const ALL: [SourceFile; 2] = [SourceFile::Custo, SourceFile::Venda];

    pub fn other(self) -> Self {
        match self {
            SourceFile::Custo => SourceFile::Venda,
            SourceFile::Venda => SourceFile::Custo,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFile::Custo => "custo",
            SourceFile::Venda => "venda",
        }
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a mapping binds a canonical column to.
///
/// Serialized as `"__EMPTY__"`, a plain string, or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceValue {
    #[default]
    Empty,
    Single(String),
    Multi(IndexSet<String>),
}

impl SourceValue {
    /// Parse a user-supplied selection. The sentinel and blank text are
    /// both `Empty`.
    pub fn from_text(value: &str) -> Self {
        if value == EMPTY_SENTINEL || value.trim().is_empty() {
            SourceValue::Empty
        } else {
            SourceValue::Single(value.to_string())
        }
    }

    /// Build a list value; an empty list collapses to `Empty`.
    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: IndexSet<String> = values.into_iter().map(Into::into).collect();
        if set.is_empty() {
            SourceValue::Empty
        } else {
            SourceValue::Multi(set)
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SourceValue::Empty => true,
            SourceValue::Single(s) => s.is_empty(),
            SourceValue::Multi(set) => set.is_empty(),
        }
    }

    /// Values as a list: single becomes one element, empty becomes none.
    pub fn values(&self) -> Vec<&str> {
        match self {
            SourceValue::Empty => Vec::new(),
            SourceValue::Single(s) if s.is_empty() => Vec::new(),
            SourceValue::Single(s) => vec![s.as_str()],
            SourceValue::Multi(set) => set.iter().map(|s| s.as_str()).collect(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values().contains(&value)
    }
}

impl From<&str> for SourceValue {
    fn from(value: &str) -> Self {
        SourceValue::from_text(value)
    }
}

impl Serialize for SourceValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SourceValue::Empty => serializer.serialize_str(EMPTY_SENTINEL),
            SourceValue::Single(s) => serializer.serialize_str(s),
            SourceValue::Multi(set) if set.is_empty() => serializer.serialize_str(EMPTY_SENTINEL),
            SourceValue::Multi(set) => set.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSourceValue {
    Text(String),
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for SourceValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<RawSourceValue>::deserialize(deserializer)?;
        Ok(match raw {
            None => SourceValue::Empty,
            Some(RawSourceValue::Text(s)) if s == EMPTY_SENTINEL => SourceValue::Empty,
            Some(RawSourceValue::Text(s)) => SourceValue::Single(s),
            Some(RawSourceValue::List(values)) => SourceValue::multi(values),
        })
    }
}

/// One binding of a canonical column for one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    pub gabarito_column: String,
    #[serde(default)]
    pub source_column: SourceValue,
    pub source_file: SourceFile,
    /// Shared literal value for the column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Comma-joined extra variations, kept apart from `source_column`.
    #[serde(
        rename = "novas_variacoes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub extra_variations: Option<String>,
    /// Page the mapping was configured on, for page-level mappings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_index: Option<usize>,
}

impl ColumnMapping {
    pub fn new(column: impl Into<String>, value: SourceValue, file: SourceFile) -> Self {
        Self {
            gabarito_column: column.into(),
            source_column: value,
            source_file: file,
            name: None,
            extra_variations: None,
            page_index: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_page_index(mut self, page_index: usize) -> Self {
        self.page_index = Some(page_index);
        self
    }

    /// Whether this record binds `column` for `file`.
    pub fn is_for(&self, column: &str, file: SourceFile) -> bool {
        self.gabarito_column == column && self.source_file == file
    }

    /// Carries a shared name or a non-empty source value.
    pub fn has_binding(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty()) || !self.source_column.is_empty()
    }

    /// Parsed extra variations (upper-cased, trimmed, blanks dropped).
    pub fn extra_variation_list(&self) -> Vec<String> {
        self.extra_variations
            .as_deref()
            .map(super::variations::parse_variation_list)
            .unwrap_or_default()
    }
}

/// Snapshot of all mappings, at most one per (column, source) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingSet {
    mappings: Vec<ColumnMapping>,
}

impl MappingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from records; later records for the same pair replace earlier ones.
    pub fn from_mappings(mappings: impl IntoIterator<Item = ColumnMapping>) -> Self {
        let mut set = Self::new();
        for mapping in mappings {
            set.upsert(mapping);
        }
        set
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnMapping> {
        self.mappings.iter()
    }

    pub fn as_slice(&self) -> &[ColumnMapping] {
        &self.mappings
    }

    pub fn into_vec(self) -> Vec<ColumnMapping> {
        self.mappings
    }

    pub fn get(&self, column: &str, file: SourceFile) -> Option<&ColumnMapping> {
        self.mappings.iter().find(|m| m.is_for(column, file))
    }

    pub fn for_column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a ColumnMapping> + 'a {
        self.mappings.iter().filter(move |m| m.gabarito_column == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.mappings.iter().any(|m| m.gabarito_column == column)
    }

    /// Replace the record for the same pair in place, or append.
    pub(crate) fn upsert(&mut self, mapping: ColumnMapping) {
        match self
            .mappings
            .iter_mut()
            .find(|m| m.is_for(&mapping.gabarito_column, mapping.source_file))
        {
            Some(existing) => *existing = mapping,
            None => self.mappings.push(mapping),
        }
    }

    pub(crate) fn remove(&mut self, column: &str, file: SourceFile) {
        self.mappings.retain(|m| !m.is_for(column, file));
    }

    pub(crate) fn remove_column(&mut self, column: &str) {
        self.mappings.retain(|m| m.gabarito_column != column);
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ColumnMapping> {
        self.mappings.iter_mut()
    }
}

impl<'a> IntoIterator for &'a MappingSet {
    type Item = &'a ColumnMapping;
    type IntoIter = std::slice::Iter<'a, ColumnMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.mappings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_source_value_serialization() {
        assert_eq!(serde_json::to_value(SourceValue::Empty).unwrap(), json!("__EMPTY__"));
        assert_eq!(
            serde_json::to_value(SourceValue::Single("SKU".into())).unwrap(),
            json!("SKU")
        );
        assert_eq!(
            serde_json::to_value(SourceValue::multi(["RED", "BLUE"])).unwrap(),
            json!(["RED", "BLUE"])
        );
    }

    #[test]
    fn test_source_value_deserialization() {
        let v: SourceValue = serde_json::from_value(json!("__EMPTY__")).unwrap();
        assert_eq!(v, SourceValue::Empty);
        let v: SourceValue = serde_json::from_value(json!("SKU")).unwrap();
        assert_eq!(v, SourceValue::Single("SKU".into()));
        let v: SourceValue = serde_json::from_value(json!(["A", "B", "A"])).unwrap();
        assert_eq!(v, SourceValue::multi(["A", "B"]));
        let v: SourceValue = serde_json::from_value(json!([])).unwrap();
        assert_eq!(v, SourceValue::Empty);
        let v: SourceValue = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(v, SourceValue::Empty);
    }

    #[test]
    fn test_from_text() {
        assert_eq!(SourceValue::from_text("__EMPTY__"), SourceValue::Empty);
        assert_eq!(SourceValue::from_text("  "), SourceValue::Empty);
        assert_eq!(SourceValue::from_text("SKU"), SourceValue::Single("SKU".into()));
    }

    #[test]
    fn test_mapping_json_shape() {
        let mut mapping = ColumnMapping::new("COR", SourceValue::multi(["RED"]), SourceFile::Custo);
        mapping.extra_variations = Some("A1,A2".to_string());

        let value = serde_json::to_value(&mapping).unwrap();
        assert_eq!(
            value,
            json!({
                "gabaritoColumn": "COR",
                "sourceColumn": ["RED"],
                "sourceFile": "custo",
                "novas_variacoes": "A1,A2"
            })
        );

        let back: ColumnMapping = serde_json::from_value(value).unwrap();
        assert_eq!(back, mapping);
    }

    #[test]
    fn test_mapping_set_upsert_keeps_position() {
        let mut set = MappingSet::new();
        set.upsert(ColumnMapping::new("A", "x".into(), SourceFile::Custo));
        set.upsert(ColumnMapping::new("B", "y".into(), SourceFile::Custo));
        set.upsert(ColumnMapping::new("A", "z".into(), SourceFile::Custo));

        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice()[0].source_column, SourceValue::Single("z".into()));
    }

    #[test]
    fn test_from_mappings_deduplicates_pairs() {
        let set = MappingSet::from_mappings(vec![
            ColumnMapping::new("A", "x".into(), SourceFile::Custo),
            ColumnMapping::new("A", "y".into(), SourceFile::Venda),
            ColumnMapping::new("A", "z".into(), SourceFile::Custo),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.get("A", SourceFile::Custo).unwrap().source_column,
            SourceValue::Single("z".into())
        );
    }

    #[test]
    fn test_source_file_other() {
        assert_eq!(SourceFile::Custo.other(), SourceFile::Venda);
        assert_eq!(SourceFile::Venda.to_string(), "venda");
    }
}
