//! The canonical target schema ("gabarito").

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GabaritoError, Result};

/// Fixed set of target columns every source maps into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalSchema {
    /// Columns that must be mapped before a config can be produced.
    pub required_columns: Vec<String>,
    /// Columns that may be mapped.
    pub optional_columns: Vec<String>,
    /// The one column that accepts several source columns at once.
    pub variation_column: String,
    /// Optional columns always emitted, as `VAZIO` when left unmapped.
    #[serde(default)]
    pub immutable_optional_columns: Vec<String>,
    /// Columns the locked product variant fills with `MERGE`.
    #[serde(default)]
    pub merge_locked_columns: Vec<String>,
}

impl Default for CanonicalSchema {
    fn default() -> Self {
        let cols = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            required_columns: cols(&["DESCRICAO", "COR", "CUSTO", "PRECO1"]),
            optional_columns: cols(&[
                "REFERENCIA",
                "MARCA",
                "MATERIAL",
                "DIMENSOES",
                "CLASSIFICACAO_FIS",
                "COD_CLASSIFICACAO_FIS",
                "COD_PRODUTO",
                "OBSERVACAO",
            ]),
            variation_column: "COR".to_string(),
            immutable_optional_columns: cols(&[
                "CLASSIFICACAO_FIS",
                "COD_CLASSIFICACAO_FIS",
                "COD_PRODUTO",
            ]),
            merge_locked_columns: cols(&["CUSTO", "PRECO1"]),
        }
    }
}

impl CanonicalSchema {
    /// Create a schema with no immutable or merge-locked columns.
    pub fn new(
        required: impl IntoIterator<Item = impl Into<String>>,
        optional: impl IntoIterator<Item = impl Into<String>>,
        variation_column: impl Into<String>,
    ) -> Self {
        Self {
            required_columns: required.into_iter().map(Into::into).collect(),
            optional_columns: optional.into_iter().map(Into::into).collect(),
            variation_column: variation_column.into(),
            immutable_optional_columns: Vec::new(),
            merge_locked_columns: Vec::new(),
        }
    }

    pub fn with_immutable_optional(
        mut self,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.immutable_optional_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_merge_locked(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.merge_locked_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Load and validate a schema from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| GabaritoError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let schema: CanonicalSchema = serde_json::from_reader(BufReader::new(file))?;
        schema.validate()?;
        Ok(schema)
    }

    /// Required columns followed by optional columns.
    pub fn all_columns(&self) -> Vec<String> {
        self.required_columns
            .iter()
            .chain(self.optional_columns.iter())
            .cloned()
            .collect()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.is_required(column) || self.is_optional(column)
    }

    pub fn is_required(&self, column: &str) -> bool {
        self.required_columns.iter().any(|c| c == column)
    }

    pub fn is_optional(&self, column: &str) -> bool {
        self.optional_columns.iter().any(|c| c == column)
    }

    pub fn is_variation(&self, column: &str) -> bool {
        self.variation_column == column
    }

    pub fn is_merge_locked(&self, column: &str) -> bool {
        self.merge_locked_columns.iter().any(|c| c == column)
    }

    /// Check structural consistency.
    pub fn validate(&self) -> Result<()> {
        if self.required_columns.is_empty() && self.optional_columns.is_empty() {
            return Err(GabaritoError::Config("schema has no columns".to_string()));
        }

        let mut seen = HashSet::new();
        for column in self.required_columns.iter().chain(self.optional_columns.iter()) {
            if column.trim().is_empty() {
                return Err(GabaritoError::Config("schema has a blank column name".to_string()));
            }
            if !seen.insert(column.as_str()) {
                return Err(GabaritoError::Config(format!(
                    "column '{}' is listed more than once",
                    column
                )));
            }
        }

        if !self.contains(&self.variation_column) {
            return Err(GabaritoError::Config(format!(
                "variation column '{}' is not in the schema",
                self.variation_column
            )));
        }

        if let Some(column) = self
            .immutable_optional_columns
            .iter()
            .find(|c| !self.is_optional(c))
        {
            return Err(GabaritoError::Config(format!(
                "immutable column '{}' must be an optional column",
                column
            )));
        }

        if let Some(column) = self.merge_locked_columns.iter().find(|c| !self.contains(c)) {
            return Err(GabaritoError::Config(format!(
                "merge-locked column '{}' is not in the schema",
                column
            )));
        }

        Ok(())
    }

    /// Snapshot written into exported configs.
    pub fn snapshot(&self) -> SchemaSnapshot {
        SchemaSnapshot {
            required_columns: self.required_columns.clone(),
            optional_columns: self.optional_columns.clone(),
            all_columns: self.all_columns(),
        }
    }
}

/// The `gabarito` block of an exported config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSnapshot {
    pub required_columns: Vec<String>,
    pub optional_columns: Vec<String>,
    pub all_columns: Vec<String>,
}
