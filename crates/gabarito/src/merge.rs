//! Join parameters between the cost and sale sources.

use serde::{Deserialize, Serialize};

use crate::mapping::SourceFile;

/// Join type applied by the downstream merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    Left,
    Right,
    #[default]
    Inner,
    Outer,
}

/// How the two sources are joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeConfig {
    pub left_file: SourceFile,
    pub right_file: SourceFile,
    /// Empty until chosen.
    #[serde(default)]
    pub left_key: String,
    #[serde(default)]
    pub right_key: String,
    #[serde(default)]
    pub how: JoinKind,
    /// Join on the variation column as well as the keys.
    #[serde(default)]
    pub include_variation_key: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            left_file: SourceFile::Custo,
            right_file: SourceFile::Venda,
            left_key: String::new(),
            right_key: String::new(),
            how: JoinKind::Inner,
            include_variation_key: false,
        }
    }
}

impl MergeConfig {
    pub fn with_keys(mut self, left_key: impl Into<String>, right_key: impl Into<String>) -> Self {
        self.left_key = left_key.into();
        self.right_key = right_key.into();
        self
    }

    pub fn with_how(mut self, how: JoinKind) -> Self {
        self.how = how;
        self
    }

    /// Both keys chosen.
    pub fn is_ready(&self) -> bool {
        !self.left_key.is_empty() && !self.right_key.is_empty()
    }

    /// Whether a key is not among its file's columns (typed by hand).
    /// Unset keys are never custom.
    pub fn is_custom_key(key: &str, columns: Option<&[String]>) -> bool {
        if key.is_empty() {
            return false;
        }
        columns.is_some_and(|cols| !cols.iter().any(|c| c == key))
    }

    /// Copy with the locked-variant overrides: inner join that always
    /// includes the variation key.
    pub fn locked(&self) -> Self {
        Self {
            how: JoinKind::Inner,
            include_variation_key: true,
            ..self.clone()
        }
    }
}
