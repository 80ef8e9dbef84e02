//! Value separators (`separadores` block): split one source value into
//! several variation items.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{GabaritoError, Result};
use crate::mapping::MappingSet;

/// A separator as edited: words kept as free text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeparatorDraft {
    pub coluna: String,
    #[serde(default)]
    pub valor_original: String,
    /// Comma-separated items.
    #[serde(default)]
    pub palavras: String,
}

/// A separator as exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Separator {
    pub coluna: String,
    pub valor_original: String,
    pub itens_separados: Vec<String>,
}

impl SeparatorDraft {
    pub fn new(
        coluna: impl Into<String>,
        valor_original: impl Into<String>,
        palavras: impl Into<String>,
    ) -> Self {
        Self {
            coluna: coluna.into(),
            valor_original: valor_original.into(),
            palavras: palavras.into(),
        }
    }

    pub fn items(&self) -> Vec<String> {
        split_words(&self.palavras)
    }

    /// Drop every occurrence of `item` and rewrite the words.
    pub fn remove_item(&mut self, item: &str) {
        let kept: Vec<String> = self.items().into_iter().filter(|i| i != item).collect();
        self.palavras = kept.join(", ");
    }

    /// Has a column and at least one item.
    pub fn is_complete(&self) -> bool {
        !self.coluna.trim().is_empty() && !self.items().is_empty()
    }

    fn finish(&self) -> Separator {
        Separator {
            coluna: self.coluna.trim().to_string(),
            valor_original: self.valor_original.trim().to_string(),
            itens_separados: self.items(),
        }
    }
}

/// Split on commas, trimming and dropping blanks.
pub fn split_words(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

/// Complete drafts, trimmed. Fails when none are complete.
pub fn export_separators(drafts: &[SeparatorDraft]) -> Result<Vec<Separator>> {
    let separators: Vec<Separator> = drafts
        .iter()
        .filter(|d| d.is_complete())
        .map(SeparatorDraft::finish)
        .collect();

    if separators.is_empty() {
        return Err(GabaritoError::EmptyData(
            "no separator has both a column and items".to_string(),
        ));
    }
    Ok(separators)
}

/// Canonical columns that some mapping binds to real data, sorted.
///
/// A shared name alone does not count; the mapping must select a
/// non-blank source value.
pub fn candidate_columns(mappings: &MappingSet) -> Vec<String> {
    let columns: BTreeSet<&str> = mappings
        .iter()
        .filter(|m| m.source_column.values().iter().any(|v| !v.trim().is_empty()))
        .map(|m| m.gabarito_column.as_str())
        .collect();
    columns.into_iter().map(String::from).collect()
}
