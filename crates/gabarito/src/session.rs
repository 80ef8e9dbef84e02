//! Immutable wizard state.
//!
//! A [`Session`] is a snapshot: attached sources, the mapping list, merge
//! settings, approved pages and the optional rule block. Every edit returns
//! a new snapshot, so the assembler only ever sees settled state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::SourceTable;
use crate::mapping::{MappingSet, Reconciler, SourceFile};
use crate::merge::MergeConfig;
use crate::pages::PageConfig;
use crate::rules::RuleSet;
use crate::schema::CanonicalSchema;

/// One mapping edit, as recorded in a plan file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum MappingAction {
    /// Bind a column to one source column, a custom literal, or
    /// `"__EMPTY__"`.
    SetSingle {
        column: String,
        value: String,
        file: SourceFile,
    },
    SetSharedName {
        column: String,
        name: String,
    },
    /// Check or uncheck one value of a multi-valued column. Defaults to
    /// the schema's variation column.
    ToggleVariation {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column: Option<String>,
        value: String,
        file: SourceFile,
        checked: bool,
    },
    AddExtraVariations {
        text: String,
    },
    RemoveExtraVariation {
        value: String,
    },
    ClearExtraVariations,
    ClearMapping {
        column: String,
        file: SourceFile,
    },
    ClearColumn {
        column: String,
    },
}

#[derive(Debug, Clone)]
pub struct Session {
    schema: Arc<CanonicalSchema>,
    custo: Option<Arc<SourceTable>>,
    venda: Option<Arc<SourceTable>>,
    mappings: MappingSet,
    merge: Option<MergeConfig>,
    custo_pages: Vec<PageConfig>,
    venda_pages: Vec<PageConfig>,
    stop_row: Option<u32>,
    rules: Option<RuleSet>,
}

impl Session {
    /// Empty session: no sources, no mappings.
    pub fn new(schema: CanonicalSchema) -> Self {
        Self {
            schema: Arc::new(schema),
            custo: None,
            venda: None,
            mappings: MappingSet::new(),
            merge: None,
            custo_pages: Vec::new(),
            venda_pages: Vec::new(),
            stop_row: None,
            rules: None,
        }
    }

    // -------------------------------------------------------------------------
    // Snapshot transitions
    // -------------------------------------------------------------------------

    /// Attach (or replace) a source table.
    pub fn with_source(&self, file: SourceFile, table: SourceTable) -> Self {
        let mut next = self.clone();
        let table = Some(Arc::new(table));
        match file {
            SourceFile::Custo => next.custo = table,
            SourceFile::Venda => next.venda = table,
        }
        next
    }

    /// Detach a source along with its approved pages.
    pub fn without_source(&self, file: SourceFile) -> Self {
        let mut next = self.clone();
        match file {
            SourceFile::Custo => {
                next.custo = None;
                next.custo_pages.clear();
            }
            SourceFile::Venda => {
                next.venda = None;
                next.venda_pages.clear();
            }
        }
        next
    }

    pub fn with_pages(&self, file: SourceFile, pages: Vec<PageConfig>) -> Self {
        let mut next = self.clone();
        match file {
            SourceFile::Custo => next.custo_pages = pages,
            SourceFile::Venda => next.venda_pages = pages,
        }
        next
    }

    pub fn with_merge_config(&self, merge: Option<MergeConfig>) -> Self {
        Self {
            merge,
            ..self.clone()
        }
    }

    pub fn with_stop_row(&self, stop_row: Option<u32>) -> Self {
        Self {
            stop_row,
            ..self.clone()
        }
    }

    pub fn with_rules(&self, rules: Option<RuleSet>) -> Self {
        Self {
            rules,
            ..self.clone()
        }
    }

    pub fn with_mappings(&self, mappings: MappingSet) -> Self {
        Self {
            mappings,
            ..self.clone()
        }
    }

    /// Apply one mapping edit.
    pub fn apply(&self, action: &MappingAction) -> Self {
        let r = self.reconciler();
        let m = &self.mappings;
        let mappings = match action {
            MappingAction::SetSingle {
                column,
                value,
                file,
            } => r.set_single(m, column, value, *file),
            MappingAction::SetSharedName { column, name } => r.set_shared_name(m, column, name),
            MappingAction::ToggleVariation {
                column,
                value,
                file,
                checked,
            } => {
                let column = column
                    .as_deref()
                    .unwrap_or(self.schema.variation_column.as_str());
                r.toggle_multi(m, column, value, *file, *checked)
            }
            MappingAction::AddExtraVariations { text } => r.add_extra_variations(m, text),
            MappingAction::RemoveExtraVariation { value } => r.remove_extra_variation(m, value),
            MappingAction::ClearExtraVariations => r.clear_extra_variations(m),
            MappingAction::ClearMapping { column, file } => r.clear_mapping(m, column, *file),
            MappingAction::ClearColumn { column } => r.clear_column(m, column),
        };
        debug!(?action, mappings = mappings.len(), "applied mapping action");
        self.with_mappings(mappings)
    }

    /// Apply edits in order.
    pub fn apply_all<'a>(&self, actions: impl IntoIterator<Item = &'a MappingAction>) -> Self {
        actions
            .into_iter()
            .fold(self.clone(), |session, action| session.apply(action))
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Reconciler bound to this snapshot's schema and sources.
    pub fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(&self.schema).with_tables(self.custo.as_deref(), self.venda.as_deref())
    }

    pub fn schema(&self) -> &CanonicalSchema {
        &self.schema
    }

    pub fn source(&self, file: SourceFile) -> Option<&SourceTable> {
        match file {
            SourceFile::Custo => self.custo.as_deref(),
            SourceFile::Venda => self.venda.as_deref(),
        }
    }

    pub fn has_any_source(&self) -> bool {
        self.custo.is_some() || self.venda.is_some()
    }

    pub fn has_both_sources(&self) -> bool {
        self.custo.is_some() && self.venda.is_some()
    }

    pub fn mappings(&self) -> &MappingSet {
        &self.mappings
    }

    pub fn merge_config(&self) -> Option<&MergeConfig> {
        self.merge.as_ref()
    }

    pub fn pages(&self, file: SourceFile) -> &[PageConfig] {
        match file {
            SourceFile::Custo => &self.custo_pages,
            SourceFile::Venda => &self.venda_pages,
        }
    }

    pub fn stop_row(&self) -> Option<u32> {
        self.stop_row
    }

    pub fn rules(&self) -> Option<&RuleSet> {
        self.rules.as_ref()
    }
}
