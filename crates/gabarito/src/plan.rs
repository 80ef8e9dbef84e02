//! Plan files: a recorded wizard run that can be replayed into a session.
//!
//! A plan names the source files, how their pages are read, and the
//! mapping edits to apply, in order. Paths inside a plan are relative to
//! the plan's own directory.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{GabaritoError, Result};
use crate::export::ProductVariant;
use crate::extract::Resolver;
use crate::gabarito::GabaritoConfig;
use crate::input::{Loader, SourceTable};
use crate::mapping::{ColumnMapping, SourceFile};
use crate::merge::MergeConfig;
use crate::pages::{Aggregation, PageManager, DEFAULT_START_CELL};
use crate::rules::RuleDrafts;
use crate::schema::CanonicalSchema;
use crate::session::{MappingAction, Session};

/// A page to read from a source workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPage {
    pub page_index: usize,
    #[serde(default = "default_start_cell")]
    pub start_cell: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_row: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub column_mappings: Vec<ColumnMapping>,
}

fn default_start_cell() -> String {
    DEFAULT_START_CELL.to_string()
}

impl PlanPage {
    pub fn new(page_index: usize, start_cell: impl Into<String>) -> Self {
        Self {
            page_index,
            start_cell: start_cell.into(),
            stop_row: None,
            column_mappings: Vec::new(),
        }
    }
}

/// One source file. With no pages, the first sheet is read from `A1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSource {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<PlanPage>,
}

impl PlanSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pages: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custo: Option<PlanSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venda: Option<PlanSource>,
}

impl PlanSources {
    pub fn get(&self, file: SourceFile) -> Option<&PlanSource> {
        match file {
            SourceFile::Custo => self.custo.as_ref(),
            SourceFile::Venda => self.venda.as_ref(),
        }
    }
}

/// A replayable wizard run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardPlan {
    /// Schema file; the built-in schema when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<ProductVariant>,
    #[serde(default)]
    pub sources: PlanSources,
    #[serde(default)]
    pub actions: Vec<MappingAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_config: Option<MergeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<RuleDrafts>,
    /// Last sheet row (1-based, inclusive) for sources read without pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_row: Option<u32>,
    /// Output name, sanitized into `config_<NAME>.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl WizardPlan {
    /// Load a plan from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            GabaritoError::Persistence(format!("Failed to open plan '{}': {}", path.display(), e))
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            GabaritoError::Persistence(format!("Failed to parse plan '{}': {}", path.display(), e))
        })
    }

    /// Save the plan as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    GabaritoError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            GabaritoError::Persistence(format!("Failed to create plan '{}': {}", path.display(), e))
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .map_err(|e| GabaritoError::Persistence(format!("Failed to serialize plan: {}", e)))
    }
}

impl Session {
    /// Replay a plan: load the schema and sources, read their pages, then
    /// apply the recorded edits in order.
    pub fn from_plan(plan: &WizardPlan, base_dir: &Path, config: &GabaritoConfig) -> Result<Self> {
        let schema = match &plan.schema {
            Some(path) => CanonicalSchema::load(base_dir.join(path))?,
            None => CanonicalSchema::default(),
        };

        let loader = Loader::with_config(config.loader.clone());
        let resolver = Resolver::with_policy(config.header_policy);
        let mut session = Session::new(schema);

        for file in SourceFile::ALL {
            let Some(source) = plan.sources.get(file) else {
                continue;
            };
            let path = base_dir.join(&source.path);
            let workbook = loader.load_file(&path)?;

            if source.pages.is_empty() {
                let table = resolver.extract_table(&workbook, 0, DEFAULT_START_CELL, plan.stop_row)?;
                debug!(%file, rows = table.row_count(), "source read from first sheet");
                session = session.with_source(file, table);
                continue;
            }

            let mut pages = PageManager::new(&workbook).with_resolver(resolver.clone());
            for page in &source.pages {
                pages.configure_page(page.page_index)?;
                pages.set_start_cell(&page.start_cell)?;
                pages.set_stop_row(page.stop_row)?;
                pages.set_page_mappings(page.column_mappings.clone())?;
                pages.approve()?;
            }

            let table: SourceTable = match pages.aggregate() {
                Aggregation::Combined(table) => table,
                Aggregation::NoApprovedPages => {
                    return Err(GabaritoError::EmptyData(format!(
                        "no pages approved for '{}'",
                        path.display()
                    )));
                }
            };
            session = session
                .with_source(file, table)
                .with_pages(file, pages.approved_pages().to_vec());
        }

        let rules = match &plan.rules {
            Some(drafts) => drafts.export()?,
            None => None,
        };

        let session = session
            .apply_all(&plan.actions)
            .with_merge_config(plan.merge_config.clone())
            .with_stop_row(plan.stop_row)
            .with_rules(rules);

        info!(
            actions = plan.actions.len(),
            mappings = session.mappings().len(),
            "plan replayed"
        );
        Ok(session)
    }
}
