//! Main Gabarito struct and public API.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::export::{export_file_name, ConfigAssembler, ExportedConfig, ProductVariant, Readiness};
use crate::extract::{HeaderPolicy, Resolver};
use crate::input::{Loader, LoaderConfig, SourceTable, Workbook};
use crate::plan::WizardPlan;
use crate::session::Session;

/// Output name used when a plan does not set one.
pub const DEFAULT_OUTPUT_NAME: &str = "GABARITO";

/// Configuration for loading, extraction and export.
#[derive(Debug, Clone, Default)]
pub struct GabaritoConfig {
    /// Loader configuration.
    pub loader: LoaderConfig,
    /// Header detection tunables.
    pub header_policy: HeaderPolicy,
    /// Product variant used when a plan does not name one.
    pub variant: ProductVariant,
}

/// Result of building a plan.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub session: Session,
    pub readiness: Readiness,
    /// `None` while the session is not ready.
    pub config: Option<ExportedConfig>,
    /// Sanitized output file name.
    pub file_name: String,
}

/// Entry point tying the loader, resolver and assembler together.
#[derive(Debug, Clone, Default)]
pub struct Gabarito {
    config: GabaritoConfig,
    loader: Loader,
    resolver: Resolver,
}

impl Gabarito {
    /// Create a new instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(GabaritoConfig::default())
    }

    /// Create an instance with custom configuration.
    pub fn with_config(config: GabaritoConfig) -> Self {
        let loader = Loader::with_config(config.loader.clone());
        let resolver = Resolver::with_policy(config.header_policy);
        Self {
            config,
            loader,
            resolver,
        }
    }

    pub fn config(&self) -> &GabaritoConfig {
        &self.config
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Load a CSV or spreadsheet file.
    pub fn load_workbook(&self, path: impl AsRef<Path>) -> Result<Workbook> {
        self.loader.load_file(path)
    }

    /// Read one sheet of a file into a table.
    pub fn read_sheet(
        &self,
        path: impl AsRef<Path>,
        sheet_index: usize,
        start_cell: &str,
        stop_row: Option<u32>,
    ) -> Result<SourceTable> {
        let workbook = self.load_workbook(path)?;
        self.resolver
            .extract_table(&workbook, sheet_index, start_cell, stop_row)
    }

    /// Load a plan and replay it. Plan paths resolve against the plan's
    /// directory.
    pub fn load_plan(&self, path: impl AsRef<Path>) -> Result<(WizardPlan, Session)> {
        let path = path.as_ref();
        let plan = WizardPlan::load(path)?;
        let session = Session::from_plan(&plan, &plan_dir(path), &self.config)?;
        Ok((plan, session))
    }

    /// Assembler for a plan: the plan's variant wins over the configured one.
    pub fn assembler_for(&self, plan: &WizardPlan) -> ConfigAssembler {
        ConfigAssembler::new(plan.variant.unwrap_or(self.config.variant))
    }

    /// Replay a plan and assemble its config.
    pub fn build(&self, path: impl AsRef<Path>) -> Result<BuildResult> {
        let (plan, session) = self.load_plan(path)?;
        let assembler = self.assembler_for(&plan);
        let file_name = export_file_name(plan.output.as_deref().unwrap_or(DEFAULT_OUTPUT_NAME))?;

        Ok(BuildResult {
            readiness: assembler.readiness(&session),
            config: assembler.assemble(&session),
            session,
            file_name,
        })
    }
}

fn plan_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
