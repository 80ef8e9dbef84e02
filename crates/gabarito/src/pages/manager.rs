//! Page selection, review and aggregation for one workbook.

use indexmap::IndexSet;
use tracing::{debug, info, warn};

use crate::error::{GabaritoError, Result};
use crate::extract::Resolver;
use crate::input::{fit_row, Sheet, SourceTable, Workbook};
use crate::mapping::ColumnMapping;

use super::config::PageConfig;

/// Result of copying the first approved page onto the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternOutcome {
    /// No approved page to copy from, or no page under review.
    NoPattern,
    Applied,
}

/// Result of combining the approved pages.
#[derive(Debug, Clone)]
pub enum Aggregation {
    NoApprovedPages,
    Combined(SourceTable),
}

impl Aggregation {
    pub fn into_table(self) -> Option<SourceTable> {
        match self {
            Aggregation::Combined(table) => Some(table),
            Aggregation::NoApprovedPages => None,
        }
    }
}

/// Tracks which pages of a workbook are read and how.
///
/// At most one page is under review (the draft) at a time. Approved pages
/// are kept in approval order; re-approving a page moves it to the end.
#[derive(Debug, Clone)]
pub struct PageManager<'a> {
    workbook: &'a Workbook,
    resolver: Resolver,
    selected: Vec<usize>,
    pages: Vec<PageConfig>,
    draft: Option<PageConfig>,
}

impl<'a> PageManager<'a> {
    pub fn new(workbook: &'a Workbook) -> Self {
        Self {
            workbook,
            resolver: Resolver::new(),
            selected: Vec::new(),
            pages: Vec::new(),
            draft: None,
        }
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn workbook(&self) -> &Workbook {
        self.workbook
    }

    pub fn selected_pages(&self) -> &[usize] {
        &self.selected
    }

    pub fn approved_pages(&self) -> &[PageConfig] {
        &self.pages
    }

    pub fn draft(&self) -> Option<&PageConfig> {
        self.draft.as_ref()
    }

    /// Select or deselect a page. Returns whether it is now selected.
    pub fn toggle_page(&mut self, index: usize) -> Result<bool> {
        self.sheet(index)?;
        if let Some(pos) = self.selected.iter().position(|&p| p == index) {
            self.selected.remove(pos);
            Ok(false)
        } else {
            self.selected.push(index);
            Ok(true)
        }
    }

    /// Open a page for review.
    ///
    /// Starts from the page's approved config when it has one, otherwise
    /// from `A1` with no stop row and no mappings. Columns are previewed
    /// straight away; a page whose header cannot be read opens with none.
    pub fn configure_page(&mut self, index: usize) -> Result<&PageConfig> {
        let sheet = self.sheet(index)?;
        let mut draft = match self.pages.iter().find(|p| p.page_index == index) {
            Some(existing) => existing.clone(),
            None => PageConfig::new(index, sheet.name.clone()),
        };

        match self.resolver.columns(sheet, &draft.start_cell) {
            Ok(columns) => draft.columns = columns,
            Err(e) => debug!(page = index, error = %e, "no columns for page preview"),
        }

        Ok(self.draft.insert(draft))
    }

    /// Change the draft's start cell and re-read its columns.
    ///
    /// Nothing changes when the address or the sheet cannot be read.
    pub fn set_start_cell(&mut self, start_cell: &str) -> Result<&[String]> {
        let start_cell = start_cell.trim().to_uppercase();
        let index = self.draft_ref()?.page_index;
        let columns = self.resolver.columns(self.sheet(index)?, &start_cell)?;

        let draft = self.draft_mut()?;
        draft.start_cell = start_cell;
        draft.columns = columns;
        Ok(&draft.columns)
    }

    pub fn set_stop_row(&mut self, stop_row: Option<u32>) -> Result<()> {
        self.draft_mut()?.stop_row = stop_row;
        Ok(())
    }

    /// Replace the draft's page-level mappings.
    pub fn set_page_mappings(&mut self, mappings: Vec<ColumnMapping>) -> Result<()> {
        let draft = self.draft_mut()?;
        let page_index = draft.page_index;
        draft.column_mappings = mappings
            .into_iter()
            .map(|m| m.with_page_index(page_index))
            .collect();
        Ok(())
    }

    /// Columns for the draft's current start cell.
    pub fn preview_columns(&self) -> Result<Vec<String>> {
        let draft = self.draft_ref()?;
        self.resolver
            .columns(self.sheet(draft.page_index)?, &draft.start_cell)
    }

    /// Store the draft as an approved page and close it.
    pub fn approve(&mut self) -> Result<&PageConfig> {
        let columns = self.preview_columns()?;
        let Some(mut page) = self.draft.take() else {
            return Err(no_draft());
        };
        page.columns = columns;
        page.is_approved = true;

        if !self.selected.contains(&page.page_index) {
            self.selected.push(page.page_index);
        }
        self.pages.retain(|p| p.page_index != page.page_index);
        info!(
            page = page.page_index,
            name = %page.page_name,
            start_cell = %page.start_cell,
            columns = page.columns.len(),
            "page approved"
        );
        self.pages.push(page);
        Ok(&self.pages[self.pages.len() - 1])
    }

    /// Discard the draft without approving it.
    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// Copy the first approved page's start cell and mappings onto the
    /// draft, re-reading its columns.
    pub fn reapply_pattern(&mut self) -> Result<PatternOutcome> {
        let (Some(pattern), Some(draft)) = (self.pages.first(), self.draft.as_ref()) else {
            return Ok(PatternOutcome::NoPattern);
        };

        let page_index = draft.page_index;
        let start_cell = pattern.start_cell.clone();
        let mappings: Vec<ColumnMapping> = pattern
            .column_mappings
            .iter()
            .cloned()
            .map(|m| m.with_page_index(page_index))
            .collect();
        let columns = self.resolver.columns(self.sheet(page_index)?, &start_cell)?;

        let draft = self.draft_mut()?;
        draft.start_cell = start_cell;
        draft.column_mappings = mappings;
        draft.columns = columns;
        Ok(PatternOutcome::Applied)
    }

    /// Drop a page's approved config. Returns whether one existed.
    pub fn remove_page(&mut self, index: usize) -> bool {
        let before = self.pages.len();
        self.pages.retain(|p| p.page_index != index);
        before != self.pages.len()
    }

    /// Combine every approved page into one table.
    ///
    /// Columns are the union of the pages' columns in first-seen order.
    /// Rows are appended in approval order and aligned by position: each
    /// row is padded or cut to the union width. A page whose extraction
    /// fails is logged and left out.
    pub fn aggregate(&self) -> Aggregation {
        if self.pages.is_empty() {
            return Aggregation::NoApprovedPages;
        }

        let columns: IndexSet<String> = self
            .pages
            .iter()
            .flat_map(|p| p.columns.iter().cloned())
            .collect();
        let width = columns.len();

        let mut rows = Vec::new();
        let mut locations = Vec::new();
        for page in &self.pages {
            let extracted = self.sheet(page.page_index).and_then(|sheet| {
                self.resolver
                    .extract(sheet, &page.start_cell, page.stop_row)
                    .map(|range| (sheet, range))
            });

            match extracted {
                Ok((sheet, range)) => {
                    debug!(page = page.page_index, rows = range.data_rows.len(), "page extracted");
                    for mut row_locations in range.cell_locations(&sheet.name) {
                        row_locations.truncate(width);
                        locations.push(row_locations);
                    }
                    rows.extend(range.data_rows.into_iter().map(|row| fit_row(row, width)));
                }
                Err(e) => {
                    warn!(page = page.page_index, name = %page.page_name, error = %e, "skipping page");
                }
            }
        }

        info!(
            source = %self.workbook.name(),
            pages = self.pages.len(),
            columns = width,
            rows = rows.len(),
            "pages aggregated"
        );

        let table = SourceTable::new(self.workbook.name(), columns.into_iter().collect(), rows)
            .with_origin_sheets(self.pages.iter().map(|p| p.page_name.clone()).collect())
            .with_cell_locations(locations)
            .with_metadata(self.workbook.metadata.clone());
        Aggregation::Combined(table)
    }

    fn sheet(&self, index: usize) -> Result<&'a Sheet> {
        self.workbook
            .sheet(index)
            .ok_or_else(|| GabaritoError::SheetNotFound(format!("page {}", index)))
    }

    fn draft_ref(&self) -> Result<&PageConfig> {
        self.draft.as_ref().ok_or_else(no_draft)
    }

    fn draft_mut(&mut self) -> Result<&mut PageConfig> {
        self.draft.as_mut().ok_or_else(no_draft)
    }
}

fn no_draft() -> GabaritoError {
    GabaritoError::Config("no page is under review".to_string())
}
