//! Workbook aggregation: runs the sheet assembler over every eligible sheet
//! and concatenates the results.

use crate::assembler::{SheetAssembler, SheetReport};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::grid::RawGrid;
use crate::table::CanonicalTable;
use serde::Serialize;
use tracing::{info, warn};

/// Visibility attribute of a worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetVisibility {
    Visible,
    Hidden,
    VeryHidden,
}

/// A worksheet listed by a workbook source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetInfo {
    pub name: String,
    pub visibility: SheetVisibility,
}

impl SheetInfo {
    #[must_use]
    pub fn visible(name: &str) -> Self {
        SheetInfo {
            name: name.to_string(),
            visibility: SheetVisibility::Visible,
        }
    }
}

/// Access to the sheets of one opened workbook.
pub trait WorkbookSource {
    /// List worksheets in workbook order.
    ///
    /// An error here means the workbook as a whole is unreadable.
    fn sheets(&mut self) -> Result<Vec<SheetInfo>>;

    /// Read one worksheet as a text grid.
    fn read_grid(&mut self, sheet: &str) -> Result<RawGrid>;

    /// Names of visible worksheets, in workbook order.
    fn visible_sheets(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for info in self.sheets()? {
            if info.visibility == SheetVisibility::Visible {
                names.push(info.name);
            } else {
                info!(sheet = %info.name, visibility = ?info.visibility, "skipping hidden sheet");
            }
        }
        Ok(names)
    }
}

/// Concatenated table of one workbook plus a report per attempted sheet.
#[derive(Debug, Clone)]
pub struct WorkbookExtraction {
    pub table: CanonicalTable,
    pub sheets: Vec<SheetReport>,
}

/// Runs sheet assembly across a workbook.
#[derive(Debug, Clone, Copy)]
pub struct WorkbookAggregator<'a> {
    config: &'a PipelineConfig,
}

impl<'a> WorkbookAggregator<'a> {
    #[must_use]
    pub fn new(config: &'a PipelineConfig) -> Self {
        WorkbookAggregator { config }
    }

    /// Extract every visible sheet of a workbook source.
    ///
    /// # Errors
    ///
    /// Returns an error only when the sheet list cannot be obtained.
    pub fn aggregate<S: WorkbookSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<WorkbookExtraction> {
        let sheets = source.visible_sheets()?;
        Ok(self.aggregate_sheets(&sheets, |name| source.read_grid(name)))
    }

    /// Extract the given sheets in order using `read` to fetch each grid.
    ///
    /// A sheet whose grid cannot be read is reported as failed and skipped.
    pub fn aggregate_sheets<N, F>(&self, sheets: &[N], mut read: F) -> WorkbookExtraction
    where
        N: AsRef<str>,
        F: FnMut(&str) -> Result<RawGrid>,
    {
        let assembler = SheetAssembler::new(self.config);
        let mut table = CanonicalTable::empty(&self.config.schema);
        let mut reports = Vec::with_capacity(sheets.len());

        for name in sheets {
            let name = name.as_ref();
            info!(sheet = name, "processing sheet");
            let grid = match read(name) {
                Ok(grid) => grid,
                Err(e) => {
                    warn!(sheet = name, error = %e, "error reading sheet");
                    reports.push(SheetReport::failed(name, e.to_string()));
                    continue;
                }
            };

            let (fragment, report) = assembler.assemble(name, &grid);
            if !fragment.is_empty() {
                if let Err(e) = table.append(fragment) {
                    warn!(sheet = name, error = %e, "fragment rejected");
                    reports.push(SheetReport::failed(name, e.to_string()));
                    continue;
                }
            }
            reports.push(report);
        }

        WorkbookExtraction {
            table,
            sheets: reports,
        }
    }
}
