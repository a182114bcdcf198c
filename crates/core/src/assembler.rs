use crate::coerce::coerce_column;
use crate::config::PipelineConfig;
use crate::grid::RawGrid;
use crate::header::HeaderLocator;
use crate::resolver::{ColumnMatch, ColumnResolver};
use crate::table::CanonicalTable;
use serde::Serialize;
use tracing::{debug, info, warn};

/// What happened to one worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SheetOutcome {
    /// Rows were extracted.
    Extracted { rows: usize },
    /// No row in the scan window carried both anchors.
    NoHeader,
    /// A header was found but nothing usable sat below it.
    NoData,
    /// The sheet could not be read.
    Failed { reason: String },
}

impl SheetOutcome {
    #[must_use]
    pub fn is_extracted(&self) -> bool {
        matches!(self, SheetOutcome::Extracted { .. })
    }
}

/// Per-sheet account of header discovery and column resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetReport {
    pub sheet: String,
    pub header_row: Option<usize>,
    pub columns: Vec<ColumnMatch>,
    /// Numeric columns that were converted.
    pub coerced: Vec<String>,
    pub outcome: SheetOutcome,
}

impl SheetReport {
    pub(crate) fn failed(sheet: &str, reason: String) -> Self {
        SheetReport {
            sheet: sheet.to_string(),
            header_row: None,
            columns: Vec::new(),
            coerced: Vec::new(),
            outcome: SheetOutcome::Failed { reason },
        }
    }

    /// Canonical columns no candidate label matched.
    pub fn missing_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|m| !m.is_found())
            .map(|m| m.canonical.as_str())
    }
}

/// Turns one worksheet grid into a canonical table fragment.
#[derive(Debug, Clone)]
pub struct SheetAssembler<'a> {
    config: &'a PipelineConfig,
    locator: HeaderLocator,
}

impl<'a> SheetAssembler<'a> {
    #[must_use]
    pub fn new(config: &'a PipelineConfig) -> Self {
        SheetAssembler {
            config,
            locator: HeaderLocator::from_config(config),
        }
    }

    /// Locate the header, resolve columns and coerce numeric columns.
    ///
    /// Never fails: data-shape problems yield an empty table and an outcome
    /// describing why.
    pub fn assemble(&self, sheet: &str, grid: &RawGrid) -> (CanonicalTable, SheetReport) {
        let schema = &self.config.schema;
        let Some(header_row) = self.locator.locate(grid) else {
            info!(sheet, "no headers found, skipping");
            return (
                CanonicalTable::empty(schema),
                SheetReport {
                    sheet: sheet.to_string(),
                    header_row: None,
                    columns: Vec::new(),
                    coerced: Vec::new(),
                    outcome: SheetOutcome::NoHeader,
                },
            );
        };

        debug!(sheet, header_row, "header located");
        let resolution = ColumnResolver::new(self.config).resolve(grid, header_row);
        let mut table = resolution.table;

        let mut coerced = Vec::new();
        if !table.is_empty() {
            for column in &self.config.numeric_columns {
                let Some(mut view) = table.column_mut(column) else {
                    warn!(sheet, column = %column, "numeric column not in schema");
                    continue;
                };
                let mut values = view.take();
                if coerce_column(&mut values) {
                    coerced.push(column.clone());
                }
                view.put(values);
            }
        }

        let outcome = if table.is_empty() {
            info!(sheet, "no valid data found");
            SheetOutcome::NoData
        } else {
            info!(sheet, rows = table.row_count(), "sheet processed");
            SheetOutcome::Extracted {
                rows: table.row_count(),
            }
        };

        let report = SheetReport {
            sheet: sheet.to_string(),
            header_row: Some(header_row),
            columns: resolution.columns,
            coerced,
            outcome,
        };
        (table, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;

    fn order_book_grid() -> RawGrid {
        RawGrid::from_data(vec![
            vec!["ACME Consulting", "", "", "", ""],
            vec!["Order Book", "", "", "", ""],
            vec!["Job Number", "Client", "Currency", "Gross Fee", "Gross Fee (USD)"],
            vec!["J-1", "Acme", "USD", "(1,234.50)", "$2,000"],
            vec!["J-2", "Globex", "GBP", "n/a", "1,500"],
        ])
    }

    #[test]
    fn test_assemble_coerces_numeric_columns() {
        let config = PipelineConfig::default();
        let (table, report) = SheetAssembler::new(&config).assemble("Data", &order_book_grid());

        assert_eq!(report.header_row, Some(2));
        assert_eq!(report.outcome, SheetOutcome::Extracted { rows: 2 });
        assert_eq!(table.get(0, "GrossFee"), Some(&CellValue::Number(-1234.5)));
        assert_eq!(table.get(1, "GrossFee"), Some(&CellValue::Null));
        assert_eq!(table.get(0, "Gross Fee (USD)"), Some(&CellValue::Number(2000.0)));
        assert_eq!(table.get(1, "Gross Fee (USD)"), Some(&CellValue::Number(1500.0)));
        assert_eq!(table.get(0, "Currency"), Some(&CellValue::from("USD")));
        assert_eq!(report.coerced, vec!["Gross Fee (USD)", "GrossFee"]);
    }

    #[test]
    fn test_missing_columns_reported() {
        let config = PipelineConfig::default();
        let (_, report) = SheetAssembler::new(&config).assemble("Data", &order_book_grid());
        let missing: Vec<&str> = report.missing_columns().collect();
        assert!(missing.contains(&"Office"));
        assert!(!missing.contains(&"Client"));
    }

    #[test]
    fn test_no_header() {
        let config = PipelineConfig::default();
        let grid = RawGrid::from_data(vec![vec!["Summary"], vec!["Totals"]]);
        let (table, report) = SheetAssembler::new(&config).assemble("Cover", &grid);
        assert!(table.is_empty());
        assert_eq!(table.columns(), config.schema.as_slice());
        assert_eq!(report.outcome, SheetOutcome::NoHeader);
    }

    #[test]
    fn test_header_without_rows() {
        let config = PipelineConfig::default();
        let grid = RawGrid::from_data(vec![vec!["JobNumber", "Currency"]]);
        let (table, report) = SheetAssembler::new(&config).assemble("Empty", &grid);
        assert!(table.is_empty());
        assert_eq!(report.outcome, SheetOutcome::NoData);
        assert!(report.coerced.is_empty());
    }

    #[test]
    fn test_absent_numeric_column_not_coerced() {
        let config = PipelineConfig::default();
        let grid = RawGrid::from_data(vec![vec!["JobNumber", "Currency"], vec!["J-1", "USD"]]);
        let (table, report) = SheetAssembler::new(&config).assemble("Data", &grid);
        assert!(report.coerced.is_empty());
        assert!(table.get(0, "GrossFee").unwrap().is_null());
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_string(&SheetOutcome::Extracted { rows: 3 }).unwrap();
        assert_eq!(json, r#"{"status":"extracted","rows":3}"#);
    }
}
