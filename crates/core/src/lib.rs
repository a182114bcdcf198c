//! # orderbook-core
//!
//! Converts heterogeneous order book worksheets into one canonical record set.
//!
//! Worksheets drift over time: the header row moves, columns are renamed,
//! reordered, added or dropped, and amounts arrive as display text. This
//! crate collapses every variant onto a fixed schema:
//!
//! - [`HeaderLocator`] finds the header row by two anchor labels
//! - [`ColumnResolver`] maps header labels onto the schema through aliases
//! - [`coerce_value`] turns formatted amounts into numbers
//! - [`SheetAssembler`] runs the three steps above for one worksheet
//! - [`WorkbookAggregator`] concatenates every visible sheet of a workbook
//! - [`RecordEnricher`] attaches provenance, filename dates and identity hashes
//!
//! # Example
//!
//! ```
//! use orderbook_core::{CellValue, PipelineConfig, RawGrid, SheetAssembler};
//!
//! let grid = RawGrid::from_data(vec![
//!     vec!["Order Book March", "", ""],
//!     vec!["Job Number", "Currency", "Gross Fee"],
//!     vec!["J-100", "USD", "(1,250.00)"],
//! ]);
//!
//! let config = PipelineConfig::default();
//! let (table, report) = SheetAssembler::new(&config).assemble("Data", &grid);
//!
//! assert_eq!(report.header_row, Some(1));
//! assert_eq!(table.columns().len(), 18);
//! assert_eq!(table.get(0, "GrossFee"), Some(&CellValue::Number(-1250.0)));
//! ```
//!
//! Reading the grid from a file is left to a [`WorkbookSource`]
//! implementation; see the `orderbook-sheet` crate for one backed by
//! calamine.

mod assembler;
mod cell;
mod coerce;
/// Canonical schema, alias and month tables.
pub mod config;
mod enrich;
mod error;
mod grid;
mod header;
mod normalize;
mod pipeline;
mod resolver;
mod table;
mod workbook;

pub use assembler::{SheetAssembler, SheetOutcome, SheetReport};
pub use cell::CellValue;
pub use coerce::{coerce_cell, coerce_column, coerce_value};
pub use config::{MonthEntry, PipelineConfig};
pub use enrich::{
    extract_date_from_filename, parse_filename_date, row_hash, EnrichedRecord, FileInfo,
    FilenameDate, RecordEnricher,
};
pub use error::{IngestError, Result};
pub use grid::RawGrid;
pub use header::HeaderLocator;
pub use normalize::{normalize_cell, normalize_label};
pub use pipeline::{BatchItem, OrderBookPipeline, WorkbookOutput};
pub use resolver::{dedupe_labels, ColumnMatch, ColumnResolver, Resolution};
pub use table::CanonicalTable;
pub use workbook::{
    SheetInfo, SheetVisibility, WorkbookAggregator, WorkbookExtraction, WorkbookSource,
};
