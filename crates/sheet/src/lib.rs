//! Excel workbook access for order book ingestion
//!
//! Implements [`orderbook_core::WorkbookSource`] on top of calamine, so any
//! `.xlsx`, `.xlsm`, `.xls` or `.xlsb` file can be fed through the
//! extraction pipeline.
//!
//! # Example
//!
//! ```no_run
//! use orderbook_core::OrderBookPipeline;
//! use orderbook_sheet::{file_info, ExcelWorkbook};
//!
//! let path = "books/1_Order_Book_Mar_2025.xlsx";
//! let file = file_info(path).unwrap();
//! let mut workbook = ExcelWorkbook::open(path).unwrap();
//!
//! let output = OrderBookPipeline::default()
//!     .process_workbook(&file, &mut workbook)
//!     .unwrap();
//! println!("{} records", output.records.len());
//! ```

mod file;
mod xlsx;

/// Re-export file metadata helpers.
pub use file::{file_info, is_supported_workbook, SUPPORTED_EXTENSIONS};
/// Re-export the calamine-backed workbook.
pub use xlsx::ExcelWorkbook;
