//! Error types for order book ingestion.
//!
//! Only I/O-shaped failures are errors. Header misses, unmatched columns and
//! unparseable values are resolved to absent values inside the pipeline and
//! never surface here.

use thiserror::Error;

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors that can occur while ingesting a workbook.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The workbook could not be opened or its sheets could not be listed.
    #[error("Cannot open workbook '{name}': {reason}")]
    WorkbookOpen { name: String, reason: String },

    /// A single worksheet could not be read.
    #[error("Cannot read sheet '{sheet}': {reason}")]
    SheetRead { sheet: String, reason: String },

    #[error("Unsupported workbook format: {name}")]
    UnsupportedFormat { name: String },

    /// Pipeline configuration failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Column mismatch: expected {expected:?}, got {actual:?}")]
    ColumnMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    /// Whether this error only affects a single sheet.
    #[must_use]
    pub fn is_sheet_level(&self) -> bool {
        matches!(self, IngestError::SheetRead { .. })
    }
}
