//! Provenance and identity enrichment of canonical rows.

use crate::cell::CellValue;
use crate::config::{MonthEntry, PipelineConfig};
use crate::table::CanonicalTable;
use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use md5::{Digest, Md5};
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;

fn year_regex() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| Regex::new(r"20\d{2}").expect("valid regex"))
}

/// A candidate source file as described by the discovery layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    /// File name, used for provenance and date parsing.
    pub name: String,
    pub location: PathBuf,
    /// Last-modified time in local time.
    pub modified: NaiveDateTime,
}

impl FileInfo {
    #[must_use]
    pub fn new(name: &str, location: impl Into<PathBuf>, modified: NaiveDateTime) -> Self {
        FileInfo {
            name: name.to_string(),
            location: location.into(),
            modified,
        }
    }
}

/// Year and month parsed out of a file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilenameDate {
    pub year: Option<i32>,
    pub month_name: Option<String>,
    pub month_num: Option<u32>,
}

/// Parse year and month from a file name using the default month table.
///
/// ```
/// use orderbook_core::extract_date_from_filename;
///
/// let date = extract_date_from_filename("1_Order_Book_Mar_2025.xlsx");
/// assert_eq!(date.year, Some(2025));
/// assert_eq!(date.month_name.as_deref(), Some("Mar"));
/// assert_eq!(date.month_num, Some(3));
/// ```
#[must_use]
pub fn extract_date_from_filename(filename: &str) -> FilenameDate {
    parse_filename_date(filename, &crate::config::default_months())
}

/// Parse year and month from a file name using the given month table.
///
/// The year is the first `20xx` token. The month is the first table entry,
/// in table order, whose key occurs anywhere in the lower-cased name.
#[must_use]
pub fn parse_filename_date(filename: &str, months: &[MonthEntry]) -> FilenameDate {
    let year = year_regex()
        .find(filename)
        .and_then(|m| m.as_str().parse().ok());

    let lowered = filename.to_lowercase();
    let month = months.iter().find(|m| lowered.contains(m.key.as_str()));

    FilenameDate {
        year,
        month_name: month.map(|m| m.name.clone()),
        month_num: month.map(|m| m.number),
    }
}

/// Hex MD5 digest of the given field values joined by `separator`.
///
/// ```
/// use orderbook_core::row_hash;
///
/// let hash = row_hash(&["J-1", "Bridge", "Acme", "London"], "|");
/// assert_eq!(hash.len(), 32);
/// assert_eq!(hash, row_hash(&["J-1", "Bridge", "Acme", "London"], "|"));
/// ```
#[must_use]
pub fn row_hash<S: AsRef<str>>(fields: &[S], separator: &str) -> String {
    let mut joined = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            joined.push_str(separator);
        }
        joined.push_str(field.as_ref());
    }
    hex::encode(Md5::digest(joined.as_bytes()))
}

/// A canonical row with provenance metadata and its identity hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub values: IndexMap<String, CellValue>,
    pub source_file: String,
    pub source_mtime: NaiveDateTime,
    pub data_year: Option<i32>,
    pub data_month: Option<String>,
    pub data_month_num: Option<u32>,
    pub data_collection_date: NaiveDate,
    pub row_hash: String,
}

impl EnrichedRecord {
    /// Value of a canonical column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }
}

/// Attaches provenance and identity hashes to canonical rows.
#[derive(Debug, Clone, Copy)]
pub struct RecordEnricher<'a> {
    config: &'a PipelineConfig,
}

impl<'a> RecordEnricher<'a> {
    #[must_use]
    pub fn new(config: &'a PipelineConfig) -> Self {
        RecordEnricher { config }
    }

    /// Identity hash of one record over the configured hash fields.
    ///
    /// Absent fields hash as empty strings.
    #[must_use]
    pub fn hash_record(&self, values: &IndexMap<String, CellValue>) -> String {
        let fields: Vec<String> = self
            .config
            .hash_fields
            .iter()
            .map(|f| values.get(f).map(CellValue::as_str).unwrap_or_default())
            .collect();
        row_hash(&fields, &self.config.hash_separator)
    }

    /// Enrich every row of a workbook table.
    #[must_use]
    pub fn enrich(&self, table: &CanonicalTable, file: &FileInfo) -> Vec<EnrichedRecord> {
        let date = parse_filename_date(&file.name, &self.config.months);
        let collection_date = file.modified.date();

        table
            .to_records()
            .into_iter()
            .map(|values| {
                let row_hash = self.hash_record(&values);
                EnrichedRecord {
                    values,
                    source_file: file.name.clone(),
                    source_mtime: file.modified,
                    data_year: date.year,
                    data_month: date.month_name.clone(),
                    data_month_num: date.month_num,
                    data_collection_date: collection_date,
                    row_hash,
                }
            })
            .collect()
    }
}
