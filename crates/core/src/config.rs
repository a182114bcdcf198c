//! Pipeline configuration: canonical schema, alias table and month table.
//!
//! The defaults describe the order book layout. Every table can be replaced
//! from YAML or JSON so tests and alternate feeds can swap the schema without
//! touching process-wide state.

use crate::error::{IngestError, Result};
use crate::normalize::normalize_label;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Number of leading rows searched for the header row.
pub const DEFAULT_SCAN_ROWS: usize = 20;

/// Canonical output columns, in output order.
pub const TARGET_COLUMNS: [&str; 18] = [
    "JobNumber",
    "Office",
    "Office (Div)",
    "ProjectTitle",
    "Client",
    "Location (Country)",
    "Gross Fee (USD)",
    "Fee Earned (USD)",
    "Gross Fee Yet To Be Earned (USD)",
    "Currency",
    "GrossFee",
    "GrossFeeEarned",
    "GrossFeeYetToBeEarned",
    "Status",
    "NewProject",
    "StartDate",
    "Anticipated EndDate",
    "ProjectType",
];

/// Columns converted from display text to numbers.
pub const NUMERIC_COLUMNS: [&str; 6] = [
    "Gross Fee (USD)",
    "Fee Earned (USD)",
    "Gross Fee Yet To Be Earned (USD)",
    "GrossFee",
    "GrossFeeEarned",
    "GrossFeeYetToBeEarned",
];

/// Fields feeding the row identity hash.
pub const HASH_FIELDS: [&str; 4] = ["JobNumber", "ProjectTitle", "Client", "Office"];

/// One entry of the filename month table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthEntry {
    /// Lower-case token searched for in the file name.
    pub key: String,
    pub number: u32,
    /// Display name reported for the month.
    pub name: String,
}

impl MonthEntry {
    fn new(key: &str, number: u32, name: &str) -> Self {
        MonthEntry {
            key: key.to_string(),
            number,
            name: name.to_string(),
        }
    }
}

/// Month table in match order. Abbreviations precede full names.
#[must_use]
pub fn default_months() -> Vec<MonthEntry> {
    vec![
        MonthEntry::new("jan", 1, "Jan"),
        MonthEntry::new("january", 1, "Jan"),
        MonthEntry::new("feb", 2, "Feb"),
        MonthEntry::new("february", 2, "Feb"),
        MonthEntry::new("mar", 3, "Mar"),
        MonthEntry::new("march", 3, "Mar"),
        MonthEntry::new("apr", 4, "Apr"),
        MonthEntry::new("april", 4, "Apr"),
        MonthEntry::new("may", 5, "May"),
        MonthEntry::new("jun", 6, "Jun"),
        MonthEntry::new("june", 6, "Jun"),
        MonthEntry::new("jul", 7, "Jul"),
        MonthEntry::new("july", 7, "Jul"),
        MonthEntry::new("aug", 8, "Aug"),
        MonthEntry::new("august", 8, "Aug"),
        MonthEntry::new("sep", 9, "Sep"),
        MonthEntry::new("sept", 9, "Sep"),
        MonthEntry::new("september", 9, "Sep"),
        MonthEntry::new("oct", 10, "Oct"),
        MonthEntry::new("october", 10, "Oct"),
        MonthEntry::new("nov", 11, "Nov"),
        MonthEntry::new("november", 11, "Nov"),
        MonthEntry::new("dec", 12, "Dec"),
        MonthEntry::new("december", 12, "Dec"),
    ]
}

fn default_aliases() -> IndexMap<String, Vec<String>> {
    let mut aliases = IndexMap::new();
    aliases.insert(
        "Location (Country)".to_string(),
        to_strings(&["Location (Country)", "Location", "Country"]),
    );
    aliases.insert(
        "NewProject".to_string(),
        to_strings(&["NewProject", "New Project", "New_Project", "IsNew", "Is New"]),
    );
    aliases
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Immutable configuration shared by every stage of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Canonical columns in output order.
    pub schema: Vec<String>,
    /// Candidate source labels per canonical column, probed in order.
    pub aliases: IndexMap<String, Vec<String>>,
    pub numeric_columns: Vec<String>,
    /// Two labels that must share a row for it to count as the header.
    pub header_anchors: [String; 2],
    pub scan_rows: usize,
    pub hash_fields: Vec<String>,
    pub hash_separator: String,
    pub months: Vec<MonthEntry>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            schema: to_strings(&TARGET_COLUMNS),
            aliases: default_aliases(),
            numeric_columns: to_strings(&NUMERIC_COLUMNS),
            header_anchors: ["JobNumber".to_string(), "Currency".to_string()],
            scan_rows: DEFAULT_SCAN_ROWS,
            hash_fields: to_strings(&HASH_FIELDS),
            hash_separator: "|".to_string(),
            months: default_months(),
        }
    }
}

impl PipelineConfig {
    /// Load and validate a configuration from YAML text.
    ///
    /// Keys left out of the document keep their default values.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Candidate labels for a canonical column.
    ///
    /// Columns without an alias entry accept only their own name.
    #[must_use]
    pub fn candidates<'a>(&'a self, column: &'a str) -> Vec<&'a str> {
        match self.aliases.get(column) {
            Some(names) => names.iter().map(String::as_str).collect(),
            None => vec![column],
        }
    }

    /// Whether a canonical column is converted to numbers.
    #[must_use]
    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric_columns.iter().any(|c| c == column)
    }

    /// Check the internal consistency of the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.schema.is_empty() {
            return Err(IngestError::Config("schema must not be empty".to_string()));
        }
        if self.scan_rows == 0 {
            return Err(IngestError::Config("scan_rows must be positive".to_string()));
        }

        let mut seen = HashSet::new();
        for column in &self.schema {
            if !seen.insert(column.as_str()) {
                return Err(IngestError::Config(format!(
                    "duplicate schema column '{column}'"
                )));
            }
        }

        let referenced = self
            .aliases
            .keys()
            .map(|c| ("alias", c))
            .chain(self.numeric_columns.iter().map(|c| ("numeric", c)))
            .chain(self.hash_fields.iter().map(|c| ("hash", c)));
        for (kind, column) in referenced {
            if !seen.contains(column.as_str()) {
                return Err(IngestError::Config(format!(
                    "{kind} column '{column}' is not in the schema"
                )));
            }
        }

        for anchor in &self.header_anchors {
            if normalize_label(anchor).is_empty() {
                return Err(IngestError::Config(format!(
                    "header anchor '{anchor}' normalizes to an empty label"
                )));
            }
        }

        Ok(())
    }
}
