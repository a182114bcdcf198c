//! Column resolution: maps a worksheet's own header labels onto the
//! canonical schema.
//!
//! Resolution happens in one declarative pass. Each canonical column probes
//! its candidate labels in order against an index of the sheet's normalized
//! labels; the first hit supplies the column's values, and a miss leaves the
//! column absent-filled.

use crate::cell::CellValue;
use crate::config::PipelineConfig;
use crate::grid::RawGrid;
use crate::normalize::normalize_label;
use crate::table::CanonicalTable;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// How one canonical column was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMatch {
    pub canonical: String,
    /// Effective sheet label the values came from, if any candidate matched.
    pub source: Option<String>,
    /// Candidate spellings probed, in order.
    pub tried: Vec<String>,
}

impl ColumnMatch {
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.source.is_some()
    }
}

/// Output of resolving one sheet.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub table: CanonicalTable,
    pub columns: Vec<ColumnMatch>,
    /// Effective (deduplicated) header labels of the sheet.
    pub labels: Vec<String>,
}

/// Make header labels unique.
///
/// Blank or absent labels become `unnamed_col_{i}`. A label already seen gets
/// `_duplicate_{n}` appended, where `n` counts earlier repeats starting at 1
/// for the second occurrence. A label that matches a name generated earlier
/// is renamed the same way. If a generated name is itself taken, the counter
/// keeps advancing until it is free.
///
/// ```
/// use orderbook_core::dedupe_labels;
///
/// let labels = dedupe_labels(&[Some("Client"), None, Some("Client")]);
/// assert_eq!(labels, vec!["Client", "unnamed_col_1", "Client_duplicate_1"]);
/// ```
#[must_use]
pub fn dedupe_labels<S: AsRef<str>>(raw: &[Option<S>]) -> Vec<String> {
    let mut repeats: HashMap<String, usize> = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();
    let mut labels = Vec::with_capacity(raw.len());

    for (i, label) in raw.iter().enumerate() {
        let base = match label.as_ref().map(|s| AsRef::<str>::as_ref(s).trim()) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => format!("unnamed_col_{i}"),
        };

        let name = if repeats.contains_key(&base) || used.contains(&base) {
            let count = repeats.entry(base.clone()).or_insert(0);
            loop {
                *count += 1;
                let candidate = format!("{base}_duplicate_{count}");
                if !used.contains(&candidate) {
                    break candidate;
                }
            }
        } else {
            repeats.insert(base.clone(), 0);
            base
        };

        used.insert(name.clone());
        labels.push(name);
    }

    labels
}

/// Maps header labels onto the canonical schema.
#[derive(Debug, Clone, Copy)]
pub struct ColumnResolver<'a> {
    config: &'a PipelineConfig,
}

impl<'a> ColumnResolver<'a> {
    #[must_use]
    pub fn new(config: &'a PipelineConfig) -> Self {
        ColumnResolver { config }
    }

    /// Resolve the rows below `header_row` into a canonical table.
    ///
    /// The result always carries the full schema. It is empty when no
    /// canonical column matched or there are no data rows.
    pub fn resolve(&self, grid: &RawGrid, header_row: usize) -> Resolution {
        let width = grid.width();
        let header: Vec<Option<&str>> = (0..width).map(|c| grid.cell(header_row, c)).collect();
        let labels = dedupe_labels(&header);

        // Leftmost label wins when two effective labels normalize alike.
        let mut index: HashMap<String, usize> = HashMap::new();
        for (pos, label) in labels.iter().enumerate() {
            index.entry(normalize_label(label)).or_insert(pos);
        }

        let data_rows = (header_row + 1)..grid.row_count();
        let row_count = data_rows.len();
        let schema = &self.config.schema;

        let mut matches = Vec::with_capacity(schema.len());
        let mut values = Vec::with_capacity(schema.len());
        for canonical in schema {
            let candidates = self.config.candidates(canonical);
            let hit = candidates
                .iter()
                .find_map(|c| index.get(&normalize_label(c)).copied());

            match hit {
                Some(pos) => {
                    debug!(column = %canonical, source = %labels[pos], "column found");
                    values.push(
                        data_rows
                            .clone()
                            .map(|r| CellValue::from_raw(grid.cell(r, pos)))
                            .collect(),
                    );
                }
                None => {
                    debug!(column = %canonical, tried = ?candidates, "column missing");
                    values.push(vec![CellValue::Null; row_count]);
                }
            }

            matches.push(ColumnMatch {
                canonical: canonical.clone(),
                source: hit.map(|pos| labels[pos].clone()),
                tried: candidates.iter().map(|c| (*c).to_string()).collect(),
            });
        }

        let table = if matches.iter().any(ColumnMatch::is_found) && row_count > 0 {
            CanonicalTable::from_columns(schema, values, row_count)
        } else {
            CanonicalTable::empty(schema)
        };

        Resolution {
            table,
            columns: matches,
            labels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PipelineConfig {
        PipelineConfig::default()
    }

    #[test]
    fn test_dedupe_numbers_from_one() {
        let labels = dedupe_labels(&[Some("A"), Some("A"), Some("A"), Some("B")]);
        assert_eq!(labels, vec!["A", "A_duplicate_1", "A_duplicate_2", "B"]);
    }

    #[test]
    fn test_dedupe_blank_labels() {
        let labels = dedupe_labels(&[None, Some("  "), Some(" X ")]);
        assert_eq!(labels, vec!["unnamed_col_0", "unnamed_col_1", "X"]);
    }

    #[test]
    fn test_dedupe_avoids_existing_suffix() {
        let labels = dedupe_labels(&[Some("A"), Some("A_duplicate_1"), Some("A")]);
        assert_eq!(labels, vec!["A", "A_duplicate_1", "A_duplicate_2"]);
    }

    #[test]
    fn test_dedupe_renames_label_matching_generated_name() {
        let labels = dedupe_labels(&[Some("A"), Some("A"), Some("A_duplicate_1"), Some("A")]);
        assert_eq!(
            labels,
            vec!["A", "A_duplicate_1", "A_duplicate_1_duplicate_1", "A_duplicate_2"]
        );
        let unique: HashSet<&String> = labels.iter().collect();
        assert_eq!(unique.len(), labels.len());
    }

    #[test]
    fn test_dedupe_raw_label_matching_placeholder() {
        let labels = dedupe_labels(&[Some("unnamed_col_1"), None]);
        assert_eq!(labels, vec!["unnamed_col_1", "unnamed_col_1_duplicate_1"]);
    }

    #[test]
    fn test_resolve_reorders_to_schema() {
        let config = config();
        let grid = RawGrid::from_data(vec![
            vec!["Currency", "Client", "Job Number", "Extra"],
            vec!["USD", "Acme", "J-1", "x"],
            vec!["EUR", "Globex", "J-2", "y"],
        ]);
        let resolution = ColumnResolver::new(&config).resolve(&grid, 0);
        let table = resolution.table;

        assert_eq!(table.columns(), config.schema.as_slice());
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, "JobNumber"), Some(&CellValue::from("J-1")));
        assert_eq!(table.get(1, "Client"), Some(&CellValue::from("Globex")));
        assert_eq!(table.get(1, "Currency"), Some(&CellValue::from("EUR")));
        assert_eq!(table.get(0, "Office"), Some(&CellValue::Null));
        assert!(table.column_index("Extra").is_none());
    }

    #[test]
    fn test_alias_probe_order() {
        let config = config();
        let grid = RawGrid::from_data(vec![
            vec!["JobNumber", "Country", "Location", "Is New"],
            vec!["J-1", "UK", "London", "Y"],
        ]);
        let resolution = ColumnResolver::new(&config).resolve(&grid, 0);
        assert_eq!(
            resolution.table.get(0, "Location (Country)"),
            Some(&CellValue::from("London"))
        );
        assert_eq!(resolution.table.get(0, "NewProject"), Some(&CellValue::from("Y")));

        let location = resolution
            .columns
            .iter()
            .find(|m| m.canonical == "Location (Country)")
            .unwrap();
        assert_eq!(location.source.as_deref(), Some("Location"));
    }

    #[test]
    fn test_duplicate_client_maps_first_occurrence() {
        let config = config();
        let grid = RawGrid::from_data(vec![
            vec!["JobNumber", "Client", "Client"],
            vec!["J-1", "First", "Second"],
        ]);
        let resolution = ColumnResolver::new(&config).resolve(&grid, 0);
        assert_eq!(resolution.labels[2], "Client_duplicate_1");
        assert_eq!(resolution.table.get(0, "Client"), Some(&CellValue::from("First")));
    }

    #[test]
    fn test_blank_header_gets_placeholder() {
        let config = config();
        let grid = RawGrid::from_data(vec![
            vec!["JobNumber", "", "Client"],
            vec!["J-1", "orphan", "Acme"],
        ]);
        let resolution = ColumnResolver::new(&config).resolve(&grid, 0);
        assert_eq!(resolution.labels[1], "unnamed_col_1");
        let records = resolution.table.to_records();
        assert!(records[0].values().all(|v| v.as_text() != Some("orphan")));
    }

    #[test]
    fn test_placeholder_resolvable_through_custom_schema() {
        let mut config = config();
        config.schema.push("unnamed_col_1".to_string());
        let grid = RawGrid::from_data(vec![vec!["JobNumber", ""], vec!["J-1", "kept"]]);
        let resolution = ColumnResolver::new(&config).resolve(&grid, 0);
        assert_eq!(resolution.table.get(0, "unnamed_col_1"), Some(&CellValue::from("kept")));
    }

    #[test]
    fn test_header_wider_than_rows() {
        let config = config();
        let grid = RawGrid::from_data(vec![vec!["JobNumber"], vec!["J-1", "", "", "", "late"]]);
        let resolution = ColumnResolver::new(&config).resolve(&grid, 0);
        assert_eq!(resolution.labels.len(), 5);
        assert_eq!(resolution.labels[4], "unnamed_col_4");
        assert_eq!(resolution.table.row_count(), 1);
    }

    #[test]
    fn test_no_data_rows_is_empty() {
        let config = config();
        let grid = RawGrid::from_data(vec![vec!["JobNumber", "Currency"]]);
        let resolution = ColumnResolver::new(&config).resolve(&grid, 0);
        assert!(resolution.table.is_empty());
        assert_eq!(resolution.table.columns().len(), 18);
    }

    #[test]
    fn test_no_match_is_empty() {
        let config = config();
        let grid = RawGrid::from_data(vec![vec!["foo", "bar"], vec!["1", "2"]]);
        let resolution = ColumnResolver::new(&config).resolve(&grid, 0);
        assert!(resolution.table.is_empty());
        assert!(resolution.columns.iter().all(|m| !m.is_found()));
        assert_eq!(resolution.table.columns(), config.schema.as_slice());
    }

    #[test]
    fn test_blank_data_rows_are_kept() {
        let config = config();
        let grid = RawGrid::from_data(vec![
            vec!["JobNumber", "Client"],
            vec!["J-1", "Acme"],
            vec!["", ""],
            vec!["J-3", "Initech"],
        ]);
        let table = ColumnResolver::new(&config).resolve(&grid, 0).table;
        assert_eq!(table.row_count(), 3);
        assert!(table.get(1, "JobNumber").unwrap().is_null());
    }
}
