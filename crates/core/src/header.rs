use crate::config::PipelineConfig;
use crate::grid::RawGrid;
use crate::normalize::{normalize_cell, normalize_label};

/// Finds the row holding column titles by looking for two anchor labels.
#[derive(Debug, Clone)]
pub struct HeaderLocator {
    anchors: [String; 2],
    scan_rows: usize,
}

impl HeaderLocator {
    /// Create a locator for two anchor labels, searching `scan_rows` rows.
    #[must_use]
    pub fn new(first: &str, second: &str, scan_rows: usize) -> Self {
        HeaderLocator {
            anchors: [normalize_label(first), normalize_label(second)],
            scan_rows,
        }
    }

    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        let [first, second] = &config.header_anchors;
        Self::new(first, second, config.scan_rows)
    }

    /// Index of the first scanned row containing both anchors.
    pub fn locate(&self, grid: &RawGrid) -> Option<usize> {
        let limit = self.scan_rows.min(grid.row_count());
        (0..limit).find(|&r| {
            let labels: Vec<String> = grid
                .row(r)
                .unwrap_or_default()
                .iter()
                .map(|c| normalize_cell(c.as_deref()))
                .collect();
            self.anchors.iter().all(|a| labels.contains(a))
        })
    }
}
