/// The unprocessed cell grid of one worksheet, read as text.
///
/// Rows may be ragged; missing trailing cells read as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGrid {
    rows: Vec<Vec<Option<String>>>,
}

impl RawGrid {
    #[must_use]
    pub fn new(rows: Vec<Vec<Option<String>>>) -> Self {
        RawGrid { rows }
    }

    /// Build a grid from string rows, treating empty strings as absent.
    ///
    /// ```
    /// use orderbook_core::RawGrid;
    ///
    /// let grid = RawGrid::from_data(vec![vec!["JobNumber", ""], vec!["J-1"]]);
    /// assert_eq!(grid.row_count(), 2);
    /// assert_eq!(grid.width(), 2);
    /// assert_eq!(grid.cell(0, 1), None);
    /// assert_eq!(grid.cell(1, 0), Some("J-1"));
    /// ```
    #[must_use]
    pub fn from_data<S: AsRef<str>>(data: Vec<Vec<S>>) -> Self {
        let rows = data
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|s| {
                        let s = s.as_ref();
                        (!s.is_empty()).then(|| s.to_string())
                    })
                    .collect()
            })
            .collect();
        RawGrid { rows }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Length of the longest row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell text at (row, col); out-of-range positions read as absent.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }

    /// The stored cells of one row (not padded).
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[Option<String>]> {
        self.rows.get(index).map(Vec::as_slice)
    }
}
