use crate::cell::CellValue;
use crate::error::{IngestError, Result};
use indexmap::IndexMap;

/// A table whose columns are exactly the canonical schema, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl CanonicalTable {
    /// An explicitly empty table: all schema columns, zero rows.
    #[must_use]
    pub fn empty(schema: &[String]) -> Self {
        CanonicalTable {
            columns: schema.to_vec(),
            rows: Vec::new(),
        }
    }

    /// Assemble a table from column-major data.
    ///
    /// `columns` holds one value vector per schema column; every vector must
    /// have `row_count` entries.
    pub(crate) fn from_columns(
        schema: &[String],
        columns: Vec<Vec<CellValue>>,
        row_count: usize,
    ) -> Self {
        debug_assert_eq!(schema.len(), columns.len());
        let mut rows = vec![Vec::with_capacity(schema.len()); row_count];
        for values in columns {
            debug_assert_eq!(values.len(), row_count);
            for (row, value) in rows.iter_mut().zip(values) {
                row.push(value);
            }
        }
        CanonicalTable {
            columns: schema.to_vec(),
            rows,
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value at (row, column name); `None` if either is unknown.
    #[must_use]
    pub fn get(&self, row: usize, name: &str) -> Option<&CellValue> {
        let col = self.column_index(name)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Values of one column in row order.
    #[must_use]
    pub fn column_values(&self, name: &str) -> Option<Vec<&CellValue>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[col]).collect())
    }

    pub fn rows(&self) -> impl Iterator<Item = &Vec<CellValue>> {
        self.rows.iter()
    }

    /// Append the rows of another table with the identical column set.
    pub fn append(&mut self, other: CanonicalTable) -> Result<()> {
        if self.columns != other.columns {
            return Err(IngestError::ColumnMismatch {
                expected: self.columns.clone(),
                actual: other.columns,
            });
        }
        self.rows.extend(other.rows);
        Ok(())
    }

    /// Convert rows to ordered column → value records.
    #[must_use]
    pub fn to_records(&self) -> Vec<IndexMap<String, CellValue>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Option<ColumnMut<'_>> {
        let col = self.column_index(name)?;
        Some(ColumnMut {
            rows: &mut self.rows,
            col,
        })
    }
}

/// Mutable view of a single column.
pub(crate) struct ColumnMut<'a> {
    rows: &'a mut Vec<Vec<CellValue>>,
    col: usize,
}

impl ColumnMut<'_> {
    pub(crate) fn take(&mut self) -> Vec<CellValue> {
        self.rows
            .iter_mut()
            .map(|r| std::mem::take(&mut r[self.col]))
            .collect()
    }

    pub(crate) fn put(&mut self, values: Vec<CellValue>) {
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[self.col] = value;
        }
    }
}
