//! The wide, date-indexed measurement table.
//!
//! A [`WideTable`] is one row per index key and one column per site. Cells are
//! `Option<f64>`: `None` is a missing reading, which is different from zero.
//!
//! Tables are values. Loading builds one, and every statistic in
//! [`crate::stats`] returns a new table rather than editing its input.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{CatchmentError, Result};

pub mod format;

/// Row labels of a [`WideTable`].
///
/// Only `Timestamps` and `Dates` can be grouped by calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "keys", rename_all = "lowercase")]
pub enum RowIndex {
    Timestamps(Vec<NaiveDateTime>),
    Dates(Vec<NaiveDate>),
    Labels(Vec<String>),
    /// Unlabeled rows `0..n`.
    Range(usize),
}

impl RowIndex {
    pub fn len(&self) -> usize {
        match self {
            RowIndex::Timestamps(keys) => keys.len(),
            RowIndex::Dates(keys) => keys.len(),
            RowIndex::Labels(keys) => keys.len(),
            RowIndex::Range(n) => *n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, RowIndex::Timestamps(_) | RowIndex::Dates(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            RowIndex::Timestamps(_) => "timestamp index",
            RowIndex::Dates(_) => "date index",
            RowIndex::Labels(_) => "label index",
            RowIndex::Range(_) => "unlabeled rows",
        }
    }

    /// The calendar day of every row, in row order.
    pub fn calendar_days(&self) -> Result<Vec<NaiveDate>> {
        match self {
            RowIndex::Timestamps(keys) => Ok(keys.iter().map(NaiveDateTime::date).collect()),
            RowIndex::Dates(keys) => Ok(keys.clone()),
            RowIndex::Labels(_) | RowIndex::Range(_) => Err(CatchmentError::TypeMismatch {
                found: self.kind_name(),
            }),
        }
    }

    /// Text form of the key at `row`, used when rendering.
    pub fn key_label(&self, row: usize) -> String {
        match self {
            RowIndex::Timestamps(keys) => keys
                .get(row)
                .map(|k| k.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            RowIndex::Dates(keys) => keys.get(row).map(|k| k.to_string()).unwrap_or_default(),
            RowIndex::Labels(keys) => keys.get(row).cloned().unwrap_or_default(),
            RowIndex::Range(_) => row.to_string(),
        }
    }
}

/// A 2-D table of optional readings keyed by row index and column label.
///
/// Invariants, checked by [`WideTable::new`]:
/// - column labels are unique
/// - there is one row of cells per index key
/// - every row has one cell per column
///
/// A `NaN` cell is stored as `None`, the same as a blank in a loaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableParts", into = "TableParts")]
pub struct WideTable {
    index: RowIndex,
    columns: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

#[derive(Serialize, Deserialize)]
struct TableParts {
    index: RowIndex,
    columns: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

impl TryFrom<TableParts> for WideTable {
    type Error = CatchmentError;

    fn try_from(parts: TableParts) -> Result<Self> {
        WideTable::new(parts.index, parts.columns, parts.rows)
    }
}

impl From<WideTable> for TableParts {
    fn from(table: WideTable) -> Self {
        TableParts {
            index: table.index,
            columns: table.columns,
            rows: table.rows,
        }
    }
}

impl WideTable {
    pub fn new(index: RowIndex, columns: Vec<String>, mut rows: Vec<Vec<Option<f64>>>) -> Result<Self> {
        if rows.len() != index.len() {
            return Err(CatchmentError::Shape(format!(
                "{} rows of cells for {} index keys",
                rows.len(),
                index.len()
            )));
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for label in &columns {
            if !seen.insert(label.as_str()) {
                return Err(CatchmentError::Shape(format!("duplicate column `{label}`")));
            }
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(CatchmentError::Shape(format!(
                "row {i} has {} cells but there are {} columns",
                row.len(),
                columns.len()
            )));
        }
        for cell in rows.iter_mut().flatten() {
            if cell.is_some_and(f64::is_nan) {
                *cell = None;
            }
        }
        Ok(Self { index, columns, rows })
    }

    /// A table with every cell given; `NaN` values become missing cells.
    pub fn from_values(index: RowIndex, columns: Vec<String>, values: Vec<Vec<f64>>) -> Result<Self> {
        let rows = values
            .into_iter()
            .map(|row| row.into_iter().map(Some).collect())
            .collect();
        Self::new(index, columns, rows)
    }

    /// An unlabeled table: rows `0..n`, columns `"0".."m"`.
    pub fn from_rows(values: Vec<Vec<f64>>) -> Result<Self> {
        let width = values.first().map_or(0, Vec::len);
        let columns = (0..width).map(|c| c.to_string()).collect();
        Self::from_values(RowIndex::Range(values.len()), columns, values)
    }

    pub fn index(&self) -> &RowIndex {
        &self.index
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn column_position(&self, label: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == label)
            .ok_or_else(|| CatchmentError::KeyNotFound(label.to_string()))
    }

    /// All cells of one column, in row order.
    pub fn column(&self, label: &str) -> Result<Vec<Option<f64>>> {
        let idx = self.column_position(label)?;
        Ok(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// The cell at `row` in column `label`; `Ok(None)` when missing.
    pub fn get(&self, row: usize, label: &str) -> Result<Option<f64>> {
        let idx = self.column_position(label)?;
        Ok(self.rows.get(row).and_then(|r| r[idx]))
    }

    /// Build from parts the caller already knows to be consistent.
    pub(crate) fn assemble(index: RowIndex, columns: Vec<String>, rows: Vec<Vec<Option<f64>>>) -> Self {
        debug_assert_eq!(rows.len(), index.len());
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { index, columns, rows }
    }

    /// Same labels, new cells. Callers guarantee the shape matches.
    pub(crate) fn with_rows(&self, rows: Vec<Vec<Option<f64>>>) -> Self {
        debug_assert_eq!(rows.len(), self.rows.len());
        Self {
            index: self.index.clone(),
            columns: self.columns.clone(),
            rows,
        }
    }
}
