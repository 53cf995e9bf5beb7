//! Calendar-day aggregation of timestamp-indexed tables.
//!
//! Rows that fall on the same calendar day are collapsed into one row; each
//! column is reduced on its own. Missing cells never take part in a reduction,
//! and a day with no present cells for a column stays missing for that column.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;

use crate::domain::Reduction;
use crate::error::Result;
use crate::table::{RowIndex, WideTable};

/// Group rows by calendar day and reduce every column with `reduction`.
///
/// The output is indexed by the distinct days, ascending, and keeps the input
/// columns. Fails with `TypeMismatch` unless the row index is temporal.
pub fn daily_aggregate(table: &WideTable, reduction: Reduction) -> Result<WideTable> {
    let days = table.index().calendar_days()?;

    let mut groups: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
    for (row, day) in days.into_iter().enumerate() {
        groups.entry(day).or_default().push(row);
    }

    let cells = table.rows();
    let mut keys = Vec::with_capacity(groups.len());
    let mut rows = Vec::with_capacity(groups.len());
    for (day, members) in groups {
        let reduced: Vec<Option<f64>> = (0..table.n_columns())
            .map(|col| reduction.apply(members.iter().filter_map(|&r| cells[r][col])))
            .collect();
        keys.push(day);
        rows.push(reduced);
    }

    debug!(
        "daily {}: {} rows -> {} days",
        reduction.display_name(),
        table.n_rows(),
        keys.len()
    );
    WideTable::new(RowIndex::Dates(keys), table.columns().to_vec(), rows)
}

/// Sum of each column per calendar day.
pub fn daily_total(table: &WideTable) -> Result<WideTable> {
    daily_aggregate(table, Reduction::Sum)
}

/// Arithmetic mean of each column per calendar day.
pub fn daily_mean(table: &WideTable) -> Result<WideTable> {
    daily_aggregate(table, Reduction::Mean)
}

/// Maximum of each column per calendar day.
pub fn daily_max(table: &WideTable) -> Result<WideTable> {
    daily_aggregate(table, Reduction::Max)
}

/// Minimum of each column per calendar day.
pub fn daily_min(table: &WideTable) -> Result<WideTable> {
    daily_aggregate(table, Reduction::Min)
}
