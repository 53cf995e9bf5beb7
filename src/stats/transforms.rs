//! Whole-column transforms: max-normalisation and threshold counts.

use log::warn;

use crate::error::Result;
use crate::table::WideTable;

/// Divide every cell by its column's maximum.
///
/// Missing cells are ignored when finding the maximum and stay missing. A
/// column whose maximum is zero is not rejected: the division propagates
/// non-finite values (`0/0` is NaN, `x/0` is ±inf) and it is up to the caller
/// to guard against that. Labels, including an unlabeled index, are kept.
pub fn normalise(table: &WideTable) -> WideTable {
    let maxima: Vec<Option<f64>> = (0..table.n_columns())
        .map(|col| {
            table
                .rows()
                .iter()
                .filter_map(|row| row[col])
                .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
        })
        .collect();

    for (label, max) in table.columns().iter().zip(&maxima) {
        if *max == Some(0.0) {
            warn!("column {label} has a maximum of zero; normalised values will be non-finite");
        }
    }

    let rows: Vec<Vec<Option<f64>>> = table
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .zip(&maxima)
                .map(|(cell, max)| Some(cell.as_ref()? / max.as_ref()?))
                .collect()
        })
        .collect();
    table.with_rows(rows)
}

/// Number of present values in `column_id` strictly greater than `threshold`.
///
/// Fails with `KeyNotFound` if the column does not exist.
pub fn count_above_threshold(column_id: &str, table: &WideTable, threshold: f64) -> Result<usize> {
    let cells = table.column(column_id)?;
    Ok(cells.into_iter().flatten().filter(|&v| v > threshold).count())
}
