//! Plain-text rendering of a [`WideTable`].
//!
//! Kept separate so the table type itself stays free of presentation code.
//! Output is for terminals and logs; it is not a storage format.

use std::fmt;

use super::WideTable;

const MISSING: &str = "NaN";

fn format_cell(cell: Option<f64>) -> String {
    match cell {
        Some(v) => format!("{v:.3}"),
        None => MISSING.to_string(),
    }
}

impl fmt::Display for WideTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = (0..self.n_rows()).map(|r| self.index().key_label(r)).collect();
        let cells: Vec<Vec<String>> = self
            .rows()
            .iter()
            .map(|row| row.iter().copied().map(format_cell).collect())
            .collect();

        let key_width = keys.iter().map(String::len).max().unwrap_or(0);
        let widths: Vec<usize> = self
            .columns()
            .iter()
            .enumerate()
            .map(|(c, label)| {
                cells
                    .iter()
                    .map(|row| row[c].len())
                    .chain(std::iter::once(label.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:key_width$}", "")?;
        for (label, width) in self.columns().iter().zip(widths.iter().copied()) {
            write!(f, "  {label:>width$}")?;
        }
        writeln!(f)?;

        for (key, row) in keys.iter().zip(&cells) {
            write!(f, "{key:<key_width$}")?;
            for (cell, width) in row.iter().zip(widths.iter().copied()) {
                write!(f, "  {cell:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
