//! A named, unit-tagged, append-only time series.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Observation;

/// One measurement (e.g. `Rainfall`) recorded at one site.
///
/// Entries are kept in append order. Appending never sorts or deduplicates, so
/// the series is only chronological if callers append chronologically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSeries {
    name: String,
    units: Option<String>,
    data: Vec<Observation>,
}

impl MeasurementSeries {
    pub fn new(data: Vec<Observation>, name: impl Into<String>, units: Option<String>) -> Self {
        Self {
            name: name.into(),
            units,
            data,
        }
    }

    /// Append `data` after the existing entries.
    ///
    /// Overlapping timestamps are kept as separate entries; the later append
    /// comes later in storage order.
    pub fn add_measurement(&mut self, data: impl IntoIterator<Item = Observation>) {
        self.data.extend(data);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    pub fn data(&self) -> &[Observation] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The last entry in storage order.
    pub fn last(&self) -> Option<&Observation> {
        self.data.last()
    }
}

impl fmt::Display for MeasurementSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.units {
            Some(units) => write!(f, "{} ({units})", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
