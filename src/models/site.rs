//! Named locations and the measurement sites built on them.
//!
//! A [`Site`] owns one [`MeasurementSeries`] per measurement name. Series are
//! created on first use and appended to afterwards.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::Observation;
use crate::error::{CatchmentError, Result};
use crate::models::series::MeasurementSeries;
use crate::table::{RowIndex, WideTable};

/// Version of the site/series model.
pub const SITE_MODEL_VERSION: &str = "0.1";

/// `"version <SITE_MODEL_VERSION>"`.
pub fn site_version() -> String {
    format!("version {SITE_MODEL_VERSION}")
}

/// A site named `"sample"` with no measurements.
pub fn create_sample_site() -> Site {
    Site::new("sample")
}

/// Anything identified by a name.
pub trait Named {
    fn name(&self) -> &str;
}

/// A bare named place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    name: String,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Named for Location {
    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A location with measurement series keyed by measurement name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    location: Location,
    measurements: BTreeMap<String, MeasurementSeries>,
}

impl Site {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            location: Location::new(name),
            measurements: BTreeMap::new(),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn measurements(&self) -> &BTreeMap<String, MeasurementSeries> {
        &self.measurements
    }

    pub fn measurement(&self, measurement_id: &str) -> Result<&MeasurementSeries> {
        self.measurements
            .get(measurement_id)
            .ok_or_else(|| CatchmentError::KeyNotFound(measurement_id.to_string()))
    }

    /// Record `data` under `measurement_id`.
    ///
    /// An existing series is appended to and keeps its original units; `units`
    /// only applies when the series is created here.
    pub fn add_measurement(&mut self, measurement_id: &str, data: Vec<Observation>, units: Option<&str>) {
        match self.measurements.get_mut(measurement_id) {
            Some(series) => series.add_measurement(data),
            None => {
                let series = MeasurementSeries::new(data, measurement_id, units.map(str::to_string));
                self.measurements.insert(measurement_id.to_string(), series);
            }
        }
    }

    /// The last entry of every series, side by side.
    ///
    /// Rows are the distinct timestamps of those entries, ascending; columns are
    /// the measurement names. "Last" means last appended, which is only the most
    /// recent reading if every append was in chronological order. An empty series
    /// still gets a column, with no values in it.
    pub fn last_measurements(&self) -> WideTable {
        let columns: Vec<String> = self.measurements.keys().cloned().collect();
        let width = columns.len();

        let mut by_time: BTreeMap<NaiveDateTime, Vec<Option<f64>>> = BTreeMap::new();
        for (col, series) in self.measurements.values().enumerate() {
            if let Some(last) = series.last() {
                by_time.entry(last.timestamp).or_insert_with(|| vec![None; width])[col] = Some(last.value);
            }
        }

        let (keys, rows): (Vec<_>, Vec<_>) = by_time.into_iter().unzip();
        WideTable::assemble(RowIndex::Timestamps(keys), columns, rows)
    }
}

impl Named for Site {
    fn name(&self) -> &str {
        self.location.name()
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.location, f)
    }
}
