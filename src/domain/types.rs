//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built by the loader from long-format CSV rows
//! - handed to the site/series models
//! - passed on to downstream reporting as JSON

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{CatchmentError, Result};

/// One long-format input row: a single site's reading at a single time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord {
    pub timestamp: NaiveDateTime,
    pub site: String,
    /// `None` when the value cell was blank.
    pub value: Option<f64>,
}

/// A single `(timestamp, value)` pair in a measurement series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl Observation {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// An observation recorded against a whole day (placed at midnight).
    pub fn on_date(date: NaiveDate, value: f64) -> Self {
        Self::new(date.and_time(NaiveTime::MIN), value)
    }
}

/// How a group of same-day cells is collapsed into one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    Sum,
    Mean,
    Max,
    Min,
}

impl Reduction {
    pub fn display_name(self) -> &'static str {
        match self {
            Reduction::Sum => "total",
            Reduction::Mean => "mean",
            Reduction::Max => "max",
            Reduction::Min => "min",
        }
    }

    /// Reduce the present values of one group; `None` if none are present.
    pub fn apply(self, values: impl IntoIterator<Item = f64>) -> Option<f64> {
        let mut count = 0usize;
        let mut acc = 0.0_f64;
        for v in values {
            acc = match (count, self) {
                (0, _) => v,
                (_, Reduction::Sum | Reduction::Mean) => acc + v,
                (_, Reduction::Max) => acc.max(v),
                (_, Reduction::Min) => acc.min(v),
            };
            count += 1;
        }
        match (count, self) {
            (0, _) => None,
            (n, Reduction::Mean) => Some(acc / n as f64),
            _ => Some(acc),
        }
    }
}

pub const DEFAULT_DATE_COLUMN: &str = "Date";
pub const DEFAULT_SITE_COLUMN: &str = "Site";
pub const DEFAULT_VALUE_COLUMN: &str = "Rainfall (mm)";

const ENV_DATE_COLUMN: &str = "CATCHMENT_DATE_COLUMN";
const ENV_SITE_COLUMN: &str = "CATCHMENT_SITE_COLUMN";
const ENV_VALUE_COLUMN: &str = "CATCHMENT_VALUE_COLUMN";

/// Which long-format columns hold the date, the site identifier and the value.
///
/// Only the value column usually varies between files (`Rainfall (mm)`,
/// `River Level (m)`, ...); the other two rarely need overriding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub date_column: String,
    pub site_column: String,
    pub value_column: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            site_column: DEFAULT_SITE_COLUMN.to_string(),
            value_column: DEFAULT_VALUE_COLUMN.to_string(),
        }
    }
}

impl LoaderConfig {
    /// Config for a file whose value column is `value_column`.
    pub fn for_value_column(value_column: impl Into<String>) -> Self {
        Self {
            value_column: value_column.into(),
            ..Self::default()
        }
    }

    /// Defaults, overridden by `CATCHMENT_*_COLUMN` variables (a `.env` file is
    /// read first if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let overrides = [
            (ENV_DATE_COLUMN, &mut config.date_column),
            (ENV_SITE_COLUMN, &mut config.site_column),
            (ENV_VALUE_COLUMN, &mut config.value_column),
        ];
        for (key, slot) in overrides {
            let Some(value) = lookup(key) else { continue };
            let value = value.trim();
            if value.is_empty() {
                return Err(CatchmentError::Config(format!("{key} is set but empty")));
            }
            *slot = value.to_string();
        }
        Ok(config)
    }
}
