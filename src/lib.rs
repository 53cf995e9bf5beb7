//! `catchment` library crate.
//!
//! Per-site environmental measurements (rainfall, river level, pH, ...) arrive
//! as long-format `(date, site, value)` rows. This crate:
//!
//! - reshapes them into a date-indexed table with one column per site (`io`)
//! - computes daily totals/means/maxima/minima, normalisation and threshold
//!   counts over such tables (`stats`)
//! - models sites that own named, unit-tagged measurement series (`models`)
//!
//! ```
//! use catchment::{LoaderConfig, daily_total, load_wide_table};
//!
//! let csv = "Date,Site,Rainfall (mm)\n01/02/2000,FP35,1.5\n01/02/2000,FP56,0.0\n";
//! let table = load_wide_table(csv.as_bytes(), &LoaderConfig::default())?;
//! let totals = daily_total(&table)?;
//! assert_eq!(totals.get(0, "FP35")?, Some(1.5));
//! # Ok::<(), catchment::CatchmentError>(())
//! ```

pub mod domain;
pub mod error;
pub mod io;
pub mod models;
pub mod stats;
pub mod table;

pub use domain::{LoaderConfig, LongRecord, Observation, Reduction};
pub use error::{CatchmentError, Result};
pub use io::{load_wide_table, load_wide_table_from_path, pivot_long_records, read_long_records};
pub use models::{
    Location, MeasurementSeries, Named, SITE_MODEL_VERSION, Site, create_sample_site, site_version,
};
pub use stats::{
    count_above_threshold, daily_aggregate, daily_max, daily_mean, daily_min, daily_total, normalise,
};
pub use table::{RowIndex, WideTable};
