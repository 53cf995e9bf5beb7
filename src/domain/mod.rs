//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - long-format input rows (`LongRecord`)
//! - series entries (`Observation`)
//! - the daily reduction kinds (`Reduction`)
//! - loader column configuration (`LoaderConfig`)

pub mod types;

pub use types::*;
