//! Input helpers.
//!
//! - long-format CSV ingest and the pivot to a wide table (`ingest`)

pub mod ingest;

pub use ingest::*;
