//! Statistics over wide tables.
//!
//! Everything here is a free function taking `&WideTable` and returning a new
//! value, so calls compose without touching their inputs.

pub mod daily;
pub mod transforms;

pub use daily::*;
pub use transforms::*;
