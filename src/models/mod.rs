//! Site and measurement-series models.
//!
//! These sit beside the table pipeline rather than on top of it: a site keeps
//! its own series, and only its latest-values snapshot comes back as a table.

pub mod series;
pub mod site;

pub use series::*;
pub use site::*;
