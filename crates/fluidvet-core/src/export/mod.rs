//! Export functionality for plans and reevaluation histories.

mod csv;
mod report;

pub use csv::*;
pub use report::*;
