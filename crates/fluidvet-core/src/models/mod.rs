//! Domain models for the fluidvet system.

mod patient;
mod plan;
mod reeval;

pub use patient::*;
pub use plan::*;
pub use reeval::*;
