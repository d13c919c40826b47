//! Domain models for the Vitalis system.

mod history;
mod patient;

pub use history::*;
pub use patient::*;
