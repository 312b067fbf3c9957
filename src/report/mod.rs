//! Run report data structures.

pub mod report;

pub use report::{FindingsBySeverity, RunReport, RunStats};
