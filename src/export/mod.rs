//! Export formatters.
//!
//! This module provides various output formats for analysis results.

pub mod formatter;
pub mod json;
pub mod markdown;
pub mod sarif;
pub mod text;

pub use formatter::*;
pub use json::*;
pub use markdown::*;
pub use sarif::*;
pub use text::*;
