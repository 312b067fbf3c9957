//! Source Location Resolver
//!
//! Maps a node's compact `"start:length:fileIndex"` source descriptor back to
//! a file path, a human-readable `"Line L Columns C1-C2"` string, and the
//! literal source snippet.
//!
//! Resolution is used inside rule bodies, so it never panics and never
//! returns an error type: every failure mode yields a sentinel string in the
//! file slot and `None` for the line/snippet payloads. Each call reads the
//! referenced file from disk; call volume is bounded by the number of
//! findings, not the tree size, so no cache is kept.

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Sentinel path for a file index outside the source file list.
pub const UNKNOWN_FILE: &str = "Unknown file";

/// Sentinel for an offset that no line of the file contains.
pub const LOCATION_NOT_FOUND: &str = "Location not found in file";

/// Resolves source descriptors against a project root.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    /// Directory against which project-relative source paths resolve.
    project_root: PathBuf,
    /// Report absolute paths instead of the original relative strings.
    absolute_paths: bool,
}

/// A resolved source location.
///
/// `lines` and `snippet` are `None` exactly when `file` holds a sentinel or
/// error message instead of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub file: String,
    pub lines: Option<String>,
    pub snippet: Option<String>,
    pub span: Option<LineSpan>,
}

/// Numeric line/column coordinates, 1-based, end column inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineSpan {
    pub line: usize,
    pub start_column: usize,
    pub end_column: usize,
}

impl ResolvedLocation {
    fn failed(message: String) -> Self {
        Self { file: message, lines: None, snippet: None, span: None }
    }

    /// Whether resolution produced a precise location.
    pub fn is_resolved(&self) -> bool {
        self.lines.is_some()
    }
}

impl LocationResolver {
    pub fn new(project_root: impl Into<PathBuf>, absolute_paths: bool) -> Self {
        Self { project_root: project_root.into(), absolute_paths }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Resolve a node's `src` descriptor against the source file list.
    ///
    /// The file list must be the one extracted by tree reduction: its order
    /// defines the `fileIndex` space the descriptor refers to.
    pub fn resolve(&self, node: &Value, source_files: &[String]) -> ResolvedLocation {
        let src = match node.get("src").and_then(Value::as_str) {
            Some(src) => src,
            None => return ResolvedLocation::failed("Missing source location".to_string()),
        };
        let (start, length, file_index) = match parse_descriptor(src) {
            Some(parts) => parts,
            None => {
                return ResolvedLocation::failed(format!("Invalid source location '{}'", src));
            }
        };

        // An out-of-range index is substituted, not rejected; the file read
        // below then fails cleanly.
        let relative = source_files
            .get(file_index)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_FILE);
        let full_path = self.project_root.join(relative);
        let reported = if self.absolute_paths {
            full_path.display().to_string()
        } else {
            relative.to_string()
        };

        let content = match fs::read_to_string(&full_path) {
            Ok(content) => content,
            Err(err) => {
                return ResolvedLocation::failed(format!(
                    "Could not read file '{}': {}",
                    reported, err
                ));
            }
        };

        // The descriptor is untrusted input; the addition itself can overflow.
        let end = match start.checked_add(length) {
            Some(end) if end <= content.len() => end,
            _ => {
                return ResolvedLocation::failed(format!(
                    "Location '{}' is beyond the end of file '{}'",
                    src, reported
                ));
            }
        };
        let snippet = match content.get(start..end) {
            Some(snippet) => snippet.to_string(),
            None => {
                return ResolvedLocation::failed(format!(
                    "Location '{}' is not a valid span in file '{}'",
                    src, reported
                ));
            }
        };

        match locate_line(&content, start, length) {
            Some(span) => ResolvedLocation {
                file: reported,
                lines: Some(format!(
                    "Line {} Columns {}-{}",
                    span.line, span.start_column, span.end_column
                )),
                snippet: Some(snippet),
                span: Some(span),
            },
            None => ResolvedLocation::failed(LOCATION_NOT_FOUND.to_string()),
        }
    }
}

/// Parse `"start:length:fileIndex"` into its three integers.
fn parse_descriptor(src: &str) -> Option<(usize, usize, usize)> {
    let mut parts = src.split(':');
    let start = parts.next()?.parse().ok()?;
    let length = parts.next()?.parse().ok()?;
    let file_index = parts.next()?.parse().ok()?;
    Some((start, length, file_index))
}

/// Find the 1-based line containing `start` and compute the column range.
///
/// The running offset accounts for the newline stripped by `split('\n')`.
/// The end column is clamped to one past the line end so multi-line spans
/// still highlight sensibly on their first line.
fn locate_line(content: &str, start: usize, length: usize) -> Option<LineSpan> {
    let mut line_offset = 0usize;
    for (index, line) in content.split('\n').enumerate() {
        let line_end = line_offset + line.len();
        if start >= line_offset && start < line_end {
            let start_column = start - line_offset + 1;
            let end_column = (start_column + length).min(line.len() + 1);
            return Some(LineSpan { line: index + 1, start_column, end_column });
        }
        line_offset = line_end + 1;
    }
    None
}
