//! AST handling: querying, source locations, and reduction.
//!
//! The solc JSON AST is kept as a raw `serde_json::Value`; this module
//! provides the structural queries rules are built from, the resolver that
//! maps `"start:length:fileIndex"` descriptors back to source text, and the
//! reduction step that normalizes raw compiler output.

pub mod location;
pub mod query;
pub mod reduce;

pub use location::{LineSpan, LocationResolver, ResolvedLocation, LOCATION_NOT_FOUND, UNKNOWN_FILE};
pub use query::{
    find_nearest_ancestor_of_type, find_nodes_by_signature, find_nodes_by_type,
    find_nodes_by_type_filtered, node_id, node_type, src_offset, type_string,
};
pub use reduce::reduce;
