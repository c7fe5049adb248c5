//! Utility functionality shared across the crate.
//!
//! - [`graph`] - Node identifiers, graph traits and traversal algorithms
//! - [`escape_dot`] - Escaping for Graphviz DOT output

mod dot;
pub mod graph;

pub use dot::escape_dot;
