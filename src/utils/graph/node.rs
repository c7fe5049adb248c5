//! Node identifier for arena-backed graphs.
//!
//! This module provides the [`NodeId`] type, a strongly-typed index into the node arena of
//! a [`MethodGraph`](crate::analysis::MethodGraph). For method graphs the index equals the
//! location index of the wrapped instruction.

use std::fmt;

/// A strongly-typed identifier for nodes within a graph arena.
///
/// `NodeId` wraps a `usize` index, providing type safety to prevent accidental mixing of
/// node indices with code-unit addresses or register numbers. Edges are stored as lists
/// of `NodeId`, never as references, so a graph can be shared freely between threads.
///
/// # Examples
///
/// ```rust
/// use dexscope::utils::graph::NodeId;
/// use std::collections::HashMap;
///
/// let root = NodeId::new(0);
/// let next = NodeId::new(1);
/// assert_ne!(root, next);
///
/// let mut data: HashMap<NodeId, i32> = HashMap::new();
/// data.insert(root, 42);
/// assert_eq!(data[&root], 42);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Creates a new `NodeId` from a raw index value.
    ///
    /// # Arguments
    ///
    /// * `index` - The raw node index (0-based)
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Returns the raw index value of this node identifier.
    ///
    /// The index can be used to address per-node side tables stored in vectors.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(index: usize) -> Self {
        NodeId(index)
    }
}

impl From<NodeId> for usize {
    #[inline]
    fn from(node: NodeId) -> Self {
        node.0
    }
}
