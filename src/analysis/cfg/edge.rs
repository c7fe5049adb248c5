//! Control flow edge types for method graphs.

use crate::utils::graph::NodeId;

/// The kind of control flow represented by an edge.
///
/// # Examples
///
/// ```rust
/// use dexscope::analysis::EdgeKind;
///
/// assert!(EdgeKind::SwitchCase { key: 3 }.is_switch_case());
/// assert!(!EdgeKind::Fallthrough.is_switch_case());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// A resolved relative branch (`goto*`, `if-*`).
    Branch,

    /// Sequential flow into the next instruction.
    Fallthrough,

    /// One case of a packed or sparse switch.
    SwitchCase {
        /// The case key selecting this edge.
        key: i32,
    },
}

impl EdgeKind {
    /// Returns `true` for [`SwitchCase`](Self::SwitchCase) edges.
    #[must_use]
    pub const fn is_switch_case(&self) -> bool {
        matches!(self, Self::SwitchCase { .. })
    }

    /// Returns `true` for [`Fallthrough`](Self::Fallthrough) edges.
    #[must_use]
    pub const fn is_fallthrough(&self) -> bool {
        matches!(self, Self::Fallthrough)
    }
}

/// An outgoing edge of a [`Node`](crate::analysis::Node).
///
/// # Examples
///
/// ```rust
/// use dexscope::analysis::{Edge, EdgeKind};
/// use dexscope::utils::graph::NodeId;
///
/// let edge = Edge::new(NodeId::new(1), EdgeKind::Fallthrough);
/// assert_eq!(edge.target(), NodeId::new(1));
/// assert_eq!(edge.kind(), EdgeKind::Fallthrough);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    target: NodeId,
    kind: EdgeKind,
}

impl Edge {
    /// Creates a new edge.
    ///
    /// # Arguments
    ///
    /// * `target` - The node this edge leads to
    /// * `kind` - The kind of control flow
    #[must_use]
    pub const fn new(target: NodeId, kind: EdgeKind) -> Self {
        Self { target, kind }
    }

    /// Returns the target node of this edge.
    #[must_use]
    pub const fn target(&self) -> NodeId {
        self.target
    }

    /// Returns the kind of control flow this edge represents.
    #[must_use]
    pub const fn kind(&self) -> EdgeKind {
        self.kind
    }
}
