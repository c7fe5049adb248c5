//! Graph primitives shared by the analysis layer.
//!
//! - [`NodeId`] - Strongly typed arena index
//! - [`GraphBase`], [`Successors`], [`Predecessors`], [`RootedGraph`] - Traits the traversal
//!   algorithms are generic over
//! - [`dfs`], [`postorder`], [`reverse_postorder`] - Traversal orders

mod node;
mod traits;
mod traversal;

pub use node::NodeId;
pub use traits::{GraphBase, Predecessors, RootedGraph, Successors};
pub use traversal::{dfs, postorder, reverse_postorder, DfsIterator};
