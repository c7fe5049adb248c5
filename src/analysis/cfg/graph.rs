//! The method control flow graph.

use std::{fmt::Write, sync::OnceLock};

use rustc_hash::FxHashMap;

use crate::{
    analysis::cfg::{edge::EdgeKind, node::Node},
    utils::{
        escape_dot,
        graph::{
            dfs, reverse_postorder, GraphBase, NodeId, Predecessors, RootedGraph, Successors,
        },
    },
};

/// A rooted control flow graph over the instructions of one method.
///
/// Nodes live in an arena indexed by their location index, and every edge is a
/// [`NodeId`]. The root is always the node at location `0`. Payload data blocks are part
/// of the arena so they stay addressable, but no edge ever leads to them.
///
/// The predecessor index is derived on first use and cached. A built graph is immutable
/// and can be shared between threads.
///
/// # Examples
///
/// ```rust
/// use dexscope::analysis::GraphBuilder;
/// use dexscope::disassembler::{Instruction, Opcode};
/// use dexscope::utils::graph::NodeId;
///
/// let graph = GraphBuilder::new().build(&[
///     Instruction::new(Opcode::Nop, 0),
///     Instruction::new(Opcode::ReturnVoid, 1),
/// ])?;
///
/// assert_eq!(graph.root(), NodeId::new(0));
/// assert_eq!(graph.children(graph.root()).collect::<Vec<_>>(), vec![NodeId::new(1)]);
/// assert_eq!(graph.node_at_address(1), Some(NodeId::new(1)));
/// # Ok::<(), dexscope::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MethodGraph {
    nodes: Vec<Node>,
    root: NodeId,
    address_index: FxHashMap<u32, NodeId>,
    predecessors: OnceLock<Vec<Vec<NodeId>>>,
}

impl MethodGraph {
    pub(crate) fn new(nodes: Vec<Node>, root: NodeId) -> Self {
        let address_index = nodes.iter().map(|n| (n.address(), n.id())).collect();
        MethodGraph {
            nodes,
            root,
            address_index,
            predecessors: OnceLock::new(),
        }
    }

    /// The entry node, always location `0`.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node with the given id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Number of nodes, payloads included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes ordered by location index.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Looks up the node starting at the given code-unit address.
    #[must_use]
    pub fn node_at_address(&self, address: u32) -> Option<NodeId> {
        self.address_index.get(&address).copied()
    }

    /// Child node ids of `id` in edge order, duplicates included.
    ///
    /// An unknown id has no children.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).into_iter().flat_map(|node| node.children())
    }

    /// Distinct child addresses of `id` in first-seen edge order.
    ///
    /// These are the nominal next addresses an op built for this node returns.
    #[must_use]
    pub fn child_addresses(&self, id: NodeId) -> Vec<u32> {
        let mut addresses: Vec<u32> = Vec::new();
        for child in self.children(id) {
            if let Some(node) = self.node(child) {
                if !addresses.contains(&node.address()) {
                    addresses.push(node.address());
                }
            }
        }
        addresses
    }

    /// Distinct predecessors of `id` in ascending id order.
    #[must_use]
    pub fn predecessors(&self, id: NodeId) -> &[NodeId] {
        let index = self.predecessors.get_or_init(|| {
            let mut preds: Vec<Vec<NodeId>> = vec![Vec::new(); self.nodes.len()];
            for node in &self.nodes {
                for child in node.children() {
                    let list = &mut preds[child.index()];
                    if list.last() != Some(&node.id()) {
                        list.push(node.id());
                    }
                }
            }
            preds
        });
        index.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Nodes reachable from the root in depth-first pre-order.
    ///
    /// Payload nodes are never part of the result.
    #[must_use]
    pub fn reachable(&self) -> Vec<NodeId> {
        dfs(self, self.root).collect()
    }

    /// Reachable nodes in reverse postorder, a convenient worklist seed for drivers.
    #[must_use]
    pub fn reverse_postorder(&self) -> Vec<NodeId> {
        reverse_postorder(self, self.root)
    }

    /// Intersects the static children of `id` with a set of executed next addresses.
    ///
    /// The result keeps the order of the static edges and lists each child once. Addresses
    /// without a matching child are ignored.
    ///
    /// # Arguments
    ///
    /// * `id` - The node that was executed
    /// * `addresses` - The next addresses returned by its op
    #[must_use]
    pub fn live_children(&self, id: NodeId, addresses: &[u32]) -> Vec<NodeId> {
        let mut live = Vec::new();
        for child in self.children(id) {
            let Some(node) = self.node(child) else {
                continue;
            };
            if addresses.contains(&node.address()) && !live.contains(&child) {
                live.push(child);
            }
        }
        live
    }

    /// Generates a Graphviz DOT representation of the graph.
    ///
    /// Every node is labeled with its address and instruction. Payload nodes are drawn
    /// dashed, the root is filled.
    ///
    /// # Arguments
    ///
    /// * `title` - Optional graph label, typically the method signature
    #[must_use]
    pub fn to_dot(&self, title: Option<&str>) -> String {
        let mut dot = String::new();

        dot.push_str("digraph CFG {\n");
        if let Some(name) = title {
            let _ = writeln!(dot, "    label=\"{}\";", escape_dot(name));
            dot.push_str("    labelloc=t;\n");
        }
        dot.push_str("    node [shape=box, fontname=\"Courier\", fontsize=10];\n");
        dot.push_str("    edge [fontname=\"Courier\", fontsize=9];\n\n");

        for node in &self.nodes {
            let label = format!(
                "{:04x}: {}",
                node.address(),
                escape_dot(&node.instruction().to_string())
            );
            let style = if node.id() == self.root {
                ", style=filled, fillcolor=lightgreen"
            } else if node.is_payload() {
                ", style=dashed"
            } else {
                ""
            };
            let _ = writeln!(dot, "    {} [label=\"{label}\"{style}];", node.id());
        }

        dot.push('\n');

        for node in &self.nodes {
            for edge in node.edges() {
                let (label, color) = match edge.kind() {
                    EdgeKind::Branch => (String::from("branch"), "green"),
                    EdgeKind::Fallthrough => (String::new(), "black"),
                    EdgeKind::SwitchCase { key } => (format!("case {key}"), "blue"),
                };
                let _ = writeln!(
                    dot,
                    "    {} -> {} [label=\"{label}\", color={color}];",
                    node.id(),
                    edge.target()
                );
            }
        }

        dot.push_str("}\n");
        dot
    }
}

impl GraphBase for MethodGraph {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }
}

impl Successors for MethodGraph {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.children(node)
    }
}

impl Predecessors for MethodGraph {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        MethodGraph::predecessors(self, node).iter().copied()
    }
}

impl RootedGraph for MethodGraph {
    fn entry(&self) -> NodeId {
        self.root
    }
}
