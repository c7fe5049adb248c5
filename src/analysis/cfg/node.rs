//! Method graph vertices.

use crate::{
    analysis::cfg::edge::Edge,
    disassembler::{Instruction, Opcode},
    utils::graph::NodeId,
};

/// A vertex of a [`MethodGraph`](crate::analysis::MethodGraph).
///
/// Each node wraps exactly one instruction. The node id equals the location index of the
/// instruction, and the address is its code-unit offset from the start of the method.
/// Nodes are immutable once the graph has been built.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    address: u32,
    instruction: Instruction,
    edges: Vec<Edge>,
}

impl Node {
    pub(crate) fn new(id: NodeId, address: u32, instruction: Instruction, edges: Vec<Edge>) -> Self {
        Node {
            id,
            address,
            instruction,
            edges,
        }
    }

    /// The node id, equal to the location index of the instruction.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Code-unit offset of the instruction within the method.
    #[must_use]
    pub fn address(&self) -> u32 {
        self.address
    }

    /// The wrapped instruction.
    #[must_use]
    pub fn instruction(&self) -> &Instruction {
        &self.instruction
    }

    /// Shortcut for `instruction().opcode`.
    #[must_use]
    pub fn opcode(&self) -> Opcode {
        self.instruction.opcode
    }

    /// Outgoing edges in construction order.
    ///
    /// A branch edge always precedes the fallthrough edge. Switch-case edges follow the
    /// payload element order and keep duplicates unless the builder was told otherwise.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Child node ids in edge order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.edges.iter().map(Edge::target)
    }

    /// Returns `true` if this node wraps a payload data block.
    #[must_use]
    pub fn is_payload(&self) -> bool {
        self.instruction.opcode.is_payload()
    }
}
