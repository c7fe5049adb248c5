//! Single-step driver glue.

use crate::{
    analysis::{MethodGraph, NodeId},
    emulation::{MethodState, OpTable},
    Error, Result,
};

/// Executes the op of one node and pairs every live successor with its own state.
///
/// The op runs against `state`, then its next addresses are intersected with the node's
/// static children via [`MethodGraph::live_children`]. Every successor but the last gets a
/// [`fork`](MethodState::fork) of the post-execution state, the last one takes the state
/// itself. Method exits return an empty vector.
///
/// Exploration order, visited sets and merging are left to the caller.
///
/// # Arguments
///
/// * `graph` - The method graph
/// * `ops` - Ops built for `graph`
/// * `node` - The node to execute
/// * `state` - State on entry to `node`
///
/// # Errors
///
/// Returns [`Error::Malformed`] for a node id outside the graph, [`Error::MissingOp`] if no
/// op exists at the node's address, and any error raised by [`Op::execute`](crate::emulation::Op::execute).
///
/// # Examples
///
/// ```rust
/// use dexscope::{
///     analysis::GraphBuilder,
///     disassembler::{Instruction, Opcode},
///     emulation::{step, HeapItem, MethodState, OpRegistry},
/// };
///
/// // 0: if-eqz v0, +3 | 2: nop | 3: return-void
/// let graph = GraphBuilder::new().build(&[
///     Instruction::new(Opcode::IfEqz, 0).with_registers(&[0]).with_offset(3),
///     Instruction::new(Opcode::Nop, 1),
///     Instruction::new(Opcode::ReturnVoid, 2),
/// ])?;
/// let ops = OpRegistry::new().build(&graph)?;
///
/// let mut state = MethodState::new(1);
/// state.assign_register(0, HeapItem::unknown("int"))?;
/// assert_eq!(step(&graph, &ops, graph.root(), state)?.len(), 2);
/// # Ok::<(), dexscope::Error>(())
/// ```
pub fn step(
    graph: &MethodGraph,
    ops: &OpTable,
    node: NodeId,
    mut state: MethodState,
) -> Result<Vec<(NodeId, MethodState)>> {
    let address = graph
        .node(node)
        .ok_or_else(|| malformed_error!("Node {} is not part of the graph", node))?
        .address();
    let op = ops.get(address).ok_or(Error::MissingOp(address))?;

    let next = op.execute(&mut state)?;
    let live = graph.live_children(node, &next);

    let mut successors = Vec::with_capacity(live.len());
    if let Some((&last, rest)) = live.split_last() {
        for &child in rest {
            successors.push((child, state.fork()));
        }
        successors.push((last, state));
    }
    Ok(successors)
}
