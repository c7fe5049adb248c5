//! Opcode execution integration tests.
//!
//! These tests build a graph, build its ops through the registry and drive them with
//! `step`, the way an exploration driver would:
//! 1. Seed a `MethodState` with known and unknown values
//! 2. Walk the graph with a simple worklist
//! 3. Verify the register contents on every path

use std::collections::VecDeque;

use dexscope::{
    analysis::{GraphBuilder, MethodGraph, NodeId},
    disassembler::{Instruction, Opcode},
    emulation::{step, types, HeapItem, MethodState, Op, OpRegistry, OpTable, Value},
    Error, ExecutionError, Result,
};

/// Runs every path from the root and collects the states that reach a method exit.
fn explore(graph: &MethodGraph, ops: &OpTable, entry: MethodState) -> Result<Vec<MethodState>> {
    let mut exits = Vec::new();
    let mut worklist = VecDeque::from([(graph.root(), entry)]);

    while let Some((node, state)) = worklist.pop_front() {
        let is_exit = graph.children(node).next().is_none();
        let exit_state = is_exit.then(|| state.fork());
        let successors = step(graph, ops, node, state)?;
        if let Some(state) = exit_state {
            exits.push(state);
        }
        worklist.extend(successors);
    }
    Ok(exits)
}

/// `return (a < b) ? 1 : 0` on floats:
///
/// ```text
/// 0000: cmpl-float v0, v1, v2
/// 0002: if-gez v0, +5
/// 0004: const/4 v3, 1
/// 0005: return v3
/// 0006: nop
/// 0007: const/4 v3, 0
/// 0008: goto -3
/// ```
fn float_less_than() -> Result<(MethodGraph, OpTable)> {
    let graph = GraphBuilder::new().build(&[
        Instruction::new(Opcode::CmplFloat, 0).with_registers(&[0, 1, 2]),
        Instruction::new(Opcode::IfGez, 1)
            .with_registers(&[0])
            .with_offset(5),
        Instruction::new(Opcode::Const4, 2)
            .with_registers(&[3])
            .with_literal(1),
        Instruction::new(Opcode::Return, 3).with_registers(&[3]),
        Instruction::new(Opcode::Nop, 4),
        Instruction::new(Opcode::Const4, 5)
            .with_registers(&[3])
            .with_literal(0),
        Instruction::new(Opcode::Goto, 6).with_offset(-3),
    ])?;
    let ops = OpRegistry::new().build(&graph)?;
    Ok((graph, ops))
}

fn entry(lhs: HeapItem, rhs: HeapItem) -> Result<MethodState> {
    let mut state = MethodState::new(4);
    state.assign_register(1, lhs)?;
    state.assign_register(2, rhs)?;
    Ok(state)
}

fn results(exits: &[MethodState]) -> Result<Vec<HeapItem>> {
    exits
        .iter()
        .map(|state| Ok(state.read_register(3)?.as_ref().clone()))
        .collect()
}

#[test]
fn test_known_operands_take_one_path() -> Result<()> {
    let (graph, ops) = float_less_than()?;

    let exits = explore(&graph, &ops, entry(HeapItem::float(1.5), HeapItem::float(2.0))?)?;
    assert_eq!(results(&exits)?, vec![HeapItem::int(1)]);

    let exits = explore(&graph, &ops, entry(HeapItem::float(3.0), HeapItem::float(2.0))?)?;
    assert_eq!(results(&exits)?, vec![HeapItem::int(0)]);
    Ok(())
}

#[test]
fn test_nan_is_not_less_than() -> Result<()> {
    let (graph, ops) = float_less_than()?;
    let exits = explore(
        &graph,
        &ops,
        entry(HeapItem::float(f32::NAN), HeapItem::float(2.0))?,
    )?;
    // cmpl yields -1 for NaN, so the "less" path is taken
    assert_eq!(results(&exits)?, vec![HeapItem::int(1)]);
    Ok(())
}

#[test]
fn test_unknown_operand_explores_both_paths() -> Result<()> {
    let (graph, ops) = float_less_than()?;
    let exits = explore(
        &graph,
        &ops,
        entry(HeapItem::unknown(types::FLOAT), HeapItem::float(2.0))?,
    )?;

    let mut values: Vec<i32> = results(&exits)?
        .iter()
        .filter_map(|item| match item.value() {
            Some(Value::Int(v)) => Some(*v),
            _ => None,
        })
        .collect();
    values.sort_unstable();
    assert_eq!(values, vec![0, 1]);

    for state in &exits {
        let flag = state.read_register(0)?;
        assert!(flag.is_unknown());
        assert_eq!(flag.type_name(), types::INT);
    }
    Ok(())
}

#[test]
fn test_mismatched_operands_abort() -> Result<()> {
    let (graph, ops) = float_less_than()?;
    let result = explore(
        &graph,
        &ops,
        entry(HeapItem::float(1.0), HeapItem::double(1.0))?,
    );
    assert!(matches!(
        result,
        Err(Error::Execution(ExecutionError::InvariantViolation {
            operation: "cmpl-float",
            ..
        }))
    ));
    Ok(())
}

#[test]
fn test_switch_with_moved_selector() -> Result<()> {
    // 0000: const/16 v1, 20
    // 0002: move v0, v1
    // 0003: packed-switch v0, +5
    // 0006: return-void
    // 0007: return-void
    // 0008: packed-switch-payload  20 -> 7
    let graph = GraphBuilder::new().build(&[
        Instruction::new(Opcode::Const16, 0)
            .with_registers(&[1])
            .with_literal(20),
        Instruction::new(Opcode::Move, 1).with_registers(&[0, 1]),
        Instruction::new(Opcode::PackedSwitch, 2)
            .with_registers(&[0])
            .with_offset(5),
        Instruction::new(Opcode::ReturnVoid, 3),
        Instruction::new(Opcode::ReturnVoid, 4),
        Instruction::packed_switch_payload(5, 20, &[4]),
    ])?;
    let ops = OpRegistry::new().build(&graph)?;

    let mut node = graph.root();
    let mut state = MethodState::new(2);
    for _ in 0..3 {
        let mut successors = step(&graph, &ops, node, state)?;
        assert_eq!(successors.len(), 1);
        (node, state) = successors.remove(0);
    }
    assert_eq!(node, NodeId::new(4));
    assert_eq!(*state.read_register(0)?, HeapItem::int(20));
    Ok(())
}

#[test]
fn test_unsupported_family() -> Result<()> {
    let graph = GraphBuilder::new().build(&[
        Instruction::new(Opcode::AddInt, 0).with_registers(&[0, 1, 2]),
        Instruction::new(Opcode::Return, 1).with_registers(&[0]),
    ])?;
    assert!(matches!(
        OpRegistry::new().build(&graph),
        Err(Error::UnsupportedOpcode("add-int"))
    ));
    Ok(())
}

#[test]
fn test_op_metadata() -> Result<()> {
    let (graph, ops) = float_less_than()?;

    let addresses: Vec<u32> = ops.iter().map(|op| op.address()).collect();
    assert_eq!(addresses, vec![0, 2, 4, 5, 6, 7, 8]);

    let branch: &dyn Op = ops.get(2).expect("if-gez op");
    assert_eq!(branch.name(), "if-gez");
    assert_eq!(branch.children(), &[7, 4]);
    assert_eq!(branch.to_string(), "if-gez r0, #7");
    assert_eq!(ops.get(8).map(|op| op.children().to_vec()), Some(vec![5]));
    assert_eq!(graph.node_count(), ops.len());
    Ok(())
}
