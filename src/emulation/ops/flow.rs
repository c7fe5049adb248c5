//! Unconditional control flow.

use std::fmt;

use crate::{
    analysis::{MethodGraph, Node},
    disassembler::Opcode,
    emulation::{
        ops::{expect_opcode, Op, OpSite},
        MethodState,
    },
    Result,
};

const SUPPORTED: &[Opcode] = &[
    Opcode::Nop,
    Opcode::Goto,
    Opcode::Goto16,
    Opcode::Goto32,
    Opcode::ReturnVoid,
    Opcode::Return,
    Opcode::ReturnWide,
    Opcode::ReturnObject,
    Opcode::Throw,
];

/// `nop`, `goto*`, `return*` and `throw`.
///
/// None of these write a register. They always return their nominal children: the
/// fallthrough for `nop`, the target for `goto`, and nothing for the method exits.
#[derive(Debug, Clone)]
pub struct FlowOp {
    site: OpSite,
    registers: Vec<u16>,
}

impl FlowOp {
    /// Builds the op for a flow node.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::InvalidOperand`](crate::ExecutionError::InvalidOperand)
    /// for other opcodes.
    pub fn create(graph: &MethodGraph, node: &Node) -> Result<Box<dyn Op>> {
        expect_opcode(node, SUPPORTED, "control flow opcode")?;
        Ok(Box::new(FlowOp {
            site: OpSite::new(graph, node),
            registers: node.instruction().registers.clone(),
        }))
    }
}

impl Op for FlowOp {
    fn address(&self) -> u32 {
        self.site.address
    }

    fn opcode(&self) -> Opcode {
        self.site.opcode
    }

    fn children(&self) -> &[u32] {
        &self.site.children
    }

    fn execute(&self, _state: &mut MethodState) -> Result<Vec<u32>> {
        Ok(self.site.children.clone())
    }
}

impl fmt::Display for FlowOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.site.opcode)?;
        for (i, register) in self.registers.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            write!(f, "r{register}")?;
        }
        if self.site.opcode.is_goto() {
            if let Some(target) = self.site.children.first() {
                write!(f, " #{target}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analysis::GraphBuilder, diagnostics::NullSink, disassembler::Instruction};

    /// `0: nop | 1: goto +2 | 2: throw v0 | 3: return v1`
    fn graph() -> MethodGraph {
        GraphBuilder::new()
            .with_sink(&NullSink)
            .build(&[
                Instruction::new(Opcode::Nop, 0),
                Instruction::new(Opcode::Goto, 1).with_offset(2),
                Instruction::new(Opcode::Throw, 2).with_registers(&[0]),
                Instruction::new(Opcode::Return, 3).with_registers(&[1]),
            ])
            .unwrap()
    }

    #[test]
    fn test_nominal_children() {
        let graph = graph();
        let mut state = MethodState::new(2);
        let next: Vec<Vec<u32>> = graph
            .nodes()
            .iter()
            .map(|node| FlowOp::create(&graph, node).unwrap().execute(&mut state).unwrap())
            .collect();
        assert_eq!(next, vec![vec![1], vec![3], vec![], vec![]]);
        assert!(state.assigned_registers().is_empty());
    }

    #[test]
    fn test_display() {
        let graph = graph();
        let text: Vec<String> = graph
            .nodes()
            .iter()
            .map(|node| FlowOp::create(&graph, node).unwrap().to_string())
            .collect();
        assert_eq!(text, vec!["nop", "goto #3", "throw r0", "return r1"]);
    }

    #[test]
    fn test_rejects_other_opcodes() {
        let graph = GraphBuilder::new()
            .with_sink(&NullSink)
            .build(&[Instruction::new(Opcode::AddInt, 0).with_registers(&[0, 1, 2])])
            .unwrap();
        assert!(FlowOp::create(&graph, &graph.nodes()[0]).is_err());
    }
}
