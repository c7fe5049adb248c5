//! Register to register moves.

use std::fmt;

use crate::{
    analysis::{MethodGraph, Node},
    disassembler::Opcode,
    emulation::{
        ops::{expect_opcode, register_operand, Op, OpSite},
        MethodState,
    },
    Result,
};

const SUPPORTED: &[Opcode] = &[
    Opcode::Move,
    Opcode::MoveFrom16,
    Opcode::Move16,
    Opcode::MoveWide,
    Opcode::MoveWideFrom16,
    Opcode::MoveWide16,
    Opcode::MoveObject,
    Opcode::MoveObjectFrom16,
    Opcode::MoveObject16,
];

/// `move`, `move-wide` and `move-object` in all register widths.
///
/// Copies the source item, known or unknown, into the destination register. Wide values
/// live in their low register, so the wide forms move a single item.
#[derive(Debug, Clone)]
pub struct MoveOp {
    site: OpSite,
    dest: u16,
    source: u16,
}

impl MoveOp {
    /// Builds the op for a move node.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::InvalidOperand`](crate::ExecutionError::InvalidOperand)
    /// for other opcodes or missing registers.
    pub fn create(graph: &MethodGraph, node: &Node) -> Result<Box<dyn Op>> {
        expect_opcode(node, SUPPORTED, "move opcode")?;
        Ok(Box::new(MoveOp {
            site: OpSite::new(graph, node),
            dest: register_operand(node, 0)?,
            source: register_operand(node, 1)?,
        }))
    }
}

impl Op for MoveOp {
    fn address(&self) -> u32 {
        self.site.address
    }

    fn opcode(&self) -> Opcode {
        self.site.opcode
    }

    fn children(&self) -> &[u32] {
        &self.site.children
    }

    fn execute(&self, state: &mut MethodState) -> Result<Vec<u32>> {
        let item = state.read_register(self.source)?;
        state.assign_register(self.dest, item.as_ref().clone())?;
        Ok(self.site.children.clone())
    }
}

impl fmt::Display for MoveOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} r{}, r{}", self.site.opcode, self.dest, self.source)
    }
}
