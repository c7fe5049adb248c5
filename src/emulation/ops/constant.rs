//! Numeric literals.

use std::fmt;

use crate::{
    analysis::{MethodGraph, Node},
    disassembler::Opcode,
    emulation::{
        ops::{expect_opcode, register_operand, Op, OpSite},
        HeapItem, MethodState,
    },
    ExecutionError, Result,
};

const NARROW: &[Opcode] = &[
    Opcode::Const4,
    Opcode::Const16,
    Opcode::Const,
    Opcode::ConstHigh16,
];

const WIDE: &[Opcode] = &[
    Opcode::ConstWide16,
    Opcode::ConstWide32,
    Opcode::ConstWide,
    Opcode::ConstWideHigh16,
];

/// `const/4`, `const/16`, `const`, `const/high16` and the `const-wide` forms.
///
/// The literal is taken as decoded, already sign-extended and shifted for the `high16`
/// forms. Narrow forms produce a known `int`, wide forms a known `long`.
#[derive(Debug, Clone)]
pub struct ConstOp {
    site: OpSite,
    dest: u16,
    item: HeapItem,
}

impl ConstOp {
    /// Builds the op for a numeric `const*` node.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::InvalidOperand`] for other opcodes, a missing destination
    /// register or a missing literal.
    pub fn create(graph: &MethodGraph, node: &Node) -> Result<Box<dyn Op>> {
        let opcode = node.opcode();
        if !WIDE.contains(&opcode) {
            expect_opcode(node, NARROW, "numeric constant")?;
        }

        let literal = node
            .instruction()
            .literal()
            .ok_or(ExecutionError::InvalidOperand {
                instruction: opcode.name(),
                expected: "literal",
            })?;

        // Narrow literals keep their low 32 bits like the VM does.
        #[allow(clippy::cast_possible_truncation)]
        let item = if WIDE.contains(&opcode) {
            HeapItem::long(literal)
        } else {
            HeapItem::int(literal as i32)
        };

        Ok(Box::new(ConstOp {
            site: OpSite::new(graph, node),
            dest: register_operand(node, 0)?,
            item,
        }))
    }
}

impl Op for ConstOp {
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
        state.assign_register(self.dest, self.item.clone())?;
        Ok(self.site.children.clone())
    }
}

impl fmt::Display for ConstOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} r{}, {}", self.site.opcode, self.dest, self.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::GraphBuilder, diagnostics::NullSink, disassembler::Instruction,
        emulation::types, Error,
    };

    fn build(instruction: Instruction) -> Result<Box<dyn Op>> {
        let location = instruction.location;
        let graph = GraphBuilder::new().with_sink(&NullSink).build(&[
            instruction,
            Instruction::new(Opcode::ReturnVoid, location + 1),
        ])?;
        ConstOp::create(&graph, &graph.nodes()[0])
    }

    fn load(opcode: Opcode, literal: i64) -> HeapItem {
        let op = build(
            Instruction::new(opcode, 0)
                .with_registers(&[1])
                .with_literal(literal),
        )
        .unwrap();
        let mut state = MethodState::new(2);
        op.execute(&mut state).unwrap();
        state.read_register(1).unwrap().as_ref().clone()
    }

    #[test]
    fn test_narrow_forms() {
        assert_eq!(load(Opcode::Const4, -8), HeapItem::int(-8));
        assert_eq!(load(Opcode::Const16, 0x7fff), HeapItem::int(0x7fff));
        assert_eq!(load(Opcode::Const, i64::from(i32::MIN)), HeapItem::int(i32::MIN));
        assert_eq!(load(Opcode::ConstHigh16, 0x4120_0000), HeapItem::int(0x4120_0000));
        assert_eq!(load(Opcode::Const4, 1).type_name(), types::INT);
    }

    #[test]
    fn test_wide_forms() {
        assert_eq!(load(Opcode::ConstWide16, -1), HeapItem::long(-1));
        assert_eq!(load(Opcode::ConstWide, i64::MAX), HeapItem::long(i64::MAX));
        assert_eq!(
            load(Opcode::ConstWideHigh16, 0x4024_0000_0000_0000),
            HeapItem::long(0x4024_0000_0000_0000)
        );
        assert_eq!(load(Opcode::ConstWide32, 5).type_name(), types::LONG);
    }

    #[test]
    fn test_missing_literal() {
        let result = build(Instruction::new(Opcode::Const16, 0).with_registers(&[0]));
        assert!(matches!(
            result,
            Err(Error::Execution(ExecutionError::InvalidOperand {
                instruction: "const/16",
                expected: "literal",
            }))
        ));
    }

    #[test]
    fn test_rejects_string_constants() {
        let result = build(Instruction::new(Opcode::ConstString, 0).with_registers(&[0]));
        assert!(result.is_err());
    }

    #[test]
    fn test_display_and_children() {
        let op = build(
            Instruction::new(Opcode::Const16, 0)
                .with_registers(&[3])
                .with_literal(16),
        )
        .unwrap();
        assert_eq!(op.to_string(), "const/16 r3, int:16");
        assert_eq!(op.children(), &[2]);
    }
}
