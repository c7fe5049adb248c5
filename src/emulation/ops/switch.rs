//! Multi-way branches.

use std::fmt;

use crate::{
    analysis::{MethodGraph, Node},
    disassembler::Opcode,
    emulation::{
        ops::{expect_opcode, register_operand, Op, OpSite},
        MethodState, Value,
    },
    Result,
};

/// `packed-switch` and `sparse-switch`.
///
/// The case table is resolved from the referenced payload when the op is built. A known
/// `int` selector returns the address of the matching case, or the fallthrough if no key
/// matches. An unknown selector returns the nominal children.
#[derive(Debug, Clone)]
pub struct SwitchOp {
    site: OpSite,
    selector: u16,
    /// `(key, absolute target address)` in payload order.
    cases: Vec<(i32, u32)>,
    fallthrough: u32,
}

impl SwitchOp {
    /// Builds the op for a switch node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`](crate::Error::Malformed) if the referenced payload is
    /// missing or is not a switch payload, and
    /// [`ExecutionError::InvalidOperand`](crate::ExecutionError::InvalidOperand) for a node
    /// that is not a switch.
    pub fn create(graph: &MethodGraph, node: &Node) -> Result<Box<dyn Op>> {
        expect_opcode(
            node,
            &[Opcode::PackedSwitch, Opcode::SparseSwitch],
            "switch opcode",
        )?;
        let site = OpSite::new(graph, node);
        let payload_address = site.branch_target(node)?;

        let elements = graph
            .node_at_address(payload_address)
            .and_then(|id| graph.node(id))
            .filter(|payload| payload.opcode().is_switch_payload())
            .and_then(|payload| payload.instruction().switch_elements())
            .ok_or_else(|| {
                malformed_error!(
                    "{} at 0x{:04x} references no switch payload at 0x{:04x}",
                    site.opcode,
                    site.address,
                    payload_address
                )
            })?;

        let base = i64::from(site.address);
        let cases = elements
            .iter()
            .filter_map(|element| {
                u32::try_from(base + i64::from(element.offset))
                    .ok()
                    .map(|target| (element.key, target))
            })
            .collect();

        Ok(Box::new(SwitchOp {
            selector: register_operand(node, 0)?,
            cases,
            fallthrough: site.fallthrough(node),
            site,
        }))
    }

    /// Target address for a selector value.
    fn select(&self, key: i32) -> u32 {
        self.cases
            .iter()
            .find(|(case, _)| *case == key)
            .map_or(self.fallthrough, |&(_, target)| target)
    }
}

impl Op for SwitchOp {
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
        let selector = state.read_register(self.selector)?;
        Ok(match selector.value() {
            Some(Value::Int(key)) => vec![self.select(*key)],
            _ => self.site.children.clone(),
        })
    }
}

impl fmt::Display for SwitchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} r{}, {{", self.site.opcode, self.selector)?;
        for (i, (key, target)) in self.cases.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: #{target}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::GraphBuilder, diagnostics::NullSink, disassembler::Instruction,
        emulation::HeapItem, Error,
    };

    /// ```text
    /// 0: packed-switch v0, +6     keys 1 -> 3, 2 -> 4, 3 -> 3
    /// 3: return-void
    /// 4: return-void
    /// 5: nop
    /// 6: packed-switch-payload
    /// ```
    fn graph() -> MethodGraph {
        GraphBuilder::new()
            .with_sink(&NullSink)
            .build(&[
                Instruction::new(Opcode::PackedSwitch, 0)
                    .with_registers(&[0])
                    .with_offset(6),
                Instruction::new(Opcode::ReturnVoid, 1),
                Instruction::new(Opcode::ReturnVoid, 2),
                Instruction::new(Opcode::Nop, 3),
                Instruction::packed_switch_payload(4, 1, &[3, 4, 3]),
            ])
            .unwrap()
    }

    fn setup() -> Box<dyn Op> {
        let graph = graph();
        SwitchOp::create(&graph, &graph.nodes()[0]).unwrap()
    }

    fn run(selector: HeapItem) -> Vec<u32> {
        let mut state = MethodState::new(1);
        state.assign_register(0, selector).unwrap();
        setup().execute(&mut state).unwrap()
    }

    #[test]
    fn test_nominal_children_are_distinct() {
        assert_eq!(setup().children(), &[3, 4]);
    }

    #[test]
    fn test_known_selector() {
        assert_eq!(run(HeapItem::int(1)), vec![3]);
        assert_eq!(run(HeapItem::int(2)), vec![4]);
        assert_eq!(run(HeapItem::int(3)), vec![3]);
    }

    #[test]
    fn test_missing_key_falls_through() {
        assert_eq!(run(HeapItem::int(42)), vec![3]);
        assert_eq!(run(HeapItem::int(-1)), vec![3]);
    }

    #[test]
    fn test_unknown_selector() {
        assert_eq!(run(HeapItem::unknown("int")), vec![3, 4]);
    }

    #[test]
    fn test_sparse_switch() {
        let graph = GraphBuilder::new()
            .with_sink(&NullSink)
            .build(&[
                Instruction::new(Opcode::SparseSwitch, 0)
                    .with_registers(&[2])
                    .with_offset(5),
                Instruction::new(Opcode::ReturnVoid, 1),
                Instruction::new(Opcode::ReturnVoid, 2),
                Instruction::sparse_switch_payload(3, &[(-10, 4), (1000, 3)]),
            ])
            .unwrap();
        let op = SwitchOp::create(&graph, &graph.nodes()[0]).unwrap();

        let mut state = MethodState::new(3);
        state.assign_register(2, HeapItem::int(-10)).unwrap();
        assert_eq!(op.execute(&mut state).unwrap(), vec![4]);
        state.assign_register(2, HeapItem::int(1000)).unwrap();
        assert_eq!(op.execute(&mut state).unwrap(), vec![3]);
        assert_eq!(op.to_string(), "sparse-switch r2, {-10: #4, 1000: #3}");
    }

    #[test]
    fn test_unassigned_selector() {
        let mut state = MethodState::new(1);
        assert!(matches!(
            setup().execute(&mut state),
            Err(Error::Execution(_))
        ));
    }

    #[test]
    fn test_rejects_non_switch() {
        let graph = graph();
        assert!(SwitchOp::create(&graph, &graph.nodes()[1]).is_err());
    }
}
