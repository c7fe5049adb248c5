//! Conditional branches.

use std::fmt;

use crate::{
    analysis::{MethodGraph, Node},
    disassembler::Opcode,
    emulation::{
        ops::{expect_opcode, register_operand, Op, OpSite},
        HeapItem, MethodState, Value,
    },
    Result,
};

const SUPPORTED: &[Opcode] = &[
    Opcode::IfEq,
    Opcode::IfNe,
    Opcode::IfLt,
    Opcode::IfGe,
    Opcode::IfGt,
    Opcode::IfLe,
    Opcode::IfEqz,
    Opcode::IfNez,
    Opcode::IfLtz,
    Opcode::IfGez,
    Opcode::IfGtz,
    Opcode::IfLez,
];

/// Comparison operand reduced to what a branch can decide on.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Condition {
    Scalar(i64),
    Reference { null: bool },
}

impl Condition {
    fn of(item: &HeapItem) -> Option<Self> {
        match item.value()? {
            Value::Int(v) => Some(Condition::Scalar(i64::from(*v))),
            Value::Boolean(b) => Some(Condition::Scalar(i64::from(*b))),
            Value::Null => Some(Condition::Reference { null: true }),
            Value::String(_) => Some(Condition::Reference { null: false }),
            Value::Long(_) | Value::Float(_) | Value::Double(_) => None,
        }
    }
}

/// `if-eq`, `if-ne`, `if-lt`, `if-ge`, `if-gt`, `if-le` and their `-z` forms.
///
/// A decision opcode. When both operands are known, comparable values the op returns only
/// the taken address: the branch target or the fallthrough. Otherwise both nominal
/// addresses are returned.
///
/// `int` and `boolean` operands compare numerically. References only support the equality
/// forms, where `null` equals `null` and zero, and a known non-null string equals neither.
#[derive(Debug, Clone)]
pub struct IfOp {
    site: OpSite,
    lhs: u16,
    rhs: Option<u16>,
    target: u32,
    fallthrough: u32,
}

impl IfOp {
    /// Builds the op for an `if-*` node.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::InvalidOperand`](crate::ExecutionError::InvalidOperand)
    /// for unsupported opcodes, missing registers or a missing branch offset.
    pub fn create(graph: &MethodGraph, node: &Node) -> Result<Box<dyn Op>> {
        expect_opcode(node, SUPPORTED, "conditional branch")?;
        let site = OpSite::new(graph, node);
        let rhs = if is_zero_form(site.opcode) {
            None
        } else {
            Some(register_operand(node, 1)?)
        };

        Ok(Box::new(IfOp {
            lhs: register_operand(node, 0)?,
            rhs,
            target: site.branch_target(node)?,
            fallthrough: site.fallthrough(node),
            site,
        }))
    }

    /// Decides the branch, `None` if it cannot be decided.
    fn decide(&self, lhs: Condition, rhs: Condition) -> Option<bool> {
        use Opcode::{IfEq, IfEqz, IfGe, IfGez, IfGt, IfGtz, IfLe, IfLez, IfLt, IfLtz, IfNe, IfNez};

        let equal = match (lhs, rhs) {
            (Condition::Scalar(a), Condition::Scalar(b)) => {
                return Some(match self.site.opcode {
                    IfEq | IfEqz => a == b,
                    IfNe | IfNez => a != b,
                    IfLt | IfLtz => a < b,
                    IfGe | IfGez => a >= b,
                    IfGt | IfGtz => a > b,
                    IfLe | IfLez => a <= b,
                    _ => return None,
                });
            }
            (Condition::Reference { null: true }, Condition::Reference { null: true }) => true,
            (Condition::Reference { null }, Condition::Scalar(0))
            | (Condition::Scalar(0), Condition::Reference { null }) => null,
            (Condition::Reference { null: true }, Condition::Reference { null: false })
            | (Condition::Reference { null: false }, Condition::Reference { null: true }) => false,
            _ => return None,
        };

        match self.site.opcode {
            IfEq | IfEqz => Some(equal),
            IfNe | IfNez => Some(!equal),
            _ => None,
        }
    }
}

fn is_zero_form(opcode: Opcode) -> bool {
    matches!(
        opcode,
        Opcode::IfEqz | Opcode::IfNez | Opcode::IfLtz | Opcode::IfGez | Opcode::IfGtz | Opcode::IfLez
    )
}

impl Op for IfOp {
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
        let lhs = Condition::of(state.read_register(self.lhs)?.as_ref());
        let rhs = match self.rhs {
            Some(register) => Condition::of(state.read_register(register)?.as_ref()),
            None => Some(Condition::Scalar(0)),
        };

        let decision = lhs.zip(rhs).and_then(|(l, r)| self.decide(l, r));
        Ok(match decision {
            Some(true) => vec![self.target],
            Some(false) => vec![self.fallthrough],
            None => self.site.children.clone(),
        })
    }
}

impl fmt::Display for IfOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} r{}", self.site.opcode, self.lhs)?;
        if let Some(rhs) = self.rhs {
            write!(f, ", r{rhs}")?;
        }
        write!(f, ", #{}", self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analysis::GraphBuilder, diagnostics::NullSink, disassembler::Instruction};

    /// `0: <if> v0[, v1], +3 | 2: nop | 3: return-void`
    fn setup(opcode: Opcode) -> Box<dyn Op> {
        let registers: &[u16] = if is_zero_form(opcode) { &[0] } else { &[0, 1] };
        let graph = GraphBuilder::new()
            .with_sink(&NullSink)
            .build(&[
                Instruction::new(opcode, 0)
                    .with_registers(registers)
                    .with_offset(3),
                Instruction::new(Opcode::Nop, 1),
                Instruction::new(Opcode::ReturnVoid, 2),
            ])
            .unwrap();
        IfOp::create(&graph, &graph.nodes()[0]).unwrap()
    }

    fn run(opcode: Opcode, lhs: HeapItem, rhs: Option<HeapItem>) -> Vec<u32> {
        let op = setup(opcode);
        let mut state = MethodState::new(2);
        state.assign_register(0, lhs).unwrap();
        if let Some(rhs) = rhs {
            state.assign_register(1, rhs).unwrap();
        }
        op.execute(&mut state).unwrap()
    }

    const TAKEN: &[u32] = &[3];
    const NOT_TAKEN: &[u32] = &[2];
    const BOTH: &[u32] = &[3, 2];

    #[test]
    fn test_two_register_forms() {
        let (one, two) = (HeapItem::int(1), HeapItem::int(2));
        assert_eq!(run(Opcode::IfEq, one.clone(), Some(one.clone())), TAKEN);
        assert_eq!(run(Opcode::IfNe, one.clone(), Some(one.clone())), NOT_TAKEN);
        assert_eq!(run(Opcode::IfLt, one.clone(), Some(two.clone())), TAKEN);
        assert_eq!(run(Opcode::IfGe, one.clone(), Some(two.clone())), NOT_TAKEN);
        assert_eq!(run(Opcode::IfGt, two.clone(), Some(one.clone())), TAKEN);
        assert_eq!(run(Opcode::IfLe, two, Some(one)), NOT_TAKEN);
    }

    #[test]
    fn test_zero_forms() {
        assert_eq!(run(Opcode::IfEqz, HeapItem::int(0), None), TAKEN);
        assert_eq!(run(Opcode::IfNez, HeapItem::int(0), None), NOT_TAKEN);
        assert_eq!(run(Opcode::IfLtz, HeapItem::int(-4), None), TAKEN);
        assert_eq!(run(Opcode::IfGez, HeapItem::int(-4), None), NOT_TAKEN);
        assert_eq!(run(Opcode::IfGtz, HeapItem::int(9), None), TAKEN);
        assert_eq!(run(Opcode::IfLez, HeapItem::int(9), None), NOT_TAKEN);
        assert_eq!(run(Opcode::IfNez, HeapItem::boolean(true), None), TAKEN);
    }

    #[test]
    fn test_references() {
        let null = HeapItem::known(Value::Null);
        let string = HeapItem::known(Value::String("s".into()));
        assert_eq!(run(Opcode::IfEqz, null.clone(), None), TAKEN);
        assert_eq!(run(Opcode::IfNez, string.clone(), None), TAKEN);
        assert_eq!(run(Opcode::IfEq, null.clone(), Some(null.clone())), TAKEN);
        assert_eq!(run(Opcode::IfNe, null.clone(), Some(string.clone())), TAKEN);
        assert_eq!(run(Opcode::IfEq, string.clone(), Some(string.clone())), BOTH);
        assert_eq!(run(Opcode::IfLtz, null, None), BOTH);
    }

    #[test]
    fn test_unknown_takes_both() {
        assert_eq!(run(Opcode::IfEqz, HeapItem::unknown("int"), None), BOTH);
        assert_eq!(
            run(Opcode::IfLt, HeapItem::int(1), Some(HeapItem::unknown("int"))),
            BOTH
        );
        assert_eq!(run(Opcode::IfEqz, HeapItem::long(0), None), BOTH);
    }

    #[test]
    fn test_no_register_writes() {
        let op = setup(Opcode::IfEqz);
        let mut state = MethodState::new(2);
        state.assign_register(0, HeapItem::int(0)).unwrap();
        op.execute(&mut state).unwrap();
        assert_eq!(state.assigned_registers(), vec![0]);
    }

    #[test]
    fn test_display() {
        assert_eq!(setup(Opcode::IfGe).to_string(), "if-ge r0, r1, #3");
        assert_eq!(setup(Opcode::IfGez).to_string(), "if-gez r0, #3");
    }
}
