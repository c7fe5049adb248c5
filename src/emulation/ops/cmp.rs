//! Three-way numeric comparison.

use std::{cmp::Ordering, fmt};

use crate::{
    analysis::{MethodGraph, Node},
    disassembler::Opcode,
    emulation::{
        ops::{expect_opcode, register_operand, Op, OpSite},
        types, HeapItem, MethodState, Value,
    },
    ExecutionError, Result,
};

const SUPPORTED: &[Opcode] = &[
    Opcode::CmplFloat,
    Opcode::CmpgFloat,
    Opcode::CmplDouble,
    Opcode::CmpgDouble,
    Opcode::CmpLong,
];

/// `cmpl-float`, `cmpg-float`, `cmpl-double`, `cmpg-double` and `cmp-long`.
///
/// Writes `-1`, `0` or `1` as a known `int` to the destination register. A NaN operand
/// yields `1` for the `cmpg` forms and `-1` for the `cmpl` forms. If either operand is
/// unknown the destination becomes an unknown `int`.
///
/// Verified bytecode guarantees that both operands share one representation and type.
/// Operands that break this fail with [`ExecutionError::InvariantViolation`].
#[derive(Debug, Clone)]
pub struct CmpOp {
    site: OpSite,
    dest: u16,
    lhs: u16,
    rhs: u16,
}

impl CmpOp {
    /// Builds the op for a `23x` comparison node.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::InvalidOperand`] if the node is not a comparison or lacks
    /// one of its three registers.
    pub fn create(graph: &MethodGraph, node: &Node) -> Result<Box<dyn Op>> {
        expect_opcode(node, SUPPORTED, "comparison opcode")?;
        Ok(Box::new(CmpOp {
            site: OpSite::new(graph, node),
            dest: register_operand(node, 0)?,
            lhs: register_operand(node, 1)?,
            rhs: register_operand(node, 2)?,
        }))
    }

    /// Result written when an operand is NaN.
    fn nan_bias(&self) -> i32 {
        match self.site.opcode {
            Opcode::CmpgFloat | Opcode::CmpgDouble => 1,
            _ => -1,
        }
    }

    fn violation(&self, message: String) -> ExecutionError {
        ExecutionError::InvariantViolation {
            operation: self.site.opcode.name(),
            message,
        }
    }

    fn compare(&self, lhs: &HeapItem, rhs: &HeapItem) -> Result<i32> {
        let (Some(l), Some(r)) = (lhs.value(), rhs.value()) else {
            return Err(self.violation(String::from("comparison of unknown operands")).into());
        };

        if !l.is_numeric() || !r.is_numeric() {
            return Err(self
                .violation(format!(
                    "non-numeric operands {} and {}",
                    l.kind_name(),
                    r.kind_name()
                ))
                .into());
        }
        if !l.same_kind(r) {
            return Err(self
                .violation(format!(
                    "operand representations differ: {} vs {}",
                    l.kind_name(),
                    r.kind_name()
                ))
                .into());
        }
        if lhs.type_name() != rhs.type_name() {
            return Err(self
                .violation(format!(
                    "operand types differ: {} vs {}",
                    lhs.type_name(),
                    rhs.type_name()
                ))
                .into());
        }

        if l.is_nan() || r.is_nan() {
            return Ok(self.nan_bias());
        }

        let ordering = match self.site.opcode {
            Opcode::CmplFloat | Opcode::CmpgFloat => float_ordering(l.as_f32(), r.as_f32()),
            Opcode::CmplDouble | Opcode::CmpgDouble => float_ordering(l.as_f64(), r.as_f64()),
            _ => l.as_i64().zip(r.as_i64()).map(|(a, b)| a.cmp(&b)),
        };

        ordering
            .map(|o| o as i32)
            .ok_or_else(|| self.violation(String::from("operands are not comparable")).into())
    }
}

/// IEEE ordering, so `-0.0` equals `0.0`. NaN has been handled by the caller.
fn float_ordering<T: PartialOrd>(lhs: Option<T>, rhs: Option<T>) -> Option<Ordering> {
    let (a, b) = lhs.zip(rhs)?;
    a.partial_cmp(&b)
}

impl Op for CmpOp {
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
        let lhs = state.read_register(self.lhs)?;
        let rhs = state.read_register(self.rhs)?;

        let item = if lhs.is_unknown() || rhs.is_unknown() {
            HeapItem::unknown(types::INT)
        } else {
            HeapItem::new(Value::Int(self.compare(&lhs, &rhs)?), types::INT)
        };

        state.assign_register(self.dest, item)?;
        Ok(self.site.children.clone())
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} r{}, r{}, r{}",
            self.site.opcode, self.dest, self.lhs, self.rhs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::GraphBuilder, diagnostics::NullSink, disassembler::Instruction, Error,
    };

    /// `0: <cmp> v0, v1, v2 | 2: return v0`
    fn setup(opcode: Opcode) -> Box<dyn Op> {
        let graph = GraphBuilder::new()
            .with_sink(&NullSink)
            .build(&[
                Instruction::new(opcode, 0).with_registers(&[0, 1, 2]),
                Instruction::new(Opcode::Return, 1).with_registers(&[0]),
            ])
            .unwrap();
        CmpOp::create(&graph, &graph.nodes()[0]).unwrap()
    }

    fn run(opcode: Opcode, lhs: HeapItem, rhs: HeapItem) -> Result<HeapItem> {
        let op = setup(opcode);
        let mut state = MethodState::new(3);
        state.assign_register(1, lhs)?;
        state.assign_register(2, rhs)?;
        let next = op.execute(&mut state)?;
        assert_eq!(next, vec![2]);
        Ok(state.read_register(0)?.as_ref().clone())
    }

    fn cmp(opcode: Opcode, lhs: HeapItem, rhs: HeapItem) -> i32 {
        match run(opcode, lhs, rhs).unwrap().value() {
            Some(Value::Int(v)) => *v,
            other => panic!("expected a known int, got {other:?}"),
        }
    }

    #[test]
    fn test_float_ordering() {
        assert_eq!(cmp(Opcode::CmplFloat, HeapItem::float(1.0), HeapItem::float(2.0)), -1);
        assert_eq!(cmp(Opcode::CmpgFloat, HeapItem::float(2.0), HeapItem::float(1.0)), 1);
        assert_eq!(cmp(Opcode::CmpgFloat, HeapItem::float(0.5), HeapItem::float(0.5)), 0);
    }

    #[test]
    fn test_result_is_typed_int() {
        let result = run(Opcode::CmplFloat, HeapItem::float(1.0), HeapItem::float(2.0)).unwrap();
        assert_eq!(result, HeapItem::int(-1));
        assert_eq!(result.type_name(), types::INT);
    }

    #[test]
    fn test_negative_zero_equals_zero() {
        assert_eq!(cmp(Opcode::CmplFloat, HeapItem::float(-0.0), HeapItem::float(0.0)), 0);
        assert_eq!(cmp(Opcode::CmpgDouble, HeapItem::double(0.0), HeapItem::double(-0.0)), 0);
    }

    #[test]
    fn test_nan_bias() {
        let nan = f64::NAN;
        assert_eq!(cmp(Opcode::CmpgFloat, HeapItem::float(f32::NAN), HeapItem::float(1.0)), 1);
        assert_eq!(cmp(Opcode::CmplFloat, HeapItem::float(1.0), HeapItem::float(f32::NAN)), -1);
        assert_eq!(cmp(Opcode::CmpgDouble, HeapItem::double(nan), HeapItem::double(nan)), 1);
        assert_eq!(cmp(Opcode::CmplDouble, HeapItem::double(nan), HeapItem::double(0.0)), -1);
        // the bias decides regardless of which side holds the NaN
        assert_eq!(cmp(Opcode::CmpgFloat, HeapItem::float(f32::NAN), HeapItem::float(2.0)), 1);
        assert_eq!(cmp(Opcode::CmplFloat, HeapItem::float(f32::NAN), HeapItem::float(2.0)), -1);
    }

    #[test]
    fn test_double_ordering() {
        assert_eq!(cmp(Opcode::CmplDouble, HeapItem::double(-3.5), HeapItem::double(-3.25)), -1);
        assert_eq!(
            cmp(Opcode::CmpgDouble, HeapItem::double(f64::INFINITY), HeapItem::double(f64::MAX)),
            1
        );
        assert_eq!(
            cmp(Opcode::CmplDouble, HeapItem::double(1.0), HeapItem::double(1.000_000_1)),
            -1
        );
        assert_eq!(cmp(Opcode::CmpgDouble, HeapItem::double(1.0), HeapItem::double(1.0)), 0);
    }

    #[test]
    fn test_long_ordering() {
        assert_eq!(cmp(Opcode::CmpLong, HeapItem::long(5), HeapItem::long(3)), 1);
        assert_eq!(cmp(Opcode::CmpLong, HeapItem::long(3), HeapItem::long(5)), -1);
        assert_eq!(cmp(Opcode::CmpLong, HeapItem::long(i64::MIN), HeapItem::long(i64::MAX)), -1);
        assert_eq!(cmp(Opcode::CmpLong, HeapItem::long(7), HeapItem::long(7)), 0);
    }

    #[test]
    fn test_unknown_operand() {
        let result =
            run(Opcode::CmpLong, HeapItem::unknown(types::LONG), HeapItem::long(3)).unwrap();
        assert!(result.is_unknown());
        assert_eq!(result.type_name(), types::INT);

        let result =
            run(Opcode::CmpgFloat, HeapItem::float(1.0), HeapItem::unknown(types::FLOAT)).unwrap();
        assert!(result.is_unknown());
    }

    #[test]
    fn test_mismatched_representations() {
        let result = run(Opcode::CmpLong, HeapItem::long(1), HeapItem::int(1));
        assert!(matches!(
            result,
            Err(Error::Execution(ExecutionError::InvariantViolation {
                operation: "cmp-long",
                ..
            }))
        ));
    }

    #[test]
    fn test_mismatched_type_tags() {
        let result = run(
            Opcode::CmplDouble,
            HeapItem::double(1.0),
            HeapItem::new(Value::Double(1.0), "java.lang.Double"),
        );
        assert!(matches!(
            result,
            Err(Error::Execution(ExecutionError::InvariantViolation { .. }))
        ));
    }

    #[test]
    fn test_non_numeric_operands() {
        let result = run(Opcode::CmpLong, HeapItem::boolean(true), HeapItem::boolean(false));
        assert!(matches!(
            result,
            Err(Error::Execution(ExecutionError::InvariantViolation { .. }))
        ));
    }

    #[test]
    fn test_unassigned_operand() {
        let op = setup(Opcode::CmpLong);
        let mut state = MethodState::new(3);
        state.assign_register(1, HeapItem::long(1)).unwrap();
        let result = op.execute(&mut state);
        assert!(matches!(
            result,
            Err(Error::Execution(ExecutionError::UnassignedRegister { register: 2 }))
        ));
        assert!(!state.is_assigned(0));
    }

    #[test]
    fn test_metadata_and_display() {
        let op = setup(Opcode::CmpgDouble);
        assert_eq!(op.address(), 0);
        assert_eq!(op.name(), "cmpg-double");
        assert_eq!(op.children(), &[2]);
        assert_eq!(op.to_string(), "cmpg-double r0, r1, r2");
    }

    #[test]
    fn test_rejects_other_opcodes() {
        let graph = GraphBuilder::new()
            .with_sink(&NullSink)
            .build(&[Instruction::new(Opcode::Nop, 0)])
            .unwrap();
        assert!(CmpOp::create(&graph, &graph.nodes()[0]).is_err());
    }
}
