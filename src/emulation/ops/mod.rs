//! Executable opcode families.
//!
//! Every executable node of a [`MethodGraph`](crate::analysis::MethodGraph) gets one [`Op`].
//! An op is built once from its node, keeps the node address and the nominal next
//! addresses (the distinct addresses of the node's children), and is immutable afterwards.
//!
//! [`Op::execute`] runs the instruction against a [`MethodState`]:
//!
//! 1. read zero or more registers
//! 2. evaluate under three-valued semantics, any unknown required operand gives an unknown
//!    result of the statically known type
//! 3. assign results to registers, the only side effect
//! 4. return the next addresses, either the nominal set or for decision opcodes the subset
//!    that is actually taken
//!
//! # Families
//!
//! - [`CmpOp`] - `cmpl-float`, `cmpg-float`, `cmpl-double`, `cmpg-double`, `cmp-long`
//! - [`IfOp`] - `if-*` and `if-*z`
//! - [`SwitchOp`] - `packed-switch`, `sparse-switch`
//! - [`MoveOp`] - register to register moves
//! - [`ConstOp`] - numeric literals
//! - [`FlowOp`] - `nop`, `goto*`, `return*`, `throw`
//!
//! Ops are selected by opcode name through an [`OpRegistry`].

use std::fmt;

use crate::{
    analysis::{MethodGraph, Node},
    disassembler::Opcode,
    emulation::MethodState,
    ExecutionError, Result,
};

mod branch;
mod cmp;
mod constant;
mod flow;
mod moves;
mod registry;
mod switch;

pub use branch::IfOp;
pub use cmp::CmpOp;
pub use constant::ConstOp;
pub use flow::FlowOp;
pub use moves::MoveOp;
pub use registry::{OpConstructor, OpRegistry, OpTable};
pub use switch::SwitchOp;

/// The execution unit for one static instruction.
///
/// Implementations must be stateless across calls: all per-path data lives in the
/// [`MethodState`] passed to [`execute`](Op::execute).
pub trait Op: fmt::Display + fmt::Debug + Send + Sync {
    /// Code-unit address of the instruction.
    fn address(&self) -> u32;

    /// The opcode this op executes.
    fn opcode(&self) -> Opcode;

    /// The opcode mnemonic.
    fn name(&self) -> &'static str {
        self.opcode().name()
    }

    /// Nominal next addresses, the distinct child addresses of the node in edge order.
    fn children(&self) -> &[u32];

    /// Executes the instruction against `state`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Execution`](crate::Error::Execution) when a register cannot be read
    /// or written, or when operand values break a type guarantee of verified bytecode.
    /// Unknown operands are not an error.
    fn execute(&self, state: &mut MethodState) -> Result<Vec<u32>>;
}

/// Static data every op carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpSite {
    pub(crate) address: u32,
    pub(crate) opcode: Opcode,
    pub(crate) children: Vec<u32>,
}

impl OpSite {
    pub(crate) fn new(graph: &MethodGraph, node: &Node) -> Self {
        OpSite {
            address: node.address(),
            opcode: node.opcode(),
            children: graph.child_addresses(node.id()),
        }
    }

    /// Address of the instruction directly after this one.
    pub(crate) fn fallthrough(&self, node: &Node) -> u32 {
        self.address
            .saturating_add(u32::from(node.instruction().code_units))
    }

    /// Address targeted by the relative offset of the instruction.
    pub(crate) fn branch_target(&self, node: &Node) -> Result<u32> {
        let offset = node
            .instruction()
            .branch_offset()
            .ok_or(ExecutionError::InvalidOperand {
                instruction: self.opcode.name(),
                expected: "branch offset",
            })?;
        let target = i64::from(self.address) + i64::from(offset);
        u32::try_from(target).map_err(|_| crate::Error::UnresolvedTarget {
            kind: "branch",
            source_address: self.address,
            target,
        })
    }
}

/// Fetches register operand `index` of the node's instruction.
pub(crate) fn register_operand(node: &Node, index: usize) -> Result<u16> {
    node.instruction().register(index).ok_or_else(|| {
        ExecutionError::InvalidOperand {
            instruction: node.opcode().name(),
            expected: "register operand",
        }
        .into()
    })
}

/// Checks that a constructor was handed a node of one of the opcodes it supports.
pub(crate) fn expect_opcode(node: &Node, supported: &[Opcode], family: &'static str) -> Result<()> {
    if supported.contains(&node.opcode()) {
        Ok(())
    } else {
        Err(ExecutionError::InvalidOperand {
            instruction: node.opcode().name(),
            expected: family,
        }
        .into())
    }
}
