//! Opcode execution contract for Dalvik methods.
//!
//! This module defines how a single instruction of a [`MethodGraph`](crate::analysis::MethodGraph)
//! is executed against a per-path register file. It does not schedule anything: choosing which
//! node to run next, tracking visited states and merging paths belong to the caller.
//!
//! # Key Components
//!
//! - [`HeapItem`] - A value cell that is either known or unknown, plus a type tag
//! - [`MethodState`] - Register file of one exploration path, forked in O(1)
//! - [`Op`] - Execution unit for one static instruction
//! - [`OpRegistry`] - Selects the op family for an opcode and builds an [`OpTable`]
//! - [`step`] - Runs one node and hands every live successor its own state
//!
//! # Three-valued Evaluation
//!
//! An item whose value is not known still carries its declared type. Ops treat unknown
//! operands as ordinary data: arithmetic-like families produce an unknown result of the
//! statically known type, decision families fall back to all nominal successors.
//!
//! # Example
//!
//! ```rust
//! use dexscope::{
//!     analysis::GraphBuilder,
//!     disassembler::{Instruction, Opcode},
//!     emulation::{step, HeapItem, MethodState, OpRegistry},
//! };
//!
//! // 0: cmpl-float v0, v1, v2 | 2: return v0
//! let graph = GraphBuilder::new().build(&[
//!     Instruction::new(Opcode::CmplFloat, 0).with_registers(&[0, 1, 2]),
//!     Instruction::new(Opcode::Return, 1).with_registers(&[0]),
//! ])?;
//! let ops = OpRegistry::new().build(&graph)?;
//!
//! let mut state = MethodState::new(3);
//! state.assign_register(1, HeapItem::float(1.0))?;
//! state.assign_register(2, HeapItem::float(2.0))?;
//!
//! let next = step(&graph, &ops, graph.root(), state)?;
//! let (_, state) = &next[0];
//! assert_eq!(*state.read_register(0)?, HeapItem::int(-1));
//! # Ok::<(), dexscope::Error>(())
//! ```

mod ops;
mod state;
mod step;
mod value;

pub use ops::{
    CmpOp, ConstOp, FlowOp, IfOp, MoveOp, Op, OpConstructor, OpRegistry, OpTable, SwitchOp,
};
pub use state::MethodState;
pub use step::step;
pub use value::{types, HeapItem, Value};
