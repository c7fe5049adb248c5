//! # dexscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the dexscope library. Import this module to get quick access to the essential
//! types for building method graphs and executing opcodes.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dexscope operations
pub use crate::Error;

/// Contract violations raised while executing an op
pub use crate::ExecutionError;

/// The result type used throughout dexscope
pub use crate::Result;

// ================================================================================================
// Instructions
// ================================================================================================

/// Opcode table and decoded instruction model
pub use crate::disassembler::{Format, Instruction, Opcode, OpcodeFlags, Operand, SwitchElement};

// ================================================================================================
// Control Flow Graph
// ================================================================================================

/// Graph construction and the resulting graph
pub use crate::analysis::{
    Edge, EdgeKind, GraphBuilder, GraphConfig, MethodGraph, Node, NodeId,
};

/// Graph traits the traversal algorithms are generic over
pub use crate::utils::graph::{GraphBase, Predecessors, RootedGraph, Successors};

// ================================================================================================
// Execution
// ================================================================================================

/// Values and register state
pub use crate::emulation::{types, HeapItem, MethodState, Value};

/// Ops, their registry and the step function
pub use crate::emulation::{
    step, CmpOp, ConstOp, FlowOp, IfOp, MoveOp, Op, OpConstructor, OpRegistry, OpTable, SwitchOp,
};

// ================================================================================================
// Diagnostics
// ================================================================================================

/// Diagnostic sinks
pub use crate::diagnostics::{
    CollectingSink, Diagnostic, DiagnosticSink, LogSink, NullSink, Severity,
};
