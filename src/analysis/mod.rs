//! Static analysis of Dalvik method bodies.
//!
//! - [`cfg`] - Control flow graph construction
//!
//! # Usage
//!
//! ```rust
//! use dexscope::analysis::GraphBuilder;
//! use dexscope::disassembler::{Instruction, Opcode};
//!
//! let graph = GraphBuilder::new().build(&[
//!     Instruction::new(Opcode::IfEqz, 0).with_registers(&[0]).with_offset(3),
//!     Instruction::new(Opcode::Nop, 1),
//!     Instruction::new(Opcode::ReturnVoid, 2),
//! ])?;
//!
//! assert_eq!(graph.reachable().len(), 3);
//! # Ok::<(), dexscope::Error>(())
//! ```

pub mod cfg;

pub use crate::utils::graph::NodeId;
pub use cfg::{Edge, EdgeKind, GraphBuilder, GraphConfig, MethodGraph, Node};
