// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # dexscope
//!
//! Control flow graphs and an opcode execution contract for Dalvik method bodies.
//!
//! `dexscope` takes the decoded instructions of one method, resolves relative branch
//! offsets and switch payloads to concrete successors, and builds an immutable
//! [`MethodGraph`](analysis::MethodGraph). On top of the graph it defines how individual
//! opcodes execute against a per-path register file holding possibly unknown values, which
//! is the building block for value-set analysis, constant propagation and deobfuscation
//! drivers.
//!
//! ## Features
//!
//! - **Graph construction** - Branches, fallthrough and switch cases become typed edges,
//!   payloads stay in the graph as unreachable data nodes
//! - **Three-valued execution** - Unknown operands flow through as data and give unknown
//!   results of the statically known type
//! - **O(1) state forking** - Register files are persistent maps, diverging paths share
//!   everything they have not written
//! - **Pluggable opcode families** - An [`OpRegistry`](emulation::OpRegistry) selects the
//!   op for each opcode and can be extended
//! - **Diagnostics** - Structural findings go to a [`DiagnosticSink`](diagnostics::DiagnosticSink),
//!   by default the `log` facade
//!
//! ## Quick Start
//!
//! ```rust
//! use dexscope::prelude::*;
//!
//! // 0: if-eqz v0, +3 | 2: const/4 v1, 1 | 3: return v1
//! let graph = GraphBuilder::new().build(&[
//!     Instruction::new(Opcode::IfEqz, 0).with_registers(&[0]).with_offset(3),
//!     Instruction::new(Opcode::Const4, 1).with_registers(&[1]).with_literal(1),
//!     Instruction::new(Opcode::Return, 2).with_registers(&[1]),
//! ])?;
//! let ops = OpRegistry::new().build(&graph)?;
//!
//! let mut state = MethodState::new(2);
//! state.assign_register(0, HeapItem::unknown(types::INT))?;
//! state.assign_register(1, HeapItem::int(0))?;
//!
//! // an unknown condition keeps both successors alive
//! let successors = step(&graph, &ops, graph.root(), state)?;
//! assert_eq!(successors.len(), 2);
//! # Ok::<(), dexscope::Error>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`disassembler`] - Opcode table and the decoded instruction model
//! - [`analysis`] - Control flow graph construction
//! - [`emulation`] - Values, register state and opcode execution
//! - [`diagnostics`] - Sinks for builder findings
//! - [`utils`] - Graph primitives and DOT helpers
//! - [`prelude`] - Common re-exports

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use dexscope::prelude::*;
///
/// let graph = GraphBuilder::new().build(&[Instruction::new(Opcode::ReturnVoid, 0)])?;
/// assert_eq!(graph.node_count(), 1);
/// # Ok::<(), dexscope::Error>(())
/// ```
pub mod prelude;

/// Dalvik opcodes and decoded instructions.
///
/// # Key Types
///
/// - [`disassembler::Opcode`] - Every standard opcode plus the three payload pseudo-opcodes
/// - [`disassembler::Instruction`] - A decoded instruction with location, registers and operand
/// - [`disassembler::Operand`] - Literals, branch offsets and payload data
pub mod disassembler;

/// Control flow graph construction.
///
/// See [`analysis::GraphBuilder`] and [`analysis::MethodGraph`].
pub mod analysis;

/// Opcode execution over abstract register state.
pub mod emulation;

/// Reporting of non-fatal findings.
pub mod diagnostics;

/// Shared graph primitives and output helpers.
pub mod utils;

/// `dexscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust
/// use dexscope::{analysis::{GraphBuilder, MethodGraph}, disassembler::Instruction, Result};
///
/// fn build(instructions: &[Instruction]) -> Result<MethodGraph> {
///     GraphBuilder::new().build(instructions)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `dexscope` Error type
///
/// # Examples
///
/// ```rust
/// use dexscope::{analysis::GraphBuilder, disassembler::{Instruction, Opcode}, Error};
///
/// let result = GraphBuilder::new().build(&[
///     Instruction::new(Opcode::Goto, 0).with_offset(40),
/// ]);
///
/// match result {
///     Err(Error::UnresolvedTarget { source_address, target, .. }) => {
///         println!("0x{source_address:04x} jumps to missing 0x{target:04x}");
///     }
///     Err(e) => println!("Error: {e}"),
///     Ok(_) => unreachable!(),
/// }
/// ```
pub use error::Error;

/// Contract violations raised while executing an op.
pub use error::ExecutionError;
