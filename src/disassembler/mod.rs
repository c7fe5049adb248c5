//! Dalvik instruction set and decoded instruction model.
//!
//! This module provides the static instruction set table and the [`Instruction`] type that
//! decoders hand to the graph builder. It does not parse dex files itself: the instruction
//! stream of a method body is consumed already decoded.
//!
//! # Key Types
//! - [`Opcode`] - Every Dalvik opcode with mnemonic, value, format and flags
//! - [`Format`] - Encoding formats, fixing the code-unit width of an instruction
//! - [`OpcodeFlags`] - Control flow and register effects of an opcode
//! - [`Instruction`] - A decoded instruction with registers and operand
//! - [`Operand`] - Literals, relative offsets and payload data
//!
//! # Example
//! ```rust
//! use dexscope::disassembler::{Instruction, Opcode};
//!
//! let body = vec![
//!     Instruction::new(Opcode::Const4, 0).with_registers(&[0]).with_literal(1),
//!     Instruction::new(Opcode::Return, 1).with_registers(&[0]),
//! ];
//! let width: u32 = body.iter().map(|i| u32::from(i.code_units)).sum();
//! assert_eq!(width, 2);
//! ```

mod instruction;
mod opcodes;

pub use instruction::{Instruction, Operand, SwitchElement};
pub use opcodes::{Format, Opcode, OpcodeFlags};
