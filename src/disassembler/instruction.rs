//! Decoded Dalvik instruction model.
//!
//! An [`Instruction`] is the unit consumed by the graph builder. Decoding the binary
//! container happens elsewhere; this module only fixes the shape a decoder must produce:
//!
//! - the [`Opcode`]
//! - a stable location index (the position in the decoded method body)
//! - the register operands in encoding order
//! - the width in code units
//! - an [`Operand`] carrying literals, relative branch offsets or payload data
//!
//! Branch offsets are relative to the address of the instruction holding them and are
//! measured in 16-bit code units. Switch payload elements store their offsets relative to
//! the switch instruction that references the payload.

use std::fmt;

use crate::disassembler::{Format, Opcode};

/// One case of a switch payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwitchElement {
    /// The case key.
    pub key: i32,
    /// Branch offset relative to the referencing switch instruction.
    pub offset: i32,
}

impl SwitchElement {
    /// Creates a new switch element.
    #[must_use]
    pub const fn new(key: i32, offset: i32) -> Self {
        SwitchElement { key, offset }
    }
}

/// Non-register operand of an instruction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Operand {
    /// The instruction has no extra operand.
    #[default]
    None,
    /// A sign-extended literal (`const*`, `*/lit8`, `*/lit16`).
    Literal(i64),
    /// Relative branch or payload offset in code units.
    Offset(i32),
    /// Elements of a packed or sparse switch payload.
    SwitchPayload(Vec<SwitchElement>),
    /// Raw data of a `fill-array-data` payload.
    ArrayPayload {
        /// Width of one element in bytes.
        element_width: u16,
        /// Little-endian element bytes.
        data: Vec<u8>,
    },
}

/// A decoded Dalvik instruction.
///
/// # Examples
///
/// ```rust
/// use dexscope::disassembler::{Instruction, Opcode};
///
/// let branch = Instruction::new(Opcode::IfEq, 0)
///     .with_registers(&[0, 1])
///     .with_offset(7);
///
/// assert_eq!(branch.code_units, 2);
/// assert_eq!(branch.branch_offset(), Some(7));
/// assert_eq!(branch.to_string(), "if-eq v0, v1, +7");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// The opcode.
    pub opcode: Opcode,
    /// Stable index of this instruction in the decoded method body.
    pub location: usize,
    /// Register operands in encoding order.
    pub registers: Vec<u16>,
    /// Width in 16-bit code units.
    pub code_units: u16,
    /// Literal, offset or payload operand.
    pub operand: Operand,
}

impl Instruction {
    /// Creates an instruction without operands.
    ///
    /// The width is taken from the opcode format. Payload opcodes start with width `0`
    /// and should be built through the payload constructors instead.
    #[must_use]
    pub fn new(opcode: Opcode, location: usize) -> Self {
        Instruction {
            opcode,
            location,
            registers: Vec::new(),
            code_units: opcode.format().code_units().unwrap_or(0),
            operand: Operand::None,
        }
    }

    /// Creates a `packed-switch-payload` whose keys start at `first_key`.
    ///
    /// # Arguments
    ///
    /// * `location` - Location index of the payload
    /// * `first_key` - Key of the first case, each following case increments it by one
    /// * `offsets` - Case offsets relative to the referencing switch instruction
    #[must_use]
    pub fn packed_switch_payload(location: usize, first_key: i32, offsets: &[i32]) -> Self {
        let elements = offsets
            .iter()
            .enumerate()
            .map(|(i, &offset)| SwitchElement::new(first_key.wrapping_add(i as i32), offset))
            .collect();
        Self::payload(Opcode::PackedSwitchPayload, location, Operand::SwitchPayload(elements))
    }

    /// Creates a `sparse-switch-payload` from `(key, offset)` pairs.
    #[must_use]
    pub fn sparse_switch_payload(location: usize, cases: &[(i32, i32)]) -> Self {
        let elements = cases
            .iter()
            .map(|&(key, offset)| SwitchElement::new(key, offset))
            .collect();
        Self::payload(Opcode::SparseSwitchPayload, location, Operand::SwitchPayload(elements))
    }

    /// Creates an `array-payload` holding raw element data.
    #[must_use]
    pub fn array_payload(location: usize, element_width: u16, data: Vec<u8>) -> Self {
        Self::payload(
            Opcode::ArrayPayload,
            location,
            Operand::ArrayPayload {
                element_width,
                data,
            },
        )
    }

    fn payload(opcode: Opcode, location: usize, operand: Operand) -> Self {
        let mut instruction = Instruction::new(opcode, location);
        instruction.operand = operand;
        instruction.code_units = instruction.payload_code_units();
        instruction
    }

    /// Width of a payload as encoded in a dex file.
    fn payload_code_units(&self) -> u16 {
        let units = match (&self.operand, self.opcode.format()) {
            (Operand::SwitchPayload(elements), Format::PackedSwitchPayload) => {
                4 + elements.len() * 2
            }
            (Operand::SwitchPayload(elements), Format::SparseSwitchPayload) => {
                2 + elements.len() * 4
            }
            (Operand::ArrayPayload { data, .. }, Format::ArrayPayload) => 4 + data.len().div_ceil(2),
            _ => 0,
        };
        u16::try_from(units).unwrap_or(u16::MAX)
    }

    /// Sets the register operands.
    #[must_use]
    pub fn with_registers(mut self, registers: &[u16]) -> Self {
        self.registers = registers.to_vec();
        self
    }

    /// Sets a literal operand.
    #[must_use]
    pub fn with_literal(mut self, literal: i64) -> Self {
        self.operand = Operand::Literal(literal);
        self
    }

    /// Sets a relative branch offset.
    #[must_use]
    pub fn with_offset(mut self, offset: i32) -> Self {
        self.operand = Operand::Offset(offset);
        self
    }

    /// Overrides the width in code units, for decoders that know better.
    #[must_use]
    pub fn with_code_units(mut self, code_units: u16) -> Self {
        self.code_units = code_units;
        self
    }

    /// The relative branch offset, if this instruction carries one.
    #[must_use]
    pub fn branch_offset(&self) -> Option<i32> {
        match self.operand {
            Operand::Offset(offset) => Some(offset),
            _ => None,
        }
    }

    /// The literal operand, if any.
    #[must_use]
    pub fn literal(&self) -> Option<i64> {
        match self.operand {
            Operand::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// Switch payload elements, if this is a switch payload.
    #[must_use]
    pub fn switch_elements(&self) -> Option<&[SwitchElement]> {
        match &self.operand {
            Operand::SwitchPayload(elements) => Some(elements),
            _ => None,
        }
    }

    /// Register operand at `index`.
    #[must_use]
    pub fn register(&self, index: usize) -> Option<u16> {
        self.registers.get(index).copied()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;

        let mut first = true;
        let mut sep = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            let s = if first { " " } else { ", " };
            first = false;
            f.write_str(s)
        };

        for register in &self.registers {
            sep(f)?;
            write!(f, "v{register}")?;
        }

        match &self.operand {
            Operand::None => {}
            Operand::Literal(value) => {
                sep(f)?;
                if *value < 0 {
                    write!(f, "-{:#x}", value.unsigned_abs())?;
                } else {
                    write!(f, "{value:#x}")?;
                }
            }
            Operand::Offset(offset) => {
                sep(f)?;
                write!(f, "{offset:+}")?;
            }
            Operand::SwitchPayload(elements) => {
                for element in elements {
                    sep(f)?;
                    write!(f, "{} -> {:+}", element.key, element.offset)?;
                }
            }
            Operand::ArrayPayload {
                element_width,
                data,
            } => {
                sep(f)?;
                write!(f, "width {element_width}, {} bytes", data.len())?;
            }
        }
        Ok(())
    }
}
