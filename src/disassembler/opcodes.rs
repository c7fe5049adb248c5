//! The Dalvik instruction set table.
//!
//! Every opcode carries its mnemonic, numeric value, encoding [`Format`] and a set of
//! [`OpcodeFlags`] describing its control flow and register effects. The format fixes the
//! width of an instruction in 16-bit code units, except for the three payload
//! pseudo-instructions whose width depends on their content.
//!
//! Payload pseudo-opcodes use the values of their identifying code unit
//! (`0x0100`, `0x0200`, `0x0300`), which keeps them disjoint from the single byte opcodes.
//!
//! # Example
//!
//! ```rust
//! use dexscope::disassembler::{Format, Opcode, OpcodeFlags};
//!
//! let op = Opcode::from_name("cmpl-float").unwrap();
//! assert_eq!(op.value(), 0x2d);
//! assert_eq!(op.format(), Format::Format23x);
//! assert_eq!(op.format().code_units(), Some(2));
//! assert!(op.flags().contains(OpcodeFlags::SETS_REGISTER));
//! assert!(op.can_continue());
//!
//! assert!(!Opcode::Goto.can_continue());
//! ```

use std::fmt;

use bitflags::bitflags;
use strum::{EnumCount, EnumIter};

bitflags! {
    /// Behavioral properties of an opcode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpcodeFlags: u32 {
        /// The instruction may throw an exception.
        const CAN_THROW = 0x1;
        /// Execution may continue with the next instruction in sequence.
        const CAN_CONTINUE = 0x4;
        /// The instruction sets the result register consumed by `move-result*`.
        const SETS_RESULT = 0x8;
        /// The instruction writes its first register operand.
        const SETS_REGISTER = 0x10;
        /// The register written is a wide (register pair) register.
        const SETS_WIDE_REGISTER = 0x20;
    }
}

/// Instruction encoding formats.
///
/// The leading digit of a format name is its width in code units. Payload formats have
/// no fixed width.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Format {
    Format10t,
    Format10x,
    Format11n,
    Format11x,
    Format12x,
    Format20bc,
    Format20t,
    Format21c,
    Format21ih,
    Format21lh,
    Format21s,
    Format21t,
    Format22b,
    Format22c,
    Format22cs,
    Format22s,
    Format22t,
    Format22x,
    Format23x,
    Format30t,
    Format31c,
    Format31i,
    Format31t,
    Format32x,
    Format35c,
    Format3rc,
    Format45cc,
    Format4rcc,
    Format51l,
    PackedSwitchPayload,
    SparseSwitchPayload,
    ArrayPayload,
}

impl Format {
    /// Width of an instruction of this format in code units.
    ///
    /// Returns `None` for payload formats, whose width is derived from their elements.
    #[must_use]
    pub const fn code_units(self) -> Option<u16> {
        match self {
            Format::Format10t
            | Format::Format10x
            | Format::Format11n
            | Format::Format11x
            | Format::Format12x => Some(1),
            Format::Format20bc
            | Format::Format20t
            | Format::Format21c
            | Format::Format21ih
            | Format::Format21lh
            | Format::Format21s
            | Format::Format21t
            | Format::Format22b
            | Format::Format22c
            | Format::Format22cs
            | Format::Format22s
            | Format::Format22t
            | Format::Format22x
            | Format::Format23x => Some(2),
            Format::Format30t
            | Format::Format31c
            | Format::Format31i
            | Format::Format31t
            | Format::Format32x
            | Format::Format35c
            | Format::Format3rc => Some(3),
            Format::Format45cc | Format::Format4rcc => Some(4),
            Format::Format51l => Some(5),
            Format::PackedSwitchPayload | Format::SparseSwitchPayload | Format::ArrayPayload => {
                None
            }
        }
    }

    /// Returns `true` for the variable sized payload formats.
    #[must_use]
    pub const fn is_payload(self) -> bool {
        self.code_units().is_none()
    }
}

macro_rules! define_opcodes {
    ($( $variant:ident = $value:literal, $name:literal, $format:ident, [$($flag:ident)|*]; )*) => {
        /// A Dalvik opcode.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
        pub enum Opcode {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )*
        }

        impl Opcode {
            /// The mnemonic as it appears in smali listings.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( Opcode::$variant => $name, )*
                }
            }

            /// Numeric opcode value.
            #[must_use]
            pub const fn value(self) -> u16 {
                match self {
                    $( Opcode::$variant => $value, )*
                }
            }

            /// Encoding format of this opcode.
            #[must_use]
            pub const fn format(self) -> Format {
                match self {
                    $( Opcode::$variant => Format::$format, )*
                }
            }

            /// Behavioral flags of this opcode.
            #[must_use]
            pub const fn flags(self) -> OpcodeFlags {
                match self {
                    $( Opcode::$variant => OpcodeFlags::empty()$(.union(OpcodeFlags::$flag))*, )*
                }
            }

            /// Looks up an opcode by its mnemonic.
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $name => Some(Opcode::$variant), )*
                    _ => None,
                }
            }

            /// Looks up an opcode by its numeric value.
            #[must_use]
            pub fn from_value(value: u16) -> Option<Self> {
                match value {
                    $( $value => Some(Opcode::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

define_opcodes! {
    Nop = 0x00, "nop", Format10x, [CAN_CONTINUE];
    Move = 0x01, "move", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    MoveFrom16 = 0x02, "move/from16", Format22x, [CAN_CONTINUE | SETS_REGISTER];
    Move16 = 0x03, "move/16", Format32x, [CAN_CONTINUE | SETS_REGISTER];
    MoveWide = 0x04, "move-wide", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    MoveWideFrom16 = 0x05, "move-wide/from16", Format22x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    MoveWide16 = 0x06, "move-wide/16", Format32x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    MoveObject = 0x07, "move-object", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    MoveObjectFrom16 = 0x08, "move-object/from16", Format22x, [CAN_CONTINUE | SETS_REGISTER];
    MoveObject16 = 0x09, "move-object/16", Format32x, [CAN_CONTINUE | SETS_REGISTER];
    MoveResult = 0x0a, "move-result", Format11x, [CAN_CONTINUE | SETS_REGISTER];
    MoveResultWide = 0x0b, "move-result-wide", Format11x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    MoveResultObject = 0x0c, "move-result-object", Format11x, [CAN_CONTINUE | SETS_REGISTER];
    MoveException = 0x0d, "move-exception", Format11x, [CAN_CONTINUE | SETS_REGISTER];
    ReturnVoid = 0x0e, "return-void", Format10x, [];
    Return = 0x0f, "return", Format11x, [];
    ReturnWide = 0x10, "return-wide", Format11x, [];
    ReturnObject = 0x11, "return-object", Format11x, [];
    Const4 = 0x12, "const/4", Format11n, [CAN_CONTINUE | SETS_REGISTER];
    Const16 = 0x13, "const/16", Format21s, [CAN_CONTINUE | SETS_REGISTER];
    Const = 0x14, "const", Format31i, [CAN_CONTINUE | SETS_REGISTER];
    ConstHigh16 = 0x15, "const/high16", Format21ih, [CAN_CONTINUE | SETS_REGISTER];
    ConstWide16 = 0x16, "const-wide/16", Format21s, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    ConstWide32 = 0x17, "const-wide/32", Format31i, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    ConstWide = 0x18, "const-wide", Format51l, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    ConstWideHigh16 = 0x19, "const-wide/high16", Format21lh, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    ConstString = 0x1a, "const-string", Format21c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    ConstStringJumbo = 0x1b, "const-string/jumbo", Format31c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    ConstClass = 0x1c, "const-class", Format21c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    MonitorEnter = 0x1d, "monitor-enter", Format11x, [CAN_THROW | CAN_CONTINUE];
    MonitorExit = 0x1e, "monitor-exit", Format11x, [CAN_THROW | CAN_CONTINUE];
    CheckCast = 0x1f, "check-cast", Format21c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    InstanceOf = 0x20, "instance-of", Format22c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    ArrayLength = 0x21, "array-length", Format12x, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    NewInstance = 0x22, "new-instance", Format21c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    NewArray = 0x23, "new-array", Format22c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    FilledNewArray = 0x24, "filled-new-array", Format35c, [CAN_THROW | CAN_CONTINUE | SETS_RESULT];
    FilledNewArrayRange = 0x25, "filled-new-array/range", Format3rc, [CAN_THROW | CAN_CONTINUE | SETS_RESULT];
    FillArrayData = 0x26, "fill-array-data", Format31t, [CAN_THROW | CAN_CONTINUE];
    Throw = 0x27, "throw", Format11x, [CAN_THROW];
    Goto = 0x28, "goto", Format10t, [];
    Goto16 = 0x29, "goto/16", Format20t, [];
    Goto32 = 0x2a, "goto/32", Format30t, [];
    PackedSwitch = 0x2b, "packed-switch", Format31t, [CAN_CONTINUE];
    SparseSwitch = 0x2c, "sparse-switch", Format31t, [CAN_CONTINUE];
    CmplFloat = 0x2d, "cmpl-float", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    CmpgFloat = 0x2e, "cmpg-float", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    CmplDouble = 0x2f, "cmpl-double", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    CmpgDouble = 0x30, "cmpg-double", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    CmpLong = 0x31, "cmp-long", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    IfEq = 0x32, "if-eq", Format22t, [CAN_CONTINUE];
    IfNe = 0x33, "if-ne", Format22t, [CAN_CONTINUE];
    IfLt = 0x34, "if-lt", Format22t, [CAN_CONTINUE];
    IfGe = 0x35, "if-ge", Format22t, [CAN_CONTINUE];
    IfGt = 0x36, "if-gt", Format22t, [CAN_CONTINUE];
    IfLe = 0x37, "if-le", Format22t, [CAN_CONTINUE];
    IfEqz = 0x38, "if-eqz", Format21t, [CAN_CONTINUE];
    IfNez = 0x39, "if-nez", Format21t, [CAN_CONTINUE];
    IfLtz = 0x3a, "if-ltz", Format21t, [CAN_CONTINUE];
    IfGez = 0x3b, "if-gez", Format21t, [CAN_CONTINUE];
    IfGtz = 0x3c, "if-gtz", Format21t, [CAN_CONTINUE];
    IfLez = 0x3d, "if-lez", Format21t, [CAN_CONTINUE];
    Aget = 0x44, "aget", Format23x, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    AgetWide = 0x45, "aget-wide", Format23x, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    AgetObject = 0x46, "aget-object", Format23x, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    AgetBoolean = 0x47, "aget-boolean", Format23x, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    AgetByte = 0x48, "aget-byte", Format23x, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    AgetChar = 0x49, "aget-char", Format23x, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    AgetShort = 0x4a, "aget-short", Format23x, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    Aput = 0x4b, "aput", Format23x, [CAN_THROW | CAN_CONTINUE];
    AputWide = 0x4c, "aput-wide", Format23x, [CAN_THROW | CAN_CONTINUE];
    AputObject = 0x4d, "aput-object", Format23x, [CAN_THROW | CAN_CONTINUE];
    AputBoolean = 0x4e, "aput-boolean", Format23x, [CAN_THROW | CAN_CONTINUE];
    AputByte = 0x4f, "aput-byte", Format23x, [CAN_THROW | CAN_CONTINUE];
    AputChar = 0x50, "aput-char", Format23x, [CAN_THROW | CAN_CONTINUE];
    AputShort = 0x51, "aput-short", Format23x, [CAN_THROW | CAN_CONTINUE];
    Iget = 0x52, "iget", Format22c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    IgetWide = 0x53, "iget-wide", Format22c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    IgetObject = 0x54, "iget-object", Format22c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    IgetBoolean = 0x55, "iget-boolean", Format22c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    IgetByte = 0x56, "iget-byte", Format22c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    IgetChar = 0x57, "iget-char", Format22c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    IgetShort = 0x58, "iget-short", Format22c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    Iput = 0x59, "iput", Format22c, [CAN_THROW | CAN_CONTINUE];
    IputWide = 0x5a, "iput-wide", Format22c, [CAN_THROW | CAN_CONTINUE];
    IputObject = 0x5b, "iput-object", Format22c, [CAN_THROW | CAN_CONTINUE];
    IputBoolean = 0x5c, "iput-boolean", Format22c, [CAN_THROW | CAN_CONTINUE];
    IputByte = 0x5d, "iput-byte", Format22c, [CAN_THROW | CAN_CONTINUE];
    IputChar = 0x5e, "iput-char", Format22c, [CAN_THROW | CAN_CONTINUE];
    IputShort = 0x5f, "iput-short", Format22c, [CAN_THROW | CAN_CONTINUE];
    Sget = 0x60, "sget", Format21c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    SgetWide = 0x61, "sget-wide", Format21c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    SgetObject = 0x62, "sget-object", Format21c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    SgetBoolean = 0x63, "sget-boolean", Format21c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    SgetByte = 0x64, "sget-byte", Format21c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    SgetChar = 0x65, "sget-char", Format21c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    SgetShort = 0x66, "sget-short", Format21c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    Sput = 0x67, "sput", Format21c, [CAN_THROW | CAN_CONTINUE];
    SputWide = 0x68, "sput-wide", Format21c, [CAN_THROW | CAN_CONTINUE];
    SputObject = 0x69, "sput-object", Format21c, [CAN_THROW | CAN_CONTINUE];
    SputBoolean = 0x6a, "sput-boolean", Format21c, [CAN_THROW | CAN_CONTINUE];
    SputByte = 0x6b, "sput-byte", Format21c, [CAN_THROW | CAN_CONTINUE];
    SputChar = 0x6c, "sput-char", Format21c, [CAN_THROW | CAN_CONTINUE];
    SputShort = 0x6d, "sput-short", Format21c, [CAN_THROW | CAN_CONTINUE];
    InvokeVirtual = 0x6e, "invoke-virtual", Format35c, [CAN_THROW | CAN_CONTINUE | SETS_RESULT];
    InvokeSuper = 0x6f, "invoke-super", Format35c, [CAN_THROW | CAN_CONTINUE | SETS_RESULT];
    InvokeDirect = 0x70, "invoke-direct", Format35c, [CAN_THROW | CAN_CONTINUE | SETS_RESULT];
    InvokeStatic = 0x71, "invoke-static", Format35c, [CAN_THROW | CAN_CONTINUE | SETS_RESULT];
    InvokeInterface = 0x72, "invoke-interface", Format35c, [CAN_THROW | CAN_CONTINUE | SETS_RESULT];
    InvokeVirtualRange = 0x74, "invoke-virtual/range", Format3rc, [CAN_THROW | CAN_CONTINUE | SETS_RESULT];
    InvokeSuperRange = 0x75, "invoke-super/range", Format3rc, [CAN_THROW | CAN_CONTINUE | SETS_RESULT];
    InvokeDirectRange = 0x76, "invoke-direct/range", Format3rc, [CAN_THROW | CAN_CONTINUE | SETS_RESULT];
    InvokeStaticRange = 0x77, "invoke-static/range", Format3rc, [CAN_THROW | CAN_CONTINUE | SETS_RESULT];
    InvokeInterfaceRange = 0x78, "invoke-interface/range", Format3rc, [CAN_THROW | CAN_CONTINUE | SETS_RESULT];
    NegInt = 0x7b, "neg-int", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    NotInt = 0x7c, "not-int", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    NegLong = 0x7d, "neg-long", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    NotLong = 0x7e, "not-long", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    NegFloat = 0x7f, "neg-float", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    NegDouble = 0x80, "neg-double", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    IntToLong = 0x81, "int-to-long", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    IntToFloat = 0x82, "int-to-float", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    IntToDouble = 0x83, "int-to-double", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    LongToInt = 0x84, "long-to-int", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    LongToFloat = 0x85, "long-to-float", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    LongToDouble = 0x86, "long-to-double", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    FloatToInt = 0x87, "float-to-int", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    FloatToLong = 0x88, "float-to-long", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    FloatToDouble = 0x89, "float-to-double", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    DoubleToInt = 0x8a, "double-to-int", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    DoubleToLong = 0x8b, "double-to-long", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    DoubleToFloat = 0x8c, "double-to-float", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    IntToByte = 0x8d, "int-to-byte", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    IntToChar = 0x8e, "int-to-char", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    IntToShort = 0x8f, "int-to-short", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    AddInt = 0x90, "add-int", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    SubInt = 0x91, "sub-int", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    MulInt = 0x92, "mul-int", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    DivInt = 0x93, "div-int", Format23x, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    RemInt = 0x94, "rem-int", Format23x, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    AndInt = 0x95, "and-int", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    OrInt = 0x96, "or-int", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    XorInt = 0x97, "xor-int", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    ShlInt = 0x98, "shl-int", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    ShrInt = 0x99, "shr-int", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    UshrInt = 0x9a, "ushr-int", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    AddLong = 0x9b, "add-long", Format23x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    SubLong = 0x9c, "sub-long", Format23x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    MulLong = 0x9d, "mul-long", Format23x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    DivLong = 0x9e, "div-long", Format23x, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    RemLong = 0x9f, "rem-long", Format23x, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    AndLong = 0xa0, "and-long", Format23x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    OrLong = 0xa1, "or-long", Format23x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    XorLong = 0xa2, "xor-long", Format23x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    ShlLong = 0xa3, "shl-long", Format23x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    ShrLong = 0xa4, "shr-long", Format23x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    UshrLong = 0xa5, "ushr-long", Format23x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    AddFloat = 0xa6, "add-float", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    SubFloat = 0xa7, "sub-float", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    MulFloat = 0xa8, "mul-float", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    DivFloat = 0xa9, "div-float", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    RemFloat = 0xaa, "rem-float", Format23x, [CAN_CONTINUE | SETS_REGISTER];
    AddDouble = 0xab, "add-double", Format23x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    SubDouble = 0xac, "sub-double", Format23x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    MulDouble = 0xad, "mul-double", Format23x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    DivDouble = 0xae, "div-double", Format23x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    RemDouble = 0xaf, "rem-double", Format23x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    AddInt2Addr = 0xb0, "add-int/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    SubInt2Addr = 0xb1, "sub-int/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    MulInt2Addr = 0xb2, "mul-int/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    DivInt2Addr = 0xb3, "div-int/2addr", Format12x, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    RemInt2Addr = 0xb4, "rem-int/2addr", Format12x, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    AndInt2Addr = 0xb5, "and-int/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    OrInt2Addr = 0xb6, "or-int/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    XorInt2Addr = 0xb7, "xor-int/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    ShlInt2Addr = 0xb8, "shl-int/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    ShrInt2Addr = 0xb9, "shr-int/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    UshrInt2Addr = 0xba, "ushr-int/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    AddLong2Addr = 0xbb, "add-long/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    SubLong2Addr = 0xbc, "sub-long/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    MulLong2Addr = 0xbd, "mul-long/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    DivLong2Addr = 0xbe, "div-long/2addr", Format12x, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    RemLong2Addr = 0xbf, "rem-long/2addr", Format12x, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    AndLong2Addr = 0xc0, "and-long/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    OrLong2Addr = 0xc1, "or-long/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    XorLong2Addr = 0xc2, "xor-long/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    ShlLong2Addr = 0xc3, "shl-long/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    ShrLong2Addr = 0xc4, "shr-long/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    UshrLong2Addr = 0xc5, "ushr-long/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    AddFloat2Addr = 0xc6, "add-float/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    SubFloat2Addr = 0xc7, "sub-float/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    MulFloat2Addr = 0xc8, "mul-float/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    DivFloat2Addr = 0xc9, "div-float/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    RemFloat2Addr = 0xca, "rem-float/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER];
    AddDouble2Addr = 0xcb, "add-double/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    SubDouble2Addr = 0xcc, "sub-double/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    MulDouble2Addr = 0xcd, "mul-double/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    DivDouble2Addr = 0xce, "div-double/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    RemDouble2Addr = 0xcf, "rem-double/2addr", Format12x, [CAN_CONTINUE | SETS_REGISTER | SETS_WIDE_REGISTER];
    AddIntLit16 = 0xd0, "add-int/lit16", Format22s, [CAN_CONTINUE | SETS_REGISTER];
    RsubInt = 0xd1, "rsub-int", Format22s, [CAN_CONTINUE | SETS_REGISTER];
    MulIntLit16 = 0xd2, "mul-int/lit16", Format22s, [CAN_CONTINUE | SETS_REGISTER];
    DivIntLit16 = 0xd3, "div-int/lit16", Format22s, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    RemIntLit16 = 0xd4, "rem-int/lit16", Format22s, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    AndIntLit16 = 0xd5, "and-int/lit16", Format22s, [CAN_CONTINUE | SETS_REGISTER];
    OrIntLit16 = 0xd6, "or-int/lit16", Format22s, [CAN_CONTINUE | SETS_REGISTER];
    XorIntLit16 = 0xd7, "xor-int/lit16", Format22s, [CAN_CONTINUE | SETS_REGISTER];
    AddIntLit8 = 0xd8, "add-int/lit8", Format22b, [CAN_CONTINUE | SETS_REGISTER];
    RsubIntLit8 = 0xd9, "rsub-int/lit8", Format22b, [CAN_CONTINUE | SETS_REGISTER];
    MulIntLit8 = 0xda, "mul-int/lit8", Format22b, [CAN_CONTINUE | SETS_REGISTER];
    DivIntLit8 = 0xdb, "div-int/lit8", Format22b, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    RemIntLit8 = 0xdc, "rem-int/lit8", Format22b, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    AndIntLit8 = 0xdd, "and-int/lit8", Format22b, [CAN_CONTINUE | SETS_REGISTER];
    OrIntLit8 = 0xde, "or-int/lit8", Format22b, [CAN_CONTINUE | SETS_REGISTER];
    XorIntLit8 = 0xdf, "xor-int/lit8", Format22b, [CAN_CONTINUE | SETS_REGISTER];
    ShlIntLit8 = 0xe0, "shl-int/lit8", Format22b, [CAN_CONTINUE | SETS_REGISTER];
    ShrIntLit8 = 0xe1, "shr-int/lit8", Format22b, [CAN_CONTINUE | SETS_REGISTER];
    UshrIntLit8 = 0xe2, "ushr-int/lit8", Format22b, [CAN_CONTINUE | SETS_REGISTER];
    InvokePolymorphic = 0xfa, "invoke-polymorphic", Format45cc, [CAN_THROW | CAN_CONTINUE | SETS_RESULT];
    InvokePolymorphicRange = 0xfb, "invoke-polymorphic/range", Format4rcc, [CAN_THROW | CAN_CONTINUE | SETS_RESULT];
    InvokeCustom = 0xfc, "invoke-custom", Format35c, [CAN_THROW | CAN_CONTINUE | SETS_RESULT];
    InvokeCustomRange = 0xfd, "invoke-custom/range", Format3rc, [CAN_THROW | CAN_CONTINUE | SETS_RESULT];
    ConstMethodHandle = 0xfe, "const-method-handle", Format21c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    ConstMethodType = 0xff, "const-method-type", Format21c, [CAN_THROW | CAN_CONTINUE | SETS_REGISTER];
    PackedSwitchPayload = 0x100, "packed-switch-payload", PackedSwitchPayload, [];
    SparseSwitchPayload = 0x200, "sparse-switch-payload", SparseSwitchPayload, [];
    ArrayPayload = 0x300, "array-payload", ArrayPayload, [];
}

impl Opcode {
    /// Returns `true` if execution may fall through to the next instruction.
    #[must_use]
    pub const fn can_continue(self) -> bool {
        self.flags().contains(OpcodeFlags::CAN_CONTINUE)
    }

    /// Returns `true` if the instruction may throw.
    #[must_use]
    pub const fn can_throw(self) -> bool {
        self.flags().contains(OpcodeFlags::CAN_THROW)
    }

    /// Returns `true` if the instruction writes a register.
    #[must_use]
    pub const fn sets_register(self) -> bool {
        self.flags().contains(OpcodeFlags::SETS_REGISTER)
    }

    /// Returns `true` if the instruction writes a register pair.
    #[must_use]
    pub const fn sets_wide_register(self) -> bool {
        self.flags().contains(OpcodeFlags::SETS_WIDE_REGISTER)
    }

    /// Returns `true` for the non-executable payload pseudo-instructions.
    #[must_use]
    pub const fn is_payload(self) -> bool {
        self.format().is_payload()
    }

    /// Returns `true` for packed and sparse switch payloads.
    #[must_use]
    pub const fn is_switch_payload(self) -> bool {
        matches!(self, Opcode::PackedSwitchPayload | Opcode::SparseSwitchPayload)
    }

    /// Returns `true` for `packed-switch` and `sparse-switch`.
    #[must_use]
    pub const fn is_switch(self) -> bool {
        matches!(self, Opcode::PackedSwitch | Opcode::SparseSwitch)
    }

    /// Returns `true` for the conditional branches `if-*` and `if-*z`.
    #[must_use]
    pub const fn is_conditional_branch(self) -> bool {
        matches!(self.format(), Format::Format22t | Format::Format21t)
    }

    /// Returns `true` for `goto`, `goto/16` and `goto/32`.
    #[must_use]
    pub const fn is_goto(self) -> bool {
        matches!(self, Opcode::Goto | Opcode::Goto16 | Opcode::Goto32)
    }

    /// Returns `true` for the `return*` family.
    #[must_use]
    pub const fn is_return(self) -> bool {
        matches!(
            self,
            Opcode::ReturnVoid | Opcode::Return | Opcode::ReturnWide | Opcode::ReturnObject
        )
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn test_names_and_values_are_unique() {
        let mut names = HashSet::new();
        let mut values = HashSet::new();
        for op in Opcode::iter() {
            assert!(names.insert(op.name()), "duplicate name {}", op.name());
            assert!(values.insert(op.value()), "duplicate value {:#x}", op.value());
        }
        assert_eq!(names.len(), Opcode::COUNT);
    }

    #[test]
    fn test_lookup_round_trips() {
        for op in Opcode::iter() {
            assert_eq!(Opcode::from_name(op.name()), Some(op));
            assert_eq!(Opcode::from_value(op.value()), Some(op));
        }
        assert_eq!(Opcode::from_name("not-an-opcode"), None);
        assert_eq!(Opcode::from_value(0x3e), None);
    }

    #[test]
    fn test_widths() {
        assert_eq!(Opcode::Nop.format().code_units(), Some(1));
        assert_eq!(Opcode::IfEq.format().code_units(), Some(2));
        assert_eq!(Opcode::PackedSwitch.format().code_units(), Some(3));
        assert_eq!(Opcode::InvokePolymorphic.format().code_units(), Some(4));
        assert_eq!(Opcode::ConstWide.format().code_units(), Some(5));
        assert_eq!(Opcode::ArrayPayload.format().code_units(), None);
    }

    #[test]
    fn test_control_flow_flags() {
        assert!(!Opcode::Goto.can_continue());
        assert!(!Opcode::ReturnVoid.can_continue());
        assert!(!Opcode::Throw.can_continue());
        assert!(Opcode::Throw.can_throw());
        assert!(!Opcode::PackedSwitchPayload.can_continue());
        assert!(Opcode::IfEqz.can_continue());
        assert!(Opcode::PackedSwitch.can_continue());
        assert!(Opcode::CmpLong.sets_register());
        assert!(Opcode::ConstWide16.sets_wide_register());
    }

    #[test]
    fn test_classification() {
        assert!(Opcode::IfLe.is_conditional_branch());
        assert!(Opcode::IfGtz.is_conditional_branch());
        assert!(!Opcode::Goto.is_conditional_branch());
        assert!(Opcode::Goto32.is_goto());
        assert!(Opcode::ReturnObject.is_return());
        assert!(Opcode::SparseSwitch.is_switch());
        assert!(Opcode::SparseSwitchPayload.is_switch_payload());
        assert!(Opcode::ArrayPayload.is_payload());
        assert!(!Opcode::ArrayPayload.is_switch_payload());
    }

    #[test]
    fn test_display_uses_mnemonic() {
        assert_eq!(Opcode::CmpgDouble.to_string(), "cmpg-double");
    }
}
