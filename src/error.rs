use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors fall into two groups. Structural violations of the input instruction stream are
/// reported while building a [`MethodGraph`](crate::analysis::MethodGraph) and abort the build,
/// no partial graph is ever returned. Violations of the execution contract are reported by
/// [`Op::execute`](crate::emulation::Op::execute) through [`ExecutionError`] and abort that
/// single call.
///
/// Unknown values are never errors. They flow through execution as ordinary data.
///
/// # Error Categories
///
/// ## Structural Errors
/// - [`Error::Empty`] - An empty instruction list was provided
/// - [`Error::Malformed`] - Broken location indices or other inconsistent input
/// - [`Error::UnresolvedTarget`] - A branch or switch case points at no instruction
///
/// ## Execution Errors
/// - [`Error::Execution`] - A contract violation while executing an opcode
/// - [`Error::UnsupportedOpcode`] - No opcode family is registered for an opcode
/// - [`Error::MissingOp`] - No op exists for the address of a visited node
///
/// # Examples
///
/// ```rust
/// use dexscope::{analysis::GraphBuilder, Error};
///
/// match GraphBuilder::new().build(&[]) {
///     Err(Error::Empty) => println!("nothing to build"),
///     Err(e) => println!("other error: {e}"),
///     Ok(graph) => println!("{} nodes", graph.node_count()),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Provided input was empty.
    ///
    /// The graph builder requires at least one instruction, the root node is always
    /// the instruction at location index 0.
    #[error("Provided input was empty")]
    Empty,

    /// The instruction stream is damaged and could not be processed.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A branch or switch case resolved to a code-unit offset without an instruction.
    ///
    /// This is a structural contract violation of the input, the offset either points
    /// outside the method or into the middle of another instruction.
    #[error("Unresolved {kind} target at offset {target} (from instruction at {source_address:#06x})")]
    UnresolvedTarget {
        /// Kind of reference that could not be resolved (`branch` or `switch case`)
        kind: &'static str,
        /// Address of the instruction holding the reference
        source_address: u32,
        /// The computed target offset in code units
        target: i64,
    },

    /// No opcode family has been registered for this opcode.
    #[error("No op implementation registered for '{0}'")]
    UnsupportedOpcode(&'static str),

    /// No op exists for the given code-unit address.
    #[error("No op found for address {0:#06x}")]
    MissingOp(u32),

    /// An opcode violated the execution contract.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Errors that can occur while executing a single opcode against a
/// [`MethodState`](crate::emulation::MethodState).
///
/// None of these are expected on verified bytecode. They indicate either a broken
/// upstream value propagation or a driver that does not honor the state contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    /// A register was read before anything was assigned to it.
    #[error("register v{register} read before assignment")]
    UnassignedRegister {
        /// The register index.
        register: u16,
    },

    /// A register index exceeded the register count of the method.
    #[error("register v{register} out of bounds (count: {count})")]
    RegisterOutOfBounds {
        /// The register index.
        register: u16,
        /// Number of registers available.
        count: u16,
    },

    /// Operand values broke a type guarantee the verifier provides.
    #[error("invariant violated in {operation}: {message}")]
    InvariantViolation {
        /// The opcode being executed.
        operation: &'static str,
        /// Description of the violation.
        message: String,
    },

    /// An instruction does not carry the operand shape its opcode requires.
    #[error("invalid operand for {instruction}: expected {expected}")]
    InvalidOperand {
        /// Instruction mnemonic.
        instruction: &'static str,
        /// Description of what was expected.
        expected: &'static str,
    },
}
