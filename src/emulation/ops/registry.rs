//! Opcode name to op family dispatch.
//!
//! The [`OpRegistry`] maps opcode mnemonics to [`OpConstructor`]s. Building a method's
//! ops produces an [`OpTable`] keyed by instruction address, which is what drivers and
//! [`step`](crate::emulation::step) consult.

use rustc_hash::FxHashMap;

use crate::{
    analysis::{MethodGraph, Node},
    disassembler::Opcode,
    emulation::ops::{CmpOp, ConstOp, FlowOp, IfOp, MoveOp, Op, SwitchOp},
    Error, Result,
};

/// Builds the op for one node. Constructors reject nodes whose opcode they do not handle.
pub type OpConstructor = fn(&MethodGraph, &Node) -> Result<Box<dyn Op>>;

/// Registry of opcode families.
///
/// # Examples
///
/// ```rust
/// use dexscope::{
///     analysis::GraphBuilder,
///     disassembler::{Instruction, Opcode},
///     emulation::OpRegistry,
/// };
///
/// let graph = GraphBuilder::new().build(&[
///     Instruction::new(Opcode::Const4, 0).with_registers(&[0]).with_literal(1),
///     Instruction::new(Opcode::Return, 1).with_registers(&[0]),
/// ])?;
///
/// let ops = OpRegistry::new().build(&graph)?;
/// assert_eq!(ops.len(), 2);
/// assert_eq!(ops.get(1).map(|op| op.name()), Some("return"));
/// # Ok::<(), dexscope::Error>(())
/// ```
#[derive(Clone)]
pub struct OpRegistry {
    constructors: FxHashMap<&'static str, OpConstructor>,
}

impl Default for OpRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OpRegistry {
    /// Creates a registry with all built-in families registered.
    ///
    /// # Returns
    ///
    /// A registry covering comparisons, conditional branches, switches, moves, numeric
    /// constants and unconditional flow.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        let families: [(&[Opcode], OpConstructor); 6] = [
            (
                &[
                    Opcode::CmplFloat,
                    Opcode::CmpgFloat,
                    Opcode::CmplDouble,
                    Opcode::CmpgDouble,
                    Opcode::CmpLong,
                ],
                CmpOp::create,
            ),
            (
                &[
                    Opcode::IfEq,
                    Opcode::IfNe,
                    Opcode::IfLt,
                    Opcode::IfGe,
                    Opcode::IfGt,
                    Opcode::IfLe,
                    Opcode::IfEqz,
                    Opcode::IfNez,
                    Opcode::IfLtz,
                    Opcode::IfGez,
                    Opcode::IfGtz,
                    Opcode::IfLez,
                ],
                IfOp::create,
            ),
            (&[Opcode::PackedSwitch, Opcode::SparseSwitch], SwitchOp::create),
            (
                &[
                    Opcode::Move,
                    Opcode::MoveFrom16,
                    Opcode::Move16,
                    Opcode::MoveWide,
                    Opcode::MoveWideFrom16,
                    Opcode::MoveWide16,
                    Opcode::MoveObject,
                    Opcode::MoveObjectFrom16,
                    Opcode::MoveObject16,
                ],
                MoveOp::create,
            ),
            (
                &[
                    Opcode::Const4,
                    Opcode::Const16,
                    Opcode::Const,
                    Opcode::ConstHigh16,
                    Opcode::ConstWide16,
                    Opcode::ConstWide32,
                    Opcode::ConstWide,
                    Opcode::ConstWideHigh16,
                ],
                ConstOp::create,
            ),
            (
                &[
                    Opcode::Nop,
                    Opcode::Goto,
                    Opcode::Goto16,
                    Opcode::Goto32,
                    Opcode::ReturnVoid,
                    Opcode::Return,
                    Opcode::ReturnWide,
                    Opcode::ReturnObject,
                    Opcode::Throw,
                ],
                FlowOp::create,
            ),
        ];

        for (opcodes, constructor) in families {
            for &opcode in opcodes {
                registry.register(opcode, constructor);
            }
        }
        registry
    }

    /// Creates a registry without any families.
    #[must_use]
    pub fn empty() -> Self {
        OpRegistry {
            constructors: FxHashMap::default(),
        }
    }

    /// Registers a constructor for an opcode, replacing any previous one.
    ///
    /// # Arguments
    ///
    /// * `opcode` - The opcode to handle
    /// * `constructor` - Builds the op for nodes of that opcode
    pub fn register(&mut self, opcode: Opcode, constructor: OpConstructor) {
        self.constructors.insert(opcode.name(), constructor);
    }

    /// Returns `true` if a family is registered for `opcode`.
    #[must_use]
    pub fn contains(&self, opcode: Opcode) -> bool {
        self.constructors.contains_key(opcode.name())
    }

    /// Number of registered opcodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Builds the op for a single node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedOpcode`] if no family is registered for the node's opcode,
    /// or whatever error the family constructor reports.
    pub fn create(&self, graph: &MethodGraph, node: &Node) -> Result<Box<dyn Op>> {
        let name = node.opcode().name();
        let constructor = self
            .constructors
            .get(name)
            .ok_or(Error::UnsupportedOpcode(name))?;
        constructor(graph, node)
    }

    /// Builds the ops for every executable node of a graph.
    ///
    /// Payload nodes are skipped, they are data and never executed.
    ///
    /// # Errors
    ///
    /// Fails on the first node that [`create`](Self::create) rejects.
    pub fn build(&self, graph: &MethodGraph) -> Result<OpTable> {
        let mut ops = FxHashMap::default();
        for node in graph.nodes().iter().filter(|node| !node.is_payload()) {
            ops.insert(node.address(), self.create(graph, node)?);
        }
        Ok(OpTable { ops })
    }
}

/// Ops of one method, keyed by instruction address.
#[derive(Debug, Default)]
pub struct OpTable {
    ops: FxHashMap<u32, Box<dyn Op>>,
}

impl OpTable {
    /// The op at `address`.
    #[must_use]
    pub fn get(&self, address: u32) -> Option<&dyn Op> {
        self.ops.get(&address).map(|op| &**op)
    }

    /// Inserts or replaces the op at its address.
    pub fn insert(&mut self, op: Box<dyn Op>) {
        self.ops.insert(op.address(), op);
    }

    /// Number of ops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` if the table holds no ops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Ops in ascending address order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Op> + '_ {
        let mut addresses: Vec<u32> = self.ops.keys().copied().collect();
        addresses.sort_unstable();
        addresses.into_iter().filter_map(move |address| self.get(address))
    }
}
