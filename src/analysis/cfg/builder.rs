//! Construction of [`MethodGraph`]s from decoded instruction streams.

use rustc_hash::FxHashMap;

use crate::{
    analysis::cfg::{
        config::GraphConfig,
        edge::{Edge, EdgeKind},
        graph::MethodGraph,
        node::Node,
    },
    diagnostics::{Diagnostic, DiagnosticSink, LogSink, Severity},
    disassembler::{Instruction, Opcode},
    utils::graph::NodeId,
    Error, Result,
};

/// Turns a linear instruction list into a rooted [`MethodGraph`].
///
/// Relative branch offsets, switch payloads and fallthrough are resolved against the
/// running code-unit offset of each instruction:
///
/// - A branch offset resolves to a single [`EdgeKind::Branch`] edge.
/// - A switch resolves its payload and adds one [`EdgeKind::SwitchCase`] edge per payload
///   element. Element offsets are relative to the switch instruction.
/// - A `fill-array-data` reference is data, it adds no edge.
/// - An instruction that can continue gets a [`EdgeKind::Fallthrough`] edge to the next
///   instruction, unless that instruction is a payload.
///
/// The builder is stateless between calls. Building the same input twice yields identical
/// graphs.
///
/// # Examples
///
/// ```rust
/// use dexscope::analysis::{EdgeKind, GraphBuilder};
/// use dexscope::diagnostics::NullSink;
/// use dexscope::disassembler::{Instruction, Opcode};
///
/// let instructions = vec![
///     Instruction::new(Opcode::PackedSwitch, 0).with_registers(&[0]).with_offset(5),
///     Instruction::new(Opcode::ReturnVoid, 1),
///     Instruction::new(Opcode::ReturnVoid, 2),
///     Instruction::packed_switch_payload(3, 0, &[3, 4]),
/// ];
///
/// let graph = GraphBuilder::new().with_sink(&NullSink).build(&instructions)?;
/// let kinds: Vec<EdgeKind> = graph.nodes()[0].edges().iter().map(|e| e.kind()).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         EdgeKind::SwitchCase { key: 0 },
///         EdgeKind::SwitchCase { key: 1 },
///         EdgeKind::Fallthrough,
///     ]
/// );
/// # Ok::<(), dexscope::Error>(())
/// ```
#[derive(Clone)]
pub struct GraphBuilder<'a> {
    config: GraphConfig,
    sink: &'a dyn DiagnosticSink,
}

impl GraphBuilder<'static> {
    /// Creates a builder with the default configuration that reports through [`LogSink`].
    #[must_use]
    pub fn new() -> Self {
        GraphBuilder {
            config: GraphConfig::default(),
            sink: &LogSink,
        }
    }
}

impl Default for GraphBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> GraphBuilder<'a> {
    /// Routes diagnostics to `sink` instead of the current one.
    #[must_use]
    pub fn with_sink<'b>(self, sink: &'b dyn DiagnosticSink) -> GraphBuilder<'b>
    where
        'a: 'b,
    {
        GraphBuilder {
            config: self.config,
            sink,
        }
    }

    /// Uses `config` for subsequent builds.
    #[must_use]
    pub fn with_config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Builds the graph for one method body.
    ///
    /// # Arguments
    ///
    /// * `instructions` - The decoded instructions in code order. Location indices must be
    ///   exactly `0..instructions.len()`, in any order.
    ///
    /// # Errors
    ///
    /// - [`Error::Empty`] if `instructions` is empty
    /// - [`Error::Malformed`] for broken location indices, zero-width instructions, or a
    ///   reference whose target is the wrong kind of instruction
    /// - [`Error::UnresolvedTarget`] if a branch or switch case offset does not land on the
    ///   start of an instruction
    ///
    /// No partial graph is returned on error.
    pub fn build(&self, instructions: &[Instruction]) -> Result<MethodGraph> {
        if instructions.is_empty() {
            return Err(Error::Empty);
        }

        self.report(
            Severity::Debug,
            None,
            format!("building method graph from {} instructions", instructions.len()),
        );

        let positions = Self::location_positions(instructions)?;

        let mut addresses = Vec::with_capacity(instructions.len());
        let mut offsets: FxHashMap<u32, usize> = FxHashMap::default();
        let mut offset: u32 = 0;
        for (position, instruction) in instructions.iter().enumerate() {
            if instruction.code_units == 0 {
                return Err(malformed_error!(
                    "Instruction {} at location {} has zero width",
                    instruction.opcode,
                    instruction.location
                ));
            }
            addresses.push(offset);
            offsets.insert(offset, position);
            offset = offset
                .checked_add(u32::from(instruction.code_units))
                .ok_or_else(|| malformed_error!("Method body exceeds the addressable range"))?;
        }

        let mut edges: Vec<Vec<Edge>> = vec![Vec::new(); instructions.len()];
        for (position, instruction) in instructions.iter().enumerate() {
            let address = addresses[position];
            let list = &mut edges[instruction.location];

            if let Some(relative) = instruction.branch_offset() {
                let target = &instructions[Self::resolve(&offsets, "branch", address, relative)?];
                self.add_reference_edges(instructions, &offsets, instruction, address, target, list)?;
            }

            if instruction.opcode.can_continue() {
                if let Some(next) = instructions.get(position + 1) {
                    if next.opcode.is_payload() {
                        self.report(
                            Severity::Warning,
                            Some(address),
                            format!(
                                "{} falls through into {}, edge dropped",
                                instruction.opcode, next.opcode
                            ),
                        );
                    } else {
                        list.push(Edge::new(NodeId::new(next.location), EdgeKind::Fallthrough));
                    }
                }
            }
        }

        let nodes = edges
            .into_iter()
            .zip(positions)
            .enumerate()
            .map(|(location, (edges, position))| {
                Node::new(
                    NodeId::new(location),
                    addresses[position],
                    instructions[position].clone(),
                    edges,
                )
            })
            .collect();

        Ok(MethodGraph::new(nodes, NodeId::new(0)))
    }

    /// Maps every location index to the position of its instruction in the input.
    fn location_positions(instructions: &[Instruction]) -> Result<Vec<usize>> {
        let count = instructions.len();
        let mut slots: Vec<Option<usize>> = vec![None; count];

        for (position, instruction) in instructions.iter().enumerate() {
            let location = instruction.location;
            let Some(slot) = slots.get_mut(location) else {
                return Err(malformed_error!(
                    "Location index {} out of range for {} instructions",
                    location,
                    count
                ));
            };
            if slot.is_some() {
                return Err(malformed_error!("Duplicate location index {}", location));
            }
            *slot = Some(position);
        }

        // n distinct indices below n cover every slot
        slots
            .into_iter()
            .enumerate()
            .map(|(location, slot)| {
                slot.ok_or_else(|| malformed_error!("Missing location index {}", location))
            })
            .collect()
    }

    fn resolve(
        offsets: &FxHashMap<u32, usize>,
        kind: &'static str,
        source: u32,
        relative: i32,
    ) -> Result<usize> {
        let target = i64::from(source) + i64::from(relative);
        u32::try_from(target)
            .ok()
            .and_then(|t| offsets.get(&t).copied())
            .ok_or(Error::UnresolvedTarget {
                kind,
                source_address: source,
                target,
            })
    }

    /// Adds the edges implied by an instruction that references `target` through its offset.
    fn add_reference_edges(
        &self,
        instructions: &[Instruction],
        offsets: &FxHashMap<u32, usize>,
        instruction: &Instruction,
        address: u32,
        target: &Instruction,
        list: &mut Vec<Edge>,
    ) -> Result<()> {
        match (instruction.opcode, target.opcode) {
            (op @ Opcode::PackedSwitch, payload @ Opcode::PackedSwitchPayload)
            | (op @ Opcode::SparseSwitch, payload @ Opcode::SparseSwitchPayload) => {
                let elements = target.switch_elements().unwrap_or(&[]);
                self.report(
                    Severity::Debug,
                    Some(address),
                    format!("{op} resolved {payload} with {} cases", elements.len()),
                );

                for element in elements {
                    let case_position =
                        Self::resolve(offsets, "switch case", address, element.offset)?;
                    let case_target = &instructions[case_position];
                    if case_target.opcode.is_payload() {
                        return Err(malformed_error!(
                            "Switch case {} at {:#06x} targets {}",
                            element.key,
                            address,
                            case_target.opcode
                        ));
                    }

                    let target_id = NodeId::new(case_target.location);
                    if self.config.deduplicate_switch_targets
                        && list
                            .iter()
                            .any(|e| e.kind().is_switch_case() && e.target() == target_id)
                    {
                        continue;
                    }
                    list.push(Edge::new(target_id, EdgeKind::SwitchCase { key: element.key }));
                }
                Ok(())
            }
            (Opcode::FillArrayData, Opcode::ArrayPayload) => {
                self.report(
                    Severity::Debug,
                    Some(address),
                    format!("fill-array-data references data at location {}", target.location),
                );
                Ok(())
            }
            (op, payload) if op.is_switch() || op == Opcode::FillArrayData || payload.is_payload() => {
                Err(malformed_error!(
                    "{} at {:#06x} cannot reference {}",
                    op,
                    address,
                    payload
                ))
            }
            _ => {
                list.push(Edge::new(NodeId::new(target.location), EdgeKind::Branch));
                Ok(())
            }
        }
    }

    fn report(&self, severity: Severity, address: Option<u32>, message: String) {
        let diagnostic = Diagnostic::new(severity, message);
        self.sink.report(match address {
            Some(address) => diagnostic.at(address),
            None => diagnostic,
        });
    }
}
