//! Control flow graph construction for Dalvik method bodies.
//!
//! A [`MethodGraph`] has one node per instruction. This instruction granularity is what the
//! abstract execution layer needs: every node maps to exactly one
//! [`Op`](crate::emulation::Op), and the executed next addresses of that op are matched
//! against the static children of the node.
//!
//! # Key Components
//!
//! - [`GraphBuilder`] - Resolves branches, switch tables and fallthrough into edges
//! - [`GraphConfig`] - Construction settings
//! - [`MethodGraph`] - Arena of [`Node`]s with derived predecessor and address indices
//! - [`Edge`] / [`EdgeKind`] - Typed outgoing edges
//!
//! # Payloads
//!
//! Switch and array payloads are data blocks embedded in the instruction stream. They get
//! a node so their address stays resolvable, but no edge ever targets them and they have no
//! outgoing edges. A fallthrough that would enter a payload is dropped and reported as a
//! warning through the builder's [`DiagnosticSink`](crate::diagnostics::DiagnosticSink).
//!
//! # Thread Safety
//!
//! [`MethodGraph`] is immutable after construction and is [`Send`] and [`Sync`]. The lazily
//! derived predecessor index uses [`std::sync::OnceLock`].

mod builder;
mod config;
mod edge;
mod graph;
mod node;

pub use builder::GraphBuilder;
pub use config::GraphConfig;
pub use edge::{Edge, EdgeKind};
pub use graph::MethodGraph;
pub use node::Node;
