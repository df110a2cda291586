//! # tree-generator
//!
//! Procedural branching structures from L-System grammars.
//!
//! Generation runs in two stages. The rewriting engine ([`lsystem::generate`])
//! expands an axiom through N generations of context-free rule substitution. The
//! turtle interpreter ([`MeshGenerator`]) then walks the expanded sequence with a
//! stack of position/rotation frames and turns each symbol into a geometric side
//! effect, collecting one [`MeshGroup`] of instance transforms per drawn shape.
//!
//! The output is engine-agnostic: mesh data, materials and [`Transform`]s that a
//! renderer can upload as instanced draws.

pub mod error;
pub mod interpreter;
pub mod lsystem;
pub mod mesh;
pub mod string_generator;
pub mod symbol;
pub mod turtle;

pub use error::{Error, Result};
pub use interpreter::*;
pub use lsystem::*;
pub use mesh::*;
pub use string_generator::*;
pub use symbol::*;
pub use turtle::*;
