//! AST layer of the probescope script compiler.
//!
//! The parser builds a [`Program`] bottom-up, analysis and codegen passes walk
//! it through [`Visitor`] / [`VisitorMut`], and [`Expander`] turns probes with
//! wildcard attach points into one concrete probe per match.

pub mod ast;
pub mod binding;
pub mod child;
pub mod expand;
pub mod location;
pub mod ops;
pub mod printer;
pub mod types;
pub mod visit;

use tracing::info;

pub use ast::*;
pub use binding::{bind_assignments, renumber_bindings, BindingIndex, MapRef, NodeId, VarRef};
pub use child::Child;
pub use expand::{AttachMatch, ExpandError, ExpandOptions, Expander, TargetResolver};
pub use location::{Location, Position};
pub use ops::{BinaryOp, JumpKind, UnaryOp};
pub use printer::Printer;
pub use types::{PositionalParameterType, SizedType, Type, UsdtProbeEntry};
pub use visit::{Visitor, VisitorMut};

/// Print AST for debugging
pub fn print_ast(program: &Program) {
    info!("\n=== AST Tree ===\n{}=== End AST Tree ===", Printer::print(program));
}
