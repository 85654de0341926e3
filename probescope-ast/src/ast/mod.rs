//! Node model of a probe script.
//!
//! Every node exclusively owns its children (`Child<T>`, `Vec<T>`,
//! `Option<Vec<T>>`), so dropping a [`Program`] frees the whole tree exactly
//! once. The only cross-links are the binding refs in [`ExprMeta`], which are
//! plain ids.

pub mod expr;
pub mod probe;
pub mod stmt;

pub use expr::*;
pub use probe::*;
pub use stmt::*;

/// Shallow copy used when stamping out expanded probes.
///
/// Scalars, flags, binding links and the location are copied; every owned
/// child slot of the copy is empty. Callers reattach whatever children they
/// need (usually deep copies via `Clone`).
pub trait LeafCopy {
    fn leaf_copy(&self) -> Self;
}
