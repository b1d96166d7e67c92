//! Execution context for a tree-walking interpreter: scope/frame chains,
//! the call and loop stacks, parse-tree execution annotation, and
//! host-class discovery with lazy bootstrap. The grammar, the evaluator
//! proper, and host reflection internals are external collaborators,
//! represented here only by the trait boundaries this crate needs.

pub mod config;
pub mod diagnostics;
pub mod host;
pub mod interpreter;

pub use interpreter::Interpreter;
