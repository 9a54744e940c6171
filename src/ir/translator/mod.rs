//! AST to IR lowering.
//!
//! One depth-first pass over the program, lowering expressions to
//! typed instructions and control flow to basic blocks. Semantic
//! problems are recorded as diagnostics and never abort the pass.

pub mod context;
pub mod expr;
pub mod stmt;

pub use context::Translator;

use crate::ast::Program;
use crate::ir::Module;
use crate::Diagnostic;

/// Lower a program to an IR module plus the diagnostics raised on the
/// way, in the order they were encountered.
pub fn lower(program: &Program) -> (Module, Vec<Diagnostic>) {
    let mut t = Translator::new();
    t.lower_program(program);
    t.finish()
}
