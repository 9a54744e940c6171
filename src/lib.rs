//! AST-to-IR translation for the Tarn expression language.
//!
//! The parser hands us a [`ast::Program`] tree that is already free of
//! syntax errors; [`translate`] walks it once, depth-first, and produces
//! an instruction-oriented IR module plus the diagnostics raised along
//! the way. Semantic problems never abort the pass: each one degrades
//! the offending node to a void value and is reported to the caller,
//! which decides whether diagnostics block further lowering.

pub mod ast;
pub mod ir;

use serde::Serialize;
use thiserror::Error;

/// A recoverable translation problem: what went wrong, which identifier
/// or function it concerns, and a human-readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{kind}: {message}")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Identifier or function name the diagnostic is about.
    pub name: String,
    pub message: String,
}

impl Diagnostic {
    /// Redefinitions are warnings; everything else is an error.
    pub fn is_warning(&self) -> bool {
        matches!(self.kind, DiagnosticKind::Redefinition)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// A `val` re-introduced a name that already exists in its scope.
    /// The binding is overwritten and translation continues.
    Redefinition,
    /// A read or assignment named a variable that is not in scope.
    UndefinedName,
    /// A call named a function that has not been defined.
    UndefinedFunction,
    /// A call supplied the wrong number of arguments.
    ArityMismatch,
    /// A function definition reused an existing function name.
    /// The duplicate definition is skipped entirely.
    DuplicateFunction,
    /// Expression nesting exceeded the translator's depth limit.
    NestingTooDeep,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::Redefinition => write!(f, "Redefinition"),
            DiagnosticKind::UndefinedName => write!(f, "UndefinedName"),
            DiagnosticKind::UndefinedFunction => write!(f, "UndefinedFunction"),
            DiagnosticKind::ArityMismatch => write!(f, "ArityMismatch"),
            DiagnosticKind::DuplicateFunction => write!(f, "DuplicateFunction"),
            DiagnosticKind::NestingTooDeep => write!(f, "NestingTooDeep"),
        }
    }
}

/// Translate a parsed program into an IR module.
///
/// Always completes and always returns whatever partial module was
/// built, together with the diagnostics in the order they were raised.
pub fn translate(program: &ast::Program) -> (ir::Module, Vec<Diagnostic>) {
    ir::translator::lower(program)
}
