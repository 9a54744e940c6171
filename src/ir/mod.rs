//! Intermediate representation (IR) module.
//!
//! This module contains the IR definitions, the two-tier symbol table,
//! and the AST-to-IR translator.

pub mod ir;
pub use ir::*;
pub mod symbol_table;
pub mod translator;
