use crate::ir::Value;
use std::collections::HashMap;

/// Two-tier scope mapping identifiers to their current IR value.
///
/// The global tier lives for the whole translation pass. The local
/// tier exists only while one function body is being translated; an
/// `if` or `while` body shares its enclosing function's local tier
/// (there is no nested block scoping).
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    /// Module-level bindings, visible from every function unless
    /// shadowed.
    globals: HashMap<String, Value>,
    /// Parameters and locals of the function currently being
    /// translated. `None` outside any function.
    locals: Option<HashMap<String, Value>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter function scope
    pub fn enter_function(&mut self) {
        self.locals = Some(HashMap::new());
    }

    /// Exit function scope, discarding parameters and locals
    pub fn exit_function(&mut self) {
        self.locals = None;
    }

    pub fn in_function(&self) -> bool {
        self.locals.is_some()
    }

    /// Declare a name in the innermost scope. Fails with the existing
    /// value if the name is already present there.
    pub fn declare(&mut self, name: String, value: Value) -> Result<(), Value> {
        let table = if let Some(ref mut locals) = self.locals {
            locals
        } else {
            &mut self.globals
        };

        if let Some(existing) = table.get(&name) {
            return Err(existing.clone());
        }

        table.insert(name, value);
        Ok(())
    }

    /// Overwrite a name in the innermost scope whether or not it
    /// already exists. Recovery path for redefinitions, which warn and
    /// proceed.
    pub fn redeclare(&mut self, name: String, value: Value) {
        let table = if let Some(ref mut locals) = self.locals {
            locals
        } else {
            &mut self.globals
        };
        table.insert(name, value);
    }

    /// Overwrite an existing name in whichever scope holds it, locals
    /// first. Returns false if the name is not declared anywhere
    /// visible.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if let Some(ref mut locals) = self.locals {
            if let Some(slot) = locals.get_mut(name) {
                *slot = value;
                return true;
            }
        }
        match self.globals.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Look a name up, locals first, then globals.
    pub fn resolve(&self, name: &str) -> Option<&Value> {
        if let Some(ref locals) = self.locals {
            if let Some(value) = locals.get(name) {
                return Some(value);
            }
        }
        self.globals.get(name)
    }
}
