use std::collections::HashMap;

use crate::ir::symbol_table::SymbolTable;
use crate::ir::{Block, Function, Instr, Module, Terminator, Ty, TOP_LEVEL_FN};
use crate::{Diagnostic, DiagnosticKind};

/// Expression nesting depth at which translation gives up on a node
/// instead of risking the call stack.
pub const MAX_DEPTH: usize = 512;

/// Declared signature of a function, registered before its body is
/// lowered so recursive calls resolve.
#[derive(Debug, Clone)]
pub struct FnSig {
    pub param_tys: Vec<Ty>,
    pub ret_ty: Ty,
}

/// Saved insertion cursor, restored when a function body is done.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    func: usize,
    block: usize,
}

/// All mutable state of one translation pass: the module under
/// construction, the insertion cursor, the two-tier symbol table, the
/// function table, and the diagnostics collected so far.
pub struct Translator {
    pub module: Module,
    pub symbols: SymbolTable,
    pub functions: HashMap<String, FnSig>,
    pub diagnostics: Vec<Diagnostic>,
    pub depth: usize,
    cur_fn: usize,
    cur_block: usize,
    temp_count: usize,
    label_count: usize,
}

impl Translator {
    pub fn new() -> Self {
        let mut t = Self {
            module: Module::new(),
            symbols: SymbolTable::new(),
            functions: HashMap::new(),
            diagnostics: Vec::new(),
            depth: 0,
            cur_fn: 0,
            cur_block: 0,
            temp_count: 0,
            label_count: 0,
        };
        // Module-level statements lower into a synthesized function.
        t.module.functions.push(Function {
            name: TOP_LEVEL_FN.to_string(),
            params: Vec::new(),
            ret_ty: Ty::Void,
            blocks: Vec::new(),
        });
        let entry = t.new_block("entry");
        t.cur_block = entry;
        t
    }

    /// Seal the top-level function and hand back the results.
    pub fn finish(mut self) -> (Module, Vec<Diagnostic>) {
        self.terminate(Terminator::Ret(None));
        (self.module, self.diagnostics)
    }

    pub fn new_temp(&mut self) -> usize {
        let id = self.temp_count;
        self.temp_count += 1;
        id
    }

    pub fn new_label(&mut self, hint: &str) -> String {
        let l = format!("{hint}{}", self.label_count);
        self.label_count += 1;
        l
    }

    /// Append a fresh, unterminated block to the current function and
    /// return its index. Does not move the cursor.
    pub fn new_block(&mut self, hint: &str) -> usize {
        let label = self.new_label(hint);
        let func = &mut self.module.functions[self.cur_fn];
        func.blocks.push(Block {
            label,
            instrs: Vec::new(),
            term: None,
        });
        func.blocks.len() - 1
    }

    /// Move the insertion cursor to a block of the current function.
    pub fn switch_to(&mut self, block: usize) {
        self.cur_block = block;
    }

    pub fn block_label(&self, block: usize) -> String {
        self.module.functions[self.cur_fn].blocks[block].label.clone()
    }

    pub fn emit(&mut self, instr: Instr) {
        self.module.functions[self.cur_fn].blocks[self.cur_block]
            .instrs
            .push(instr);
    }

    /// Set the current block's control transfer. A block that already
    /// has one keeps it: the first terminator wins, so straight-line
    /// code after a transfer cannot re-terminate the block.
    pub fn terminate(&mut self, term: Terminator) {
        let block = &mut self.module.functions[self.cur_fn].blocks[self.cur_block];
        if block.term.is_none() {
            block.term = Some(term);
        }
    }

    /// Start a new IR function and move the cursor into its entry
    /// block. Returns the cursor to restore afterwards.
    pub fn begin_function(&mut self, name: String, params: Vec<(String, Ty)>, ret_ty: Ty) -> Cursor {
        let saved = Cursor {
            func: self.cur_fn,
            block: self.cur_block,
        };
        self.module.functions.push(Function {
            name,
            params,
            ret_ty,
            blocks: Vec::new(),
        });
        self.cur_fn = self.module.functions.len() - 1;
        let entry = self.new_block("entry");
        self.cur_block = entry;
        saved
    }

    pub fn end_function(&mut self, saved: Cursor) {
        self.cur_fn = saved.func;
        self.cur_block = saved.block;
    }

    /// Record a diagnostic and mirror it to the tracing subscriber.
    /// Rendering is the driver's concern; nothing is printed here.
    pub fn diag(&mut self, kind: DiagnosticKind, name: &str, message: String) {
        if kind == DiagnosticKind::Redefinition {
            tracing::warn!(kind = %kind, name, "{message}");
        } else {
            tracing::error!(kind = %kind, name, "{message}");
        }
        self.diagnostics.push(Diagnostic {
            kind,
            name: name.to_string(),
            message,
        });
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}
