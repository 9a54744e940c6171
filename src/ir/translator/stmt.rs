use super::context::{FnSig, Translator};
use crate::ast::{Body, Comparison, FunctionDef, IfChain, IfLink, Node, Program, WhileLoop};
use crate::ir::{Terminator, Ty, Value};
use crate::DiagnosticKind;

impl Translator {
    /// Lower every top-level node in source order. Function bodies
    /// lower into their own IR functions; everything else lowers into
    /// the synthesized top-level function.
    pub fn lower_program(&mut self, program: &Program) {
        for node in &program.nodes {
            self.lower_stmt(node);
        }
    }

    pub fn lower_stmt(&mut self, node: &Node) {
        match node {
            Node::FunctionDef(def) => self.define_function(def),
            Node::IfChain(chain) => self.lower_if(chain),
            Node::WhileLoop(w) => self.lower_while(w),
            // Bindings, calls, and bare expressions: evaluate for
            // their scope effects and instructions, drop the value.
            other => {
                let _ = self.eval(other);
            }
        }
    }

    /// Lower one block's worth of lines, then the trailing return
    /// expression if any. Returns the block's yielded value.
    pub fn lower_body(&mut self, body: &Body) -> Value {
        for line in &body.lines {
            self.lower_stmt(line);
        }
        match &body.ret {
            Some(expr) => self.eval(expr),
            None => Value::Void,
        }
    }

    /// Lower an if/elif/else chain. All arms converge on one join
    /// block, which becomes the current block afterwards.
    pub fn lower_if(&mut self, chain: &IfChain) {
        let join = self.new_block("endif");
        self.lower_if_arm(
            &chain.comp,
            &chain.then_body,
            &chain.chain,
            chain.else_body.as_ref(),
            join,
        );
        self.switch_to(join);
    }

    fn lower_if_arm(
        &mut self,
        comp: &Comparison,
        body: &Body,
        chain: &[IfLink],
        else_body: Option<&Body>,
        join: usize,
    ) {
        let cond = self.lower_comparison(comp);
        let then_block = self.new_block("then");
        // False edge: next chain link, else the else-body, else fall
        // through to the join.
        let false_block = if chain.is_empty() && else_body.is_none() {
            join
        } else {
            self.new_block("else")
        };
        self.terminate(Terminator::CondBr {
            cond,
            then_to: self.block_label(then_block),
            else_to: self.block_label(false_block),
        });

        self.switch_to(then_block);
        self.lower_body(body);
        self.terminate(Terminator::Br(self.block_label(join)));

        if let Some((link, rest)) = chain.split_first() {
            self.switch_to(false_block);
            self.lower_if_arm(&link.comp, &link.body, rest, else_body, join);
        } else if let Some(else_body) = else_body {
            self.switch_to(false_block);
            self.lower_body(else_body);
            self.terminate(Terminator::Br(self.block_label(join)));
        }
    }

    /// Lower a while loop to header, body, and exit blocks. The header
    /// re-evaluates the comparison each iteration; the body ends in
    /// the single back-edge to the header.
    pub fn lower_while(&mut self, w: &WhileLoop) {
        let header = self.new_block("loop");
        let body_block = self.new_block("body");
        let exit = self.new_block("endloop");

        self.terminate(Terminator::Br(self.block_label(header)));

        self.switch_to(header);
        let cond = self.lower_comparison(&w.comp);
        self.terminate(Terminator::CondBr {
            cond,
            then_to: self.block_label(body_block),
            else_to: self.block_label(exit),
        });

        self.switch_to(body_block);
        self.lower_body(&w.body);
        self.terminate(Terminator::Br(self.block_label(header)));

        self.switch_to(exit);
    }

    /// Define an IR function from a definition node. A duplicate name
    /// drops the whole definition; every other problem inside the body
    /// degrades locally as usual.
    pub fn define_function(&mut self, def: &FunctionDef) {
        if self.functions.contains_key(&def.name) {
            self.diag(
                DiagnosticKind::DuplicateFunction,
                &def.name,
                format!("function '{}' already exists; definition skipped", def.name),
            );
            return;
        }

        let param_tys: Vec<Ty> = def.params.iter().map(|p| Ty::from(p.ty)).collect();
        let ret_ty = Ty::from(def.ret_ty);
        // Registered before the body so the function can call itself.
        self.functions.insert(
            def.name.clone(),
            FnSig {
                param_tys: param_tys.clone(),
                ret_ty,
            },
        );

        let params: Vec<(String, Ty)> = def
            .params
            .iter()
            .zip(&param_tys)
            .map(|(p, ty)| (p.id.clone(), *ty))
            .collect();
        let saved = self.begin_function(def.name.clone(), params, ret_ty);

        self.symbols.enter_function();
        for (index, param) in def.params.iter().enumerate() {
            let value = Value::Param {
                index,
                ty: param_tys[index],
            };
            if self.symbols.declare(param.id.clone(), value).is_err() {
                self.diag(
                    DiagnosticKind::Redefinition,
                    &param.id,
                    format!("parameter '{}' defined more than once", param.id),
                );
            }
        }

        let yielded = self.lower_body(&def.body);
        let ret = self.convert_to(yielded, ret_ty);
        match ret {
            Value::Void => self.terminate(Terminator::Ret(None)),
            value => self.terminate(Terminator::Ret(Some(value))),
        }

        self.symbols.exit_function();
        self.end_function(saved);
    }
}
