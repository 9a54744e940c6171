use super::context::{Translator, MAX_DEPTH};
use crate::ast::{Binding, CompOp, Comparison, FunctionCall, InfixOp, Node, ValType};
use crate::ir::{ArithOp, CmpOp, Constant, Instr, Ty, Value};
use crate::DiagnosticKind;

impl Translator {
    /// Translate one expression node to an IR value, emitting whatever
    /// instructions it needs into the current block.
    pub fn eval(&mut self, node: &Node) -> Value {
        if self.depth >= MAX_DEPTH {
            self.diag(
                DiagnosticKind::NestingTooDeep,
                "",
                format!("expression nesting exceeds {MAX_DEPTH} levels"),
            );
            return Value::Void;
        }
        self.depth += 1;
        let value = self.eval_inner(node);
        self.depth -= 1;
        value
    }

    fn eval_inner(&mut self, node: &Node) -> Value {
        match node {
            Node::Number { value, ty } => Value::Const(match ty {
                ValType::Double => Constant::Double(*value),
                _ => Constant::Int(*value as i64),
            }),

            Node::Str(s) => Value::Const(Constant::Str(s.clone())),

            Node::Infix { op, left, right } => {
                // Operand order is load-bearing for sub, div, and mod.
                let left = self.eval(left);
                let right = self.eval(right);
                let ty = promote(left.ty(), right.ty());
                let dst = self.new_temp();
                self.emit(Instr::Bin {
                    op: arith_op(*op),
                    left,
                    right,
                    dst,
                    ty,
                });
                Value::Temp { id: dst, ty }
            }

            Node::Negate(inner) => match self.eval(inner) {
                Value::Const(Constant::Int(n)) => Value::Const(Constant::Int(-n)),
                Value::Const(Constant::Double(d)) => Value::Const(Constant::Double(-d)),
                Value::Void => Value::Void,
                value => {
                    // Not a compile-time constant: subtract from zero.
                    let ty = value.ty();
                    let zero = match ty {
                        Ty::Double => Constant::Double(0.0),
                        _ => Constant::Int(0),
                    };
                    let dst = self.new_temp();
                    self.emit(Instr::Bin {
                        op: ArithOp::Sub,
                        left: Value::Const(zero),
                        right: value,
                        dst,
                        ty,
                    });
                    Value::Temp { id: dst, ty }
                }
            },

            Node::Binding(binding) => self.eval_binding(binding),
            Node::FunctionCall(call) => self.eval_call(call),

            // Statement-shaped nodes contribute no value in expression
            // position.
            Node::IfChain(chain) => {
                self.lower_if(chain);
                Value::Void
            }
            Node::WhileLoop(w) => {
                self.lower_while(w);
                Value::Void
            }
            Node::FunctionDef(def) => {
                self.define_function(def);
                Value::Void
            }
        }
    }

    /// Translate a binding: declaration, assignment, read, or
    /// anonymous pass-through, depending on its shape.
    pub fn eval_binding(&mut self, binding: &Binding) -> Value {
        if binding.id.is_empty() {
            // Anonymous wrapped value: unwrap and return it directly.
            return match &binding.value {
                Some(value) => self.eval(value),
                None => Value::Void,
            };
        }

        match (&binding.value, binding.is_new) {
            (Some(value), true) => {
                let v = self.eval(value);
                if self.symbols.declare(binding.id.clone(), v.clone()).is_err() {
                    self.diag(
                        DiagnosticKind::Redefinition,
                        &binding.id,
                        format!("variable '{}' already exists; overwriting", binding.id),
                    );
                    self.symbols.redeclare(binding.id.clone(), v.clone());
                }
                v
            }
            (Some(value), false) => {
                let v = self.eval(value);
                if self.symbols.assign(&binding.id, v.clone()) {
                    v
                } else {
                    self.diag(
                        DiagnosticKind::UndefinedName,
                        &binding.id,
                        format!("variable '{}' does not exist", binding.id),
                    );
                    Value::Void
                }
            }
            (None, _) => match self.symbols.resolve(&binding.id) {
                Some(value) => value.clone(),
                None => {
                    self.diag(
                        DiagnosticKind::UndefinedName,
                        &binding.id,
                        format!("variable '{}' does not exist", binding.id),
                    );
                    Value::Void
                }
            },
        }
    }

    /// Translate a call: arguments first, then callee and arity
    /// checks, then one call instruction.
    pub fn eval_call(&mut self, call: &FunctionCall) -> Value {
        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.eval_binding(arg));
        }

        let sig = match self.functions.get(&call.name) {
            Some(sig) => sig.clone(),
            None => {
                self.diag(
                    DiagnosticKind::UndefinedFunction,
                    &call.name,
                    format!("function '{}' does not exist", call.name),
                );
                return Value::Void;
            }
        };
        if args.len() != sig.param_tys.len() {
            self.diag(
                DiagnosticKind::ArityMismatch,
                &call.name,
                format!(
                    "function '{}' takes {} argument{}, got {}",
                    call.name,
                    sig.param_tys.len(),
                    if sig.param_tys.len() == 1 { "" } else { "s" },
                    args.len()
                ),
            );
            return Value::Void;
        }

        let dst = self.new_temp();
        self.emit(Instr::Call {
            callee: call.name.clone(),
            args,
            dst,
            ty: sig.ret_ty,
        });
        Value::Temp {
            id: dst,
            ty: sig.ret_ty,
        }
    }

    /// Load both comparison operands and emit one comparison
    /// instruction tagged with the requested predicate.
    pub fn lower_comparison(&mut self, comp: &Comparison) -> Value {
        let left = self.eval_binding(&comp.left);
        let right = self.eval_binding(&comp.right);
        let dst = self.new_temp();
        self.emit(Instr::Cmp {
            op: cmp_op(comp.op),
            left,
            right,
            dst,
        });
        Value::Temp {
            id: dst,
            ty: Ty::Bool,
        }
    }

    /// Bridge a value to the requested representation, emitting a
    /// conversion when they differ. Void passes through untouched.
    pub fn convert_to(&mut self, value: Value, to: Ty) -> Value {
        if value.ty() == to || matches!(value, Value::Void) {
            return value;
        }
        let dst = self.new_temp();
        self.emit(Instr::Convert { value, to, dst });
        Value::Temp { id: dst, ty: to }
    }
}

pub fn arith_op(op: InfixOp) -> ArithOp {
    match op {
        InfixOp::Add => ArithOp::Add,
        InfixOp::Sub => ArithOp::Sub,
        InfixOp::Mul => ArithOp::Mul,
        InfixOp::Div => ArithOp::Div,
        InfixOp::Mod => ArithOp::Mod,
    }
}

pub fn cmp_op(op: CompOp) -> CmpOp {
    match op {
        CompOp::Eq => CmpOp::Eq,
        CompOp::Ne => CmpOp::Ne,
        CompOp::Lt => CmpOp::Lt,
        CompOp::Le => CmpOp::Le,
        CompOp::Gt => CmpOp::Gt,
        CompOp::Ge => CmpOp::Ge,
    }
}

/// Numeric promotion for arithmetic: double wins, otherwise int.
pub fn promote(a: Ty, b: Ty) -> Ty {
    if a == Ty::Double || b == Ty::Double {
        Ty::Double
    } else {
        Ty::Int
    }
}
