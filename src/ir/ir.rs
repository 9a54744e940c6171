// A small block-structured IR with typed instructions and explicit
// control transfers.

use serde::Serialize;

use crate::ast::ValType;

/// Name of the synthesized function holding module-level statements.
pub const TOP_LEVEL_FN: &str = "__top";

#[derive(Debug, Clone, Default, Serialize)]
pub struct Module {
    /// `functions[0]` is always the synthesized top-level function.
    pub functions: Vec<Function>,
}

impl Module {
    pub fn new() -> Self {
        Self {
            functions: Vec::new(),
        }
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// The synthesized top-level function.
    pub fn top_level(&self) -> &Function {
        &self.functions[0]
    }

    pub fn to_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        for func in &self.functions {
            let params = func
                .params
                .iter()
                .map(|(name, ty)| format!("{name}: {ty}"))
                .collect::<Vec<_>>()
                .join(", ");
            out.push(format!("fn {}({}) -> {}:", func.name, params, func.ret_ty));
            for block in &func.blocks {
                out.push(format!("{}:", block.label));
                for ins in &block.instrs {
                    match ins {
                        Instr::Bin {
                            op,
                            left,
                            right,
                            dst,
                            ty,
                        } => out.push(format!("  %{dst} = {ty} {left} {op} {right}")),
                        Instr::Cmp {
                            op,
                            left,
                            right,
                            dst,
                        } => out.push(format!("  %{dst} = cmp {left} {op} {right}")),
                        Instr::Call {
                            callee,
                            args,
                            dst,
                            ty,
                        } => out.push(format!("  %{dst} = call {ty} {callee}({})", Values(args))),
                        Instr::Convert { value, to, dst } => {
                            out.push(format!("  %{dst} = convert {value} to {to}"))
                        }
                    }
                }
                match &block.term {
                    Some(Terminator::Br(target)) => out.push(format!("  br {target}")),
                    Some(Terminator::CondBr {
                        cond,
                        then_to,
                        else_to,
                    }) => out.push(format!("  condbr {cond}, {then_to}, {else_to}")),
                    Some(Terminator::Ret(Some(v))) => out.push(format!("  ret {v}")),
                    Some(Terminator::Ret(None)) => out.push("  ret".to_string()),
                    None => {}
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Function {
    pub name: String,
    pub params: Vec<(String, Ty)>,
    pub ret_ty: Ty,
    pub blocks: Vec<Block>,
}

impl Function {
    pub fn block(&self, label: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.label == label)
    }

    /// Entry block of the function.
    pub fn entry(&self) -> &Block {
        &self.blocks[0]
    }
}

/// A straight-line sequence of instructions ending in exactly one
/// control transfer. `term` is `None` only while the block is still
/// under construction.
#[derive(Debug, Clone, Serialize)]
pub struct Block {
    pub label: String,
    pub instrs: Vec<Instr>,
    pub term: Option<Terminator>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Instr {
    /// `%dst = left <op> right`
    Bin {
        op: ArithOp,
        left: Value,
        right: Value,
        dst: usize,
        ty: Ty,
    },

    /// `%dst = left <op> right`, result is Bool
    Cmp {
        op: CmpOp,
        left: Value,
        right: Value,
        dst: usize,
    },

    /// `%dst = callee(args...)`
    Call {
        callee: String,
        args: Vec<Value>,
        dst: usize,
        ty: Ty,
    },

    /// `%dst = value` reinterpreted in another numeric representation
    Convert { value: Value, to: Ty, dst: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Terminator {
    /// Unconditional transfer to the labelled block.
    Br(String),
    /// Two-way transfer on a Bool value.
    CondBr {
        cond: Value,
        then_to: String,
        else_to: String,
    },
    /// Return from the enclosing function.
    Ret(Option<Value>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Const(Constant),
    /// Result of an instruction, by destination id.
    Temp { id: usize, ty: Ty },
    /// Function parameter, by position.
    Param { index: usize, ty: Ty },
    /// Placeholder produced when translation of a node failed.
    Void,
}

impl Value {
    pub fn ty(&self) -> Ty {
        match self {
            Value::Const(Constant::Int(_)) => Ty::Int,
            Value::Const(Constant::Double(_)) => Ty::Double,
            Value::Const(Constant::Str(_)) => Ty::Str,
            Value::Temp { ty, .. } => *ty,
            Value::Param { ty, .. } => *ty,
            Value::Void => Ty::Void,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Const(Constant::Int(n)) => write!(f, "{n}"),
            Value::Const(Constant::Double(d)) => write!(f, "{d:?}"),
            Value::Const(Constant::Str(s)) => write!(f, "{s:?}"),
            Value::Temp { id, .. } => write!(f, "%{id}"),
            Value::Param { index, .. } => write!(f, "arg{index}"),
            Value::Void => write!(f, "void"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Constant {
    Int(i64),
    Double(f64),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl std::fmt::Display for ArithOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl std::fmt::Display for CmpOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Ty {
    Int,
    Double,
    Str,
    Bool,
    Void,
}

impl From<ValType> for Ty {
    fn from(ty: ValType) -> Self {
        match ty {
            ValType::Int => Ty::Int,
            ValType::Double => Ty::Double,
            ValType::Str => Ty::Str,
        }
    }
}

impl std::fmt::Display for Ty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Ty::Int => "int",
            Ty::Double => "double",
            Ty::Str => "str",
            Ty::Bool => "bool",
            Ty::Void => "void",
        };
        write!(f, "{s}")
    }
}

struct Values<'a>(&'a [Value]);
impl<'a> std::fmt::Display for Values<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}
