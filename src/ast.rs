//! Node model for parsed Tarn programs.
//!
//! Nodes are built once by the parser, consumed once by the translator,
//! and never shared: ownership is strictly tree-shaped. Scope lookups
//! during translation refer to names, never to other nodes.

/// Static type tag carried by literals, bindings, and function
/// signatures. This is a tag, not an inferred type: the translator
/// propagates it but performs no checking beyond return-value
/// conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValType {
    Int,
    Double,
    Str,
}

/// One parsed program: an ordered list of top-level nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub nodes: Vec<Node>,
}

/// Every AST element is one variant of this closed set.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Numeric literal. `ty` distinguishes int from double; the payload
    /// is stored as a float either way.
    Number { value: f64, ty: ValType },
    /// String literal.
    Str(String),
    /// Binary arithmetic: `left op right`.
    Infix {
        op: InfixOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Arithmetic negation of the inner node.
    Negate(Box<Node>),
    Binding(Binding),
    IfChain(IfChain),
    WhileLoop(WhileLoop),
    FunctionDef(FunctionDef),
    FunctionCall(FunctionCall),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// A named or anonymous value slot: variable definition (`is_new`),
/// assignment, parameter, or a bare expression wrapped for argument
/// passing (empty `id`).
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Empty for anonymous wrapped values.
    pub id: String,
    pub value: Option<Box<Node>>,
    /// True introduces a fresh name; false mutates an existing one.
    pub is_new: bool,
    pub ty: ValType,
}

/// Comparison between two bindings, used as the condition of an
/// if-chain or a while loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Binding,
    pub right: Binding,
    pub op: CompOp,
}

/// The root of an if/elif/else chain. Chain links are a separate type
/// so a link can never itself carry a chain or an else branch.
#[derive(Debug, Clone, PartialEq)]
pub struct IfChain {
    pub comp: Comparison,
    pub then_body: Body,
    pub chain: Vec<IfLink>,
    pub else_body: Option<Body>,
}

/// One `elif` arm of an [`IfChain`].
#[derive(Debug, Clone, PartialEq)]
pub struct IfLink {
    pub comp: Comparison,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileLoop {
    pub comp: Comparison,
    pub body: Body,
}

/// One block's worth of executable lines plus an optional trailing
/// return expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub lines: Vec<Node>,
    pub ret: Option<Box<Node>>,
    pub ret_ty: ValType,
}

impl Body {
    pub fn new(lines: Vec<Node>) -> Self {
        Self {
            lines,
            ret: None,
            ret_ty: ValType::Int,
        }
    }

    pub fn with_ret(lines: Vec<Node>, ret: Node, ret_ty: ValType) -> Self {
        Self {
            lines,
            ret: Some(Box::new(ret)),
            ret_ty,
        }
    }
}

/// Function definition. Every parameter binding has a non-empty `id`
/// and no value.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Binding>,
    pub body: Body,
    pub ret_ty: ValType,
}

/// Function call. Every argument binding carries a value, usually via
/// [`Node::into_binding`].
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Binding>,
}

impl Node {
    /// Wrap any node as an anonymous binding, carrying the type tag
    /// forward when the node already has one. This is how bare
    /// expressions are passed where a named slot is expected, e.g.
    /// call arguments and comparison operands.
    pub fn into_binding(self) -> Binding {
        let ty = match &self {
            Node::Number { ty, .. } => *ty,
            Node::Binding(b) => b.ty,
            _ => ValType::Int,
        };
        Binding {
            id: String::new(),
            value: Some(Box::new(self)),
            is_new: false,
            ty,
        }
    }
}
