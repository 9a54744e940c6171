use tarn_translate::ast::{
    Binding, Body, CompOp, Comparison, IfChain, IfLink, InfixOp, Node, Program, ValType, WhileLoop,
};
use tarn_translate::ir::{Instr, Terminator};
use tarn_translate::translate;

// ── AST construction helpers ─────────────────────────────────────────────

fn num(n: i64) -> Node {
    Node::Number {
        value: n as f64,
        ty: ValType::Int,
    }
}

fn var(name: &str) -> Node {
    Node::Binding(Binding {
        id: name.to_string(),
        value: None,
        is_new: false,
        ty: ValType::Int,
    })
}

fn val(name: &str, value: Node) -> Node {
    Node::Binding(Binding {
        id: name.to_string(),
        value: Some(Box::new(value)),
        is_new: true,
        ty: ValType::Int,
    })
}

fn assign(name: &str, value: Node) -> Node {
    Node::Binding(Binding {
        id: name.to_string(),
        value: Some(Box::new(value)),
        is_new: false,
        ty: ValType::Int,
    })
}

fn cmp(left: Node, op: CompOp, right: Node) -> Comparison {
    Comparison {
        left: left.into_binding(),
        right: right.into_binding(),
        op,
    }
}

fn add(left: Node, right: Node) -> Node {
    Node::Infix {
        op: InfixOp::Add,
        left: Box::new(left),
        right: Box::new(right),
    }
}

// ── While loops ──────────────────────────────────────────────────────────

#[test]
fn while_lowers_to_header_body_exit() {
    // val i = 0; while i < 3 { i = i + 1 }
    let program = Program {
        nodes: vec![
            val("i", num(0)),
            Node::WhileLoop(WhileLoop {
                comp: cmp(var("i"), CompOp::Lt, num(3)),
                body: Body::new(vec![assign("i", add(var("i"), num(1)))]),
            }),
        ],
    };
    let (module, diags) = translate(&program);
    assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags);

    let top = module.top_level();
    assert_eq!(top.blocks.len(), 4, "entry, header, body, exit");
    let entry = &top.blocks[0];
    let header = &top.blocks[1];
    let body = &top.blocks[2];
    let exit = &top.blocks[3];

    // Entry falls into the header.
    assert_eq!(entry.term, Some(Terminator::Br(header.label.clone())));

    // The header re-evaluates the comparison and branches body/exit.
    assert!(matches!(header.instrs[0], Instr::Cmp { .. }));
    match &header.term {
        Some(Terminator::CondBr {
            then_to, else_to, ..
        }) => {
            assert_eq!(*then_to, body.label);
            assert_eq!(*else_to, exit.label);
        }
        other => panic!("expected conditional branch, got {:?}", other),
    }

    // Exactly one back-edge, from the body.
    assert_eq!(body.term, Some(Terminator::Br(header.label.clone())));
    let back_edges = top
        .blocks
        .iter()
        .filter(|b| b.term == Some(Terminator::Br(header.label.clone())))
        .count();
    assert_eq!(back_edges, 2, "entry edge plus the single back-edge");

    // Exactly one forward edge from header to exit.
    assert!(exit.instrs.is_empty());
}

#[test]
fn names_introduced_in_loop_body_stay_visible() {
    // No nested block scoping: a val inside the loop body lands in the
    // enclosing scope and is usable after the loop.
    let program = Program {
        nodes: vec![
            val("i", num(0)),
            Node::WhileLoop(WhileLoop {
                comp: cmp(var("i"), CompOp::Lt, num(1)),
                body: Body::new(vec![val("t", num(7))]),
            }),
            val("u", var("t")),
        ],
    };
    let (_, diags) = translate(&program);
    assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags);
}

// ── If chains ────────────────────────────────────────────────────────────

#[test]
fn if_else_arms_converge_on_one_join() {
    let program = Program {
        nodes: vec![
            val("a", num(1)),
            Node::IfChain(IfChain {
                comp: cmp(var("a"), CompOp::Eq, num(1)),
                then_body: Body::new(vec![assign("a", num(10))]),
                chain: Vec::new(),
                else_body: Some(Body::new(vec![assign("a", num(20))])),
            }),
        ],
    };
    let (module, diags) = translate(&program);
    assert!(diags.is_empty());

    let top = module.top_level();
    // entry, join, then, else
    assert_eq!(top.blocks.len(), 4);
    let entry = &top.blocks[0];
    let join = &top.blocks[1];
    let then_block = &top.blocks[2];
    let else_block = &top.blocks[3];

    match &entry.term {
        Some(Terminator::CondBr {
            then_to, else_to, ..
        }) => {
            assert_eq!(*then_to, then_block.label);
            assert_eq!(*else_to, else_block.label);
        }
        other => panic!("expected conditional branch, got {:?}", other),
    }
    assert_eq!(then_block.term, Some(Terminator::Br(join.label.clone())));
    assert_eq!(else_block.term, Some(Terminator::Br(join.label.clone())));
}

#[test]
fn if_without_else_falls_through_to_join() {
    let program = Program {
        nodes: vec![
            val("a", num(1)),
            Node::IfChain(IfChain {
                comp: cmp(var("a"), CompOp::Gt, num(0)),
                then_body: Body::new(vec![assign("a", num(2))]),
                chain: Vec::new(),
                else_body: None,
            }),
        ],
    };
    let (module, diags) = translate(&program);
    assert!(diags.is_empty());

    let top = module.top_level();
    let entry = &top.blocks[0];
    let join = &top.blocks[1];
    match &entry.term {
        Some(Terminator::CondBr { else_to, .. }) => assert_eq!(*else_to, join.label),
        other => panic!("expected conditional branch, got {:?}", other),
    }
}

#[test]
fn elif_chain_tests_in_order() {
    // if a == 1 { } elif a == 2 { } else { }
    let program = Program {
        nodes: vec![
            val("a", num(2)),
            Node::IfChain(IfChain {
                comp: cmp(var("a"), CompOp::Eq, num(1)),
                then_body: Body::new(vec![assign("a", num(10))]),
                chain: vec![IfLink {
                    comp: cmp(var("a"), CompOp::Eq, num(2)),
                    body: Body::new(vec![assign("a", num(20))]),
                }],
                else_body: Some(Body::new(vec![assign("a", num(30))])),
            }),
        ],
    };
    let (module, diags) = translate(&program);
    assert!(diags.is_empty());

    let top = module.top_level();
    let entry = &top.blocks[0];
    let join = &top.blocks[1];

    // The first false edge leads to the block holding the second test.
    let first_else = match &entry.term {
        Some(Terminator::CondBr { else_to, .. }) => top
            .blocks
            .iter()
            .find(|b| b.label == *else_to)
            .expect("first false target exists"),
        other => panic!("expected conditional branch, got {:?}", other),
    };
    assert!(
        matches!(first_else.instrs[0], Instr::Cmp { .. }),
        "chain link re-tests in its own block"
    );

    // The link's false edge leads to the else body, and every arm ends
    // at the same join.
    let (link_then, link_else) = match &first_else.term {
        Some(Terminator::CondBr {
            then_to, else_to, ..
        }) => (then_to.clone(), else_to.clone()),
        other => panic!("expected conditional branch, got {:?}", other),
    };
    for label in [link_then, link_else] {
        let block = top.blocks.iter().find(|b| b.label == label).unwrap();
        assert_eq!(block.term, Some(Terminator::Br(join.label.clone())));
    }
}
