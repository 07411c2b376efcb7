//! Node-model tests: debug forms, span accessors, and sharing guarantees,
//! independent of the parser.

use indexmap::IndexMap;

use crate::ast::*;
use crate::position::{Position, Span};
use crate::token::TokenKind;

fn span(start_col: u32, end_col: u32) -> Span {
    Span::new(
        Position::new(1, start_col, start_col - 1),
        Position::new(1, end_col, end_col - 1),
    )
}

fn int(value: i64) -> Expr {
    Expr::Int {
        span: span(1, 1),
        value,
    }
}

fn ident(name: &str) -> Expr {
    Expr::Ident {
        span: span(1, name.len() as u32),
        name: name.to_string(),
    }
}

#[test]
fn literal_debug_forms() {
    assert_eq!(int(42).to_string(), "42");
    assert_eq!(
        Expr::Float {
            span: span(1, 3),
            value: 2.5
        }
        .to_string(),
        "2.5"
    );
    assert_eq!(
        Expr::Bool {
            span: span(1, 4),
            value: true
        }
        .to_string(),
        "true"
    );
    assert_eq!(Expr::Nil { span: span(1, 3) }.to_string(), "nil");
    assert_eq!(
        Expr::Str {
            span: span(1, 6),
            value: "a\"b".to_string(),
            parts: None,
        }
        .to_string(),
        "\"a\\\"b\""
    );
}

#[test]
fn operator_debug_forms_parenthesize() {
    let infix = Expr::Infix {
        span: span(1, 5),
        op: TokenKind::Plus,
        left: Box::new(ident("a")),
        right: Box::new(ident("b")),
    };
    assert_eq!(infix.to_string(), "(a + b)");

    let prefix = Expr::Prefix {
        span: span(1, 2),
        op: TokenKind::Minus,
        operand: Box::new(ident("x")),
    };
    assert_eq!(prefix.to_string(), "(-x)");

    let postfix = Expr::Postfix {
        span: span(1, 3),
        op: TokenKind::PlusPlus,
        operand: Box::new(ident("i")),
    };
    assert_eq!(postfix.to_string(), "(i++)");

    let ternary = Expr::Ternary {
        span: span(1, 9),
        cond: Box::new(ident("c")),
        if_true: Box::new(int(1)),
        if_false: Box::new(int(2)),
    };
    assert_eq!(ternary.to_string(), "(c ? 1 : 2)");
}

#[test]
fn collection_and_access_debug_forms() {
    let list = Expr::List {
        span: span(1, 6),
        items: vec![int(1), int(2)],
    };
    assert_eq!(list.to_string(), "[1, 2]");

    let map = Expr::Map {
        span: span(1, 8),
        items: vec![MapItem {
            span: span(2, 5),
            key: Some(Expr::Str {
                span: span(2, 2),
                value: "k".to_string(),
                parts: None,
            }),
            value: int(1),
        }],
    };
    assert_eq!(map.to_string(), "{\"k\": 1}");

    let slice = Expr::Slice {
        span: span(1, 6),
        object: Box::new(ident("x")),
        low: None,
        high: Some(Box::new(int(5))),
    };
    assert_eq!(slice.to_string(), "x[:5]");

    let attr = Expr::GetAttr {
        span: span(1, 4),
        object: Box::new(ident("a")),
        name: "b".to_string(),
        optional: true,
    };
    assert_eq!(attr.to_string(), "a?.b");

    let pipe = Expr::Pipe {
        span: span(1, 5),
        stages: vec![ident("a"), ident("b")],
    };
    assert_eq!(pipe.to_string(), "(a | b)");
}

#[test]
fn function_debug_form_includes_defaults_and_rest() {
    let mut defaults = IndexMap::new();
    defaults.insert("b".to_string(), int(2));
    let func = FuncLit {
        span: span(1, 30),
        name: Some("f".to_string()),
        params: vec![
            Param::Ident {
                span: span(12, 12),
                name: "a".to_string(),
            },
            Param::Ident {
                span: span(15, 19),
                name: "b".to_string(),
            },
        ],
        defaults,
        rest: Some("r".to_string()),
        body: Block {
            span: span(26, 30),
            statements: Vec::new(),
        },
    };
    assert_eq!(
        Expr::Func(func).to_string(),
        "function f(a, b = 2, ...r) { }"
    );
}

#[test]
fn statement_debug_forms() {
    let var = Stmt::Var {
        span: span(1, 9),
        name: "x".to_string(),
        value: int(5),
    };
    assert_eq!(var.to_string(), "let x = 5");

    assert_eq!(
        Stmt::Return {
            span: span(1, 6),
            value: None
        }
        .to_string(),
        "return"
    );

    let destructure = Stmt::ObjectDestructure {
        span: span(1, 20),
        bindings: vec![DestructureBinding {
            span: span(6, 15),
            key: "a".to_string(),
            alias: Some("b".to_string()),
            default: Some(int(1)),
        }],
        value: ident("obj"),
    };
    assert_eq!(destructure.to_string(), "let {a: b = 1} = obj");
}

#[test]
fn spans_delegate_to_pos_and_end() {
    let expr = ident("abc");
    assert_eq!(expr.pos(), expr.span().start);
    assert_eq!(expr.end(), expr.span().end);
    assert!(expr.pos() <= expr.end());

    let stmt = Stmt::Expr(expr);
    assert_eq!(stmt.pos().column, 1);
    assert_eq!(stmt.end().column, 3);
}

#[test]
fn place_expressions_are_identifiers_indexes_and_attributes() {
    assert!(ident("x").is_place());
    assert!(
        Expr::Index {
            span: span(1, 4),
            object: Box::new(ident("x")),
            index: Box::new(int(0)),
        }
        .is_place()
    );
    assert!(!int(5).is_place());
    assert!(
        !Expr::Call {
            span: span(1, 3),
            func: Box::new(ident("f")),
            args: Vec::new(),
        }
        .is_place()
    );
}

#[test]
fn programs_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Program>();
    assert_send_sync::<Expr>();
    assert_send_sync::<Stmt>();
}

#[test]
fn empty_program_has_zero_positions() {
    let program = Program::default();
    assert!(program.is_empty());
    assert_eq!(program.pos(), Position::ZERO);
    assert_eq!(program.end(), Position::ZERO);
    assert_eq!(program.to_string(), "");
}
