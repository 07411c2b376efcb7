//! Expression grammar: literals, collections, access chains, control
//! expressions.

use crate::ast::{Expr, Stmt};
use crate::token::TokenKind;

use super::{dump, must_parse, parse_source};

fn single_expr(source: &str) -> Expr {
    let mut program = must_parse(source);
    assert_eq!(program.len(), 1, "expected one statement in {source:?}");
    match program.statements.pop() {
        Some(Stmt::Expr(expr)) => expr,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

#[test]
fn integer_literal_forms() {
    for (source, expected) in [
        ("42", 42),
        ("0", 0),
        ("0xFF", 255),
        ("0b101", 5),
        ("0o755", 493),
        ("077", 63),
    ] {
        match single_expr(source) {
            Expr::Int { value, .. } => assert_eq!(value, expected, "for {source}"),
            other => panic!("expected Int for {source}, got {other:?}"),
        }
    }
}

#[test]
fn float_requires_both_parts() {
    match single_expr("3.14") {
        Expr::Float { value, .. } => assert!((value - 3.14).abs() < f64::EPSILON),
        other => panic!("expected Float, got {other:?}"),
    }
    // `1.foo` is attribute access on an integer, not a malformed float
    assert_eq!(dump("1.foo"), "1.foo");
}

#[test]
fn overflowing_integer_is_a_diagnostic() {
    let result = parse_source("99999999999999999999999999");
    assert!(!result.is_valid());
    assert!(
        result
            .errors
            .first()
            .unwrap()
            .message
            .contains("invalid integer literal")
    );
}

#[test]
fn bool_and_nil_literals() {
    assert!(matches!(single_expr("true"), Expr::Bool { value: true, .. }));
    assert!(matches!(
        single_expr("false"),
        Expr::Bool { value: false, .. }
    ));
    assert!(matches!(single_expr("nil"), Expr::Nil { .. }));
}

#[test]
fn strings_unescape() {
    match single_expr(r#""a\tb\n""#) {
        Expr::Str { value, parts, .. } => {
            assert_eq!(value, "a\tb\n");
            assert!(parts.is_none());
        }
        other => panic!("expected Str, got {other:?}"),
    }
    match single_expr(r"'it\'s'") {
        Expr::Str { value, .. } => assert_eq!(value, "it's"),
        other => panic!("expected Str, got {other:?}"),
    }
}

#[test]
fn invalid_escape_is_a_diagnostic() {
    let result = parse_source(r#""bad \q escape""#);
    assert!(!result.is_valid());
    let err = result.errors.first().unwrap();
    assert!(err.message.contains("invalid escape sequence"));
}

#[test]
fn lists_and_maps() {
    assert_eq!(dump("[1, 2, 3]"), "[1, 2, 3]");
    assert_eq!(dump("[]"), "[]");
    assert_eq!(dump("[1, [2, 3]]"), "[1, [2, 3]]");
    // identifier keys mean their name; shorthand expands
    assert_eq!(dump("{a: 1, b: 2}"), "{\"a\": 1, \"b\": 2}");
    assert_eq!(dump("{name}"), "{\"name\": name}");
    assert_eq!(dump("{\"lit\": 1, 2: two}"), "{\"lit\": 1, 2: two}");
    assert_eq!(dump("{}"), "{}");
}

#[test]
fn spread_in_collections_and_calls() {
    assert_eq!(dump("[...xs, 1]"), "[...xs, 1]");
    assert_eq!(dump("{...base, a: 1}"), "{...base, \"a\": 1}");
    assert_eq!(dump("f(...args)"), "f(...args)");
}

#[test]
fn map_spread_items_have_no_key() {
    match single_expr("{...base}") {
        Expr::Map { items, .. } => {
            assert_eq!(items.len(), 1);
            assert!(items[0].key.is_none());
            assert!(matches!(items[0].value, Expr::Spread { .. }));
        }
        other => panic!("expected Map, got {other:?}"),
    }
}

#[test]
fn index_and_slice_forms() {
    assert_eq!(dump("x[1]"), "x[1]");
    assert_eq!(dump("x[1:2]"), "x[1:2]");
    assert_eq!(dump("x[:2]"), "x[:2]");
    assert_eq!(dump("x[1:]"), "x[1:]");
    assert_eq!(dump("x[:]"), "x[:]");
    assert!(matches!(single_expr("x[a]"), Expr::Index { .. }));
    assert!(matches!(
        single_expr("x[a:b]"),
        Expr::Slice {
            low: Some(_),
            high: Some(_),
            ..
        }
    ));
}

#[test]
fn attribute_chains_and_method_calls() {
    assert_eq!(dump("a.b.c"), "a.b.c");
    assert_eq!(dump("a.m(1, 2)"), "a.m(1, 2)");
    assert_eq!(dump("a.b.m().c"), "a.b.m().c");
    match single_expr("a.m(1)") {
        Expr::ObjectCall { call, optional, .. } => {
            assert!(!optional);
            assert!(matches!(*call, Expr::Call { .. }));
        }
        other => panic!("expected ObjectCall, got {other:?}"),
    }
}

#[test]
fn optional_chaining() {
    match single_expr("a?.b") {
        Expr::GetAttr { optional, name, .. } => {
            assert!(optional);
            assert_eq!(name, "b");
        }
        other => panic!("expected GetAttr, got {other:?}"),
    }
    match single_expr("a?.m()") {
        Expr::ObjectCall { optional, .. } => assert!(optional),
        other => panic!("expected ObjectCall, got {other:?}"),
    }
}

#[test]
fn optional_chain_is_not_an_assignment_target() {
    let result = parse_source("a?.b = 1");
    assert!(!result.is_valid());
    assert!(
        result
            .errors
            .first()
            .unwrap()
            .message
            .contains("invalid assignment target")
    );
}

#[test]
fn attribute_assignment_builds_set_attr() {
    match single_expr("obj.field = 1") {
        Expr::SetAttr { name, op, .. } => {
            assert_eq!(name, "field");
            assert_eq!(op, TokenKind::Assign);
        }
        other => panic!("expected SetAttr, got {other:?}"),
    }
    assert_eq!(dump("obj.field += 2"), "obj.field += 2");
}

#[test]
fn postfix_operators() {
    assert_eq!(dump("i++"), "(i++)");
    assert_eq!(dump("x[0]--"), "(x[0]--)");
    assert_eq!(dump("obj.n++"), "(obj.n++)");

    let result = parse_source("5++");
    assert!(!result.is_valid());
    assert!(
        result
            .errors
            .first()
            .unwrap()
            .message
            .contains("invalid operand for postfix")
    );
}

#[test]
fn ternary_parses_once_and_rejects_nesting() {
    assert_eq!(dump("c ? a : b"), "(c ? a : b)");

    let result = parse_source("a ? b ? c : d : e");
    assert!(!result.is_valid());
    assert!(
        result
            .errors
            .first()
            .unwrap()
            .message
            .contains("nested ternary")
    );

    // sequential ternaries are fine once the first completes
    assert_eq!(dump("(a ? b : c) ? d : e"), "((a ? b : c) ? d : e)");
}

#[test]
fn if_expressions_and_else_if_sugar() {
    assert_eq!(dump("if x { y }"), "if x { y }");
    assert_eq!(dump("if x > 0 { y } else { z }"), "if (x > 0) { y } else { z }");
    assert_eq!(
        dump("if a { 1 } else if b { 2 } else { 3 }"),
        "if a { 1 } else { if b { 2 } else { 3 } }"
    );
}

#[test]
fn if_is_an_expression() {
    assert_eq!(dump("let x = if c { 1 } else { 2 }"), "let x = if c { 1 } else { 2 }");
}

#[test]
fn switch_cases_and_single_default() {
    let source = "switch x {\ncase 1, 2:\n    f()\ndefault:\n    g()\n}";
    assert_eq!(dump(source), "switch x { case 1, 2: f(); default: g(); }");

    match single_expr(source) {
        Expr::Switch { cases, .. } => {
            assert_eq!(cases.len(), 2);
            assert_eq!(cases[0].values.as_ref().map(Vec::len), Some(2));
            assert!(cases[1].values.is_none());
        }
        other => panic!("expected Switch, got {other:?}"),
    }
}

#[test]
fn switch_allows_empty_case_bodies() {
    let expr = single_expr("switch x {\ncase 1:\ncase 2:\n    f()\n}");
    match expr {
        Expr::Switch { cases, .. } => {
            assert_eq!(cases.len(), 2);
            assert!(cases[0].body.is_empty());
            assert_eq!(cases[1].body.len(), 1);
        }
        other => panic!("expected Switch, got {other:?}"),
    }
}

#[test]
fn switch_rejects_a_second_default() {
    let result = parse_source("switch x {\ndefault:\n    a\ndefault:\n    b\n}");
    assert!(!result.is_valid());
    assert!(
        result
            .errors
            .first()
            .unwrap()
            .message
            .contains("more than one default case")
    );
}

#[test]
fn match_requires_exactly_one_wildcard_arm() {
    assert_eq!(
        dump("match n { 1 => \"one\", _ => \"many\" }"),
        "match n { 1 => \"one\", _ => \"many\" }"
    );

    let missing = parse_source("match n { 1 => a }");
    assert!(!missing.is_valid());
    assert!(
        missing
            .errors
            .first()
            .unwrap()
            .message
            .contains("default arm")
    );

    let doubled = parse_source("match n { _ => a, _ => b }");
    assert!(!doubled.is_valid());
    assert!(
        doubled
            .errors
            .first()
            .unwrap()
            .message
            .contains("more than one default arm")
    );
}

#[test]
fn match_rejects_spread_patterns() {
    let result = parse_source("match n { ...xs => a, _ => b }");
    assert!(!result.is_valid());
    assert!(
        result
            .errors
            .first()
            .unwrap()
            .message
            .contains("spread patterns are not allowed")
    );
}

#[test]
fn membership_operators() {
    assert_eq!(dump("x in [1, 2]"), "(x in [1, 2])");
    assert_eq!(dump("x not in y"), "(x not in y)");
    assert!(matches!(single_expr("x in y"), Expr::In { .. }));
    assert!(matches!(single_expr("x not in y"), Expr::NotIn { .. }));
}

#[test]
fn assignment_is_an_expression_when_nested() {
    match single_expr("f(x = 5)") {
        Expr::Call { args, .. } => {
            assert_eq!(args.len(), 1);
            assert!(matches!(args[0], Expr::Assign { .. }));
        }
        other => panic!("expected Call, got {other:?}"),
    }
}

#[test]
fn assignment_targets_are_restricted() {
    for source in ["5 = x", "a + b = c", "f() = 1"] {
        let result = parse_source(source);
        assert!(!result.is_valid(), "{source} should not parse");
        assert!(
            result
                .errors
                .first()
                .unwrap()
                .message
                .contains("invalid assignment target"),
            "wrong message for {source}: {}",
            result.errors
        );
    }
}

#[test]
fn chained_assignment_nests_right() {
    assert_eq!(dump("x = y = 1"), "x = y = 1");
    match must_parse("x = y = 1").statements.pop() {
        Some(Stmt::Assign { value, .. }) => assert!(matches!(value, Expr::Assign { .. })),
        other => panic!("expected assignment statement, got {other:?}"),
    }
}

#[test]
fn try_is_not_an_expression() {
    let result = parse_source("let x = try { 1 } catch { 2 }");
    assert!(!result.is_valid());
}
